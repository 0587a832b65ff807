//! Creation pass: collections, modes, variables and literal values.
//!
//! Each collection is upserted by name. Aliases are left untouched here and
//! linked by [`crate::link`] once every collection in the batch exists.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::document::{CollectionDefinition, VariableDefinition};
use crate::error::BatchError;
use crate::report::ProcessingResult;
use crate::store::{Collection, Mode, Variable, VariableStore, VariableValue, MAX_MODES};
use crate::value::resolve_declared;

/// Creates or updates one collection and assigns every literal value it defines.
///
/// A new collection's implicit default mode is renamed to the first declared
/// mode; every other declared mode missing from the collection is added.
/// Running out of mode slots aborts with [`BatchError::ModeLimit`]. Problems
/// with individual variables or values are recorded in `result` and skipped.
pub fn materialize_collection<S: VariableStore + ?Sized>(
    store: &mut S,
    definition: &CollectionDefinition,
    result: &mut ProcessingResult,
) -> Result<Collection, BatchError> {
    let collection = upsert_collection(store, definition, result)?;
    let collection = ensure_modes(store, collection, definition)?;

    for (name, variable_def) in &definition.variables {
        let Some(variable) = upsert_variable(store, &collection, name, variable_def, result) else {
            continue;
        };

        for mode in &collection.modes {
            assign_literal(store, &collection, &variable, variable_def, mode, result);
        }
    }

    Ok(collection)
}

fn upsert_collection<S: VariableStore + ?Sized>(
    store: &mut S,
    definition: &CollectionDefinition,
    result: &mut ProcessingResult,
) -> Result<Collection, BatchError> {
    if definition.modes.is_empty() {
        return Err(BatchError::NoModes {
            collection: definition.name.clone(),
        });
    }

    if let Some(existing) = store.collection_by_name(&definition.name) {
        info!(collection = %definition.name, "updating existing collection");
        result.collections_updated += 1;
        return Ok(existing);
    }

    let created = store
        .create_collection(&definition.name)
        .map_err(BatchError::store(format!(
            "create collection '{}'",
            definition.name
        )))?;
    info!(collection = %definition.name, "created collection");
    result.collections_created += 1;

    // Reuse the implicit default mode instead of spending a slot on it.
    if let (Some(default), Some(first)) = (created.default_mode(), definition.modes.first()) {
        store
            .rename_mode(&created.id, &default.id, first)
            .map_err(BatchError::store(format!(
                "rename default mode of '{}'",
                definition.name
            )))?;
    }

    store
        .collection_by_id(&created.id)
        .ok_or_else(|| BatchError::CollectionNotFound(definition.name.clone()))
}

fn ensure_modes<S: VariableStore + ?Sized>(
    store: &mut S,
    collection: Collection,
    definition: &CollectionDefinition,
) -> Result<Collection, BatchError> {
    let mut present: HashSet<&str> = collection.modes.iter().map(|m| m.name.as_str()).collect();
    let mut mode_count = collection.modes.len();
    let mut added = false;

    for mode in &definition.modes {
        if present.contains(mode.as_str()) {
            continue;
        }
        if mode_count >= MAX_MODES {
            return Err(BatchError::ModeLimit {
                collection: definition.name.clone(),
                mode: mode.clone(),
                limit: MAX_MODES,
            });
        }

        store
            .add_mode(&collection.id, mode)
            .map_err(BatchError::store(format!(
                "add mode '{}' to '{}'",
                mode, definition.name
            )))?;
        debug!(collection = %definition.name, mode = %mode, "added mode");
        present.insert(mode.as_str());
        mode_count += 1;
        added = true;
    }

    if !added {
        return Ok(collection);
    }
    store
        .collection_by_id(&collection.id)
        .ok_or_else(|| BatchError::CollectionNotFound(definition.name.clone()))
}

fn upsert_variable<S: VariableStore + ?Sized>(
    store: &mut S,
    collection: &Collection,
    name: &str,
    definition: &VariableDefinition,
    result: &mut ProcessingResult,
) -> Option<Variable> {
    if let Some(existing) = store.variable_by_name(&collection.id, name) {
        result.variables_updated += 1;
        return Some(existing);
    }

    let data_type = definition.kind.data_type();
    match store.create_variable(name, &collection.id, data_type) {
        Ok(variable) => {
            debug!(collection = %collection.name, variable = %name, %data_type, "created variable");
            result.variables_created += 1;
            Some(variable)
        }
        Err(e) => {
            result.record_error(format!(
                "{}/{}: could not create variable: {}",
                collection.name, name, e
            ));
            None
        }
    }
}

fn assign_literal<S: VariableStore + ?Sized>(
    store: &mut S,
    collection: &Collection,
    variable: &Variable,
    definition: &VariableDefinition,
    mode: &Mode,
    result: &mut ProcessingResult,
) {
    let Some(raw) = definition.value_for(&mode.name) else {
        return;
    };

    let literal = match resolve_declared(raw, &definition.kind) {
        Ok(Some(literal)) => literal,
        Ok(None) => return,
        Err(e) => {
            result.record_error(format!(
                "{}/{} [{}]: {}",
                collection.name, variable.name, mode.name, e
            ));
            return;
        }
    };

    if literal.data_type() != variable.resolved_type {
        result.record_error(format!(
            "{}/{} [{}]: type mismatch, variable is {} but value is {}",
            collection.name,
            variable.name,
            mode.name,
            variable.resolved_type,
            literal.data_type()
        ));
        return;
    }

    debug!(
        collection = %collection.name,
        variable = %variable.name,
        mode = %mode.name,
        value = %literal,
        "assigning literal"
    );
    if let Err(e) = store.set_value_for_mode(&variable.id, &mode.id, VariableValue::Literal(literal)) {
        result.record_error(format!(
            "{}/{} [{}]: {}",
            collection.name, variable.name, mode.name, e
        ));
    }
}
