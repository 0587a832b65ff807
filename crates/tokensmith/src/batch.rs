//! Batch orchestration.
//!
//! A collection batch runs in two explicit stages over the same sorted list:
//!
//! 1. **Creation**: collections in dependency order, literals assigned
//! 2. **Linking**: after *every* collection exists and the index has been
//!    refreshed, aliases are linked in input order
//!
//! The flat-map entry point ([`apply_flat`]) adds one mode to an existing
//! collection and resolves aliases immediately against the index.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::document::CollectionDefinition;
use crate::error::BatchError;
use crate::graph::{topological_sort, DependencyGraph};
use crate::index::VariableIndex;
use crate::link::link_collection;
use crate::materialize::materialize_collection;
use crate::report::{ProcessingResult, Report};
use crate::store::{CollectionId, Mode, VariableStore, VariableValue, MAX_MODES};
use crate::value::{resolve_flat, FlatValue, RawValue};

/// Default number of error messages kept in a [`Report`].
pub const DEFAULT_MAX_REPORTED_ERRORS: usize = 5;

/// Default display width of a reported error message.
pub const DEFAULT_LINE_WIDTH: usize = 120;

/// Options controlling how a batch reports its outcome.
///
/// # Example
///
/// ```rust
/// use tokensmith::BatchOptions;
///
/// let options = BatchOptions::new().max_reported_errors(10).line_width(80);
/// assert_eq!(options.max_reported_errors, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// How many error messages the report lists before "+K more".
    pub max_reported_errors: usize,
    /// Display width each listed message is clipped to.
    pub line_width: usize,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_reported_errors(mut self, n: usize) -> Self {
        self.max_reported_errors = n;
        self
    }

    pub fn line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_reported_errors: DEFAULT_MAX_REPORTED_ERRORS,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// Applies a batch of collection definitions and always returns a report.
///
/// Structural failures (a dependency cycle, a collection running out of mode
/// slots) stop the batch and are carried in [`Report::aborted`] next to the
/// counters accumulated so far.
///
/// `index` is not read before the creation pass: it is refreshed from the
/// store once every collection exists, used for linking, and left reflecting
/// the store afterwards. An empty `VariableIndex::default()` is fine.
pub fn apply_collections<S: VariableStore + ?Sized>(
    store: &mut S,
    index: &mut VariableIndex,
    collections: &[CollectionDefinition],
    options: &BatchOptions,
) -> Report {
    let mut result = ProcessingResult::new();
    match run_collections(store, index, collections, &mut result) {
        Ok(()) => Report::new(result, options),
        Err(e) => {
            warn!(error = %e, "batch aborted");
            Report::new(result, options).with_abort(e.to_string())
        }
    }
}

/// Like [`apply_collections`], but returns structural failures as errors.
pub fn try_apply_collections<S: VariableStore + ?Sized>(
    store: &mut S,
    index: &mut VariableIndex,
    collections: &[CollectionDefinition],
    options: &BatchOptions,
) -> Result<Report, BatchError> {
    let mut result = ProcessingResult::new();
    run_collections(store, index, collections, &mut result)?;
    Ok(Report::new(result, options))
}

fn run_collections<S: VariableStore + ?Sized>(
    store: &mut S,
    index: &mut VariableIndex,
    collections: &[CollectionDefinition],
    result: &mut ProcessingResult,
) -> Result<(), BatchError> {
    info!(collections = collections.len(), "starting batch");

    let graph = DependencyGraph::build(collections);
    let order = topological_sort(collections, &graph)?;
    info!(
        order = ?order.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        "resolved collection order"
    );

    for definition in &order {
        materialize_collection(store, definition, result)?;
    }

    index.refresh(store);

    let mut linked = 0;
    for definition in collections {
        linked += link_collection(store, index, definition, result);
    }

    info!(
        collections_created = result.collections_created,
        collections_updated = result.collections_updated,
        variables_created = result.variables_created,
        variables_updated = result.variables_updated,
        aliases_linked = linked,
        errors = result.errors.len(),
        "batch complete"
    );
    Ok(())
}

/// A flat `{ name: value }` map to apply as a new mode of an existing collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRequest {
    pub collection_id: CollectionId,
    pub mode_name: String,
    pub values: IndexMap<String, RawValue>,
}

/// Adds a mode to an existing collection and fills it from a flat map.
///
/// Each value's type is inferred from its shape. Missing variables are
/// created with the inferred type; aliases are resolved against `index`,
/// which should reflect the store when the call starts.
pub fn apply_flat<S: VariableStore + ?Sized>(
    store: &mut S,
    index: &VariableIndex,
    request: &FlatRequest,
    options: &BatchOptions,
) -> Report {
    let mut result = ProcessingResult::new();
    match run_flat(store, index, request, &mut result) {
        Ok(()) => Report::new(result, options).with_mode(&request.mode_name),
        Err(e) => {
            warn!(error = %e, "flat update aborted");
            Report::new(result, options)
                .with_mode(&request.mode_name)
                .with_abort(e.to_string())
        }
    }
}

/// Like [`apply_flat`], but returns structural failures as errors.
pub fn try_apply_flat<S: VariableStore + ?Sized>(
    store: &mut S,
    index: &VariableIndex,
    request: &FlatRequest,
    options: &BatchOptions,
) -> Result<Report, BatchError> {
    let mut result = ProcessingResult::new();
    run_flat(store, index, request, &mut result)?;
    Ok(Report::new(result, options).with_mode(&request.mode_name))
}

fn run_flat<S: VariableStore + ?Sized>(
    store: &mut S,
    index: &VariableIndex,
    request: &FlatRequest,
    result: &mut ProcessingResult,
) -> Result<(), BatchError> {
    let collection = store
        .collection_by_id(&request.collection_id)
        .ok_or_else(|| BatchError::CollectionNotFound(request.collection_id.to_string()))?;

    if collection.modes.len() >= MAX_MODES {
        return Err(BatchError::ModeLimit {
            collection: collection.name.clone(),
            mode: request.mode_name.clone(),
            limit: MAX_MODES,
        });
    }

    let mode_id = store
        .add_mode(&collection.id, &request.mode_name)
        .map_err(BatchError::store(format!(
            "add mode '{}' to '{}'",
            request.mode_name, collection.name
        )))?;
    result.collections_updated += 1;
    info!(collection = %collection.name, mode = %request.mode_name, "added mode");

    for (name, raw) in &request.values {
        let resolved = match resolve_flat(raw, index) {
            Ok(value) => Some(value),
            Err(e) => {
                result.record_error(format!("{}/{}: {}", collection.name, name, e));
                None
            }
        };

        let variable = match store.variable_by_name(&collection.id, name) {
            Some(existing) => {
                result.variables_updated += 1;
                existing
            }
            None => {
                let Some(data_type) = resolved.as_ref().map(FlatValue::data_type) else {
                    warn!(variable = %name, "could not infer type, variable skipped");
                    continue;
                };
                match store.create_variable(name, &collection.id, data_type) {
                    Ok(created) => {
                        result.variables_created += 1;
                        created
                    }
                    Err(e) => {
                        result.record_error(format!(
                            "{}/{}: could not create variable: {}",
                            collection.name, name, e
                        ));
                        continue;
                    }
                }
            }
        };

        let Some(resolved) = resolved else {
            continue;
        };
        if resolved.data_type() != variable.resolved_type {
            result.record_error(format!(
                "{}/{} [{}]: type mismatch, variable is {} but value is {}",
                collection.name,
                name,
                request.mode_name,
                variable.resolved_type,
                resolved.data_type()
            ));
            continue;
        }

        let value = match resolved {
            FlatValue::Literal(literal) => VariableValue::Literal(literal),
            FlatValue::Alias { target, .. } => VariableValue::Alias(target),
        };
        if let Err(e) = store.set_value_for_mode(&variable.id, &mode_id, value) {
            result.record_error(format!(
                "{}/{} [{}]: {}",
                collection.name, name, request.mode_name, e
            ));
        }
    }

    Ok(())
}

/// A collection as presented to a user choosing where to add a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub name: String,
    pub modes: Vec<Mode>,
    pub variable_count: usize,
}

/// Lists every collection in the store with its modes.
pub fn list_collections<S: VariableStore + ?Sized>(store: &S) -> Vec<CollectionSummary> {
    store
        .collections()
        .into_iter()
        .map(|c| CollectionSummary {
            variable_count: c.variable_ids.len(),
            id: c.id,
            name: c.name,
            modes: c.modes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::VariableDefinition;
    use crate::store::MemoryStore;
    use crate::value::{DataType, LiteralValue};

    fn flat(collection: &CollectionId, mode: &str, values: &[(&str, RawValue)]) -> FlatRequest {
        FlatRequest {
            collection_id: collection.clone(),
            mode_name: mode.to_string(),
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_options_default() {
        let options = BatchOptions::default();
        assert_eq!(options.max_reported_errors, DEFAULT_MAX_REPORTED_ERRORS);
        assert_eq!(options.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options: BatchOptions = serde_json::from_str(r#"{"max_reported_errors": 2}"#).unwrap();
        assert_eq!(options.max_reported_errors, 2);
        assert_eq!(options.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_apply_collections_orders_and_links() {
        let batch = vec![
            CollectionDefinition::new("Theme", ["Light", "Dark"]).variable(
                "bg",
                VariableDefinition::new("color")
                    .value("Light", "{Palette.white}")
                    .value("Dark", "{Palette.black}"),
            ),
            CollectionDefinition::new("Palette", ["Default"])
                .variable("white", VariableDefinition::new("color").value("Default", "#ffffff"))
                .variable("black", VariableDefinition::new("color").value("Default", "#000000")),
        ];
        let mut store = MemoryStore::new();
        let mut index = VariableIndex::build(&store);
        let report = apply_collections(&mut store, &mut index, &batch, &BatchOptions::default());

        assert!(report.is_clean(), "{}", report);
        assert_eq!(report.collections_created, 2);
        assert_eq!(report.variables_created, 3);

        // Palette was created first even though it is listed second.
        let names: Vec<_> = list_collections(&store).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Palette", "Theme"]);

        let black = store.variable_named("Palette", "black").unwrap().id.clone();
        let bg = store.variable_named("Theme", "bg").unwrap();
        assert!(bg.values.values().any(|v| v == &VariableValue::Alias(black.clone())));
    }

    #[test]
    fn test_apply_collections_fills_an_empty_index() {
        let mut store = MemoryStore::new();
        let mut index = VariableIndex::default();
        let batch = vec![CollectionDefinition::new("Palette", ["Default"])
            .variable("white", VariableDefinition::new("color").value("Default", "#ffffff"))];

        let report = apply_collections(&mut store, &mut index, &batch, &BatchOptions::default());
        assert!(report.is_clean(), "{}", report);
        assert_eq!(index.len(), 1);
        assert!(index.find_qualified("Palette", "white").is_some());
    }

    #[test]
    fn test_cycle_aborts_before_any_creation() {
        let batch = vec![
            CollectionDefinition::new("A", ["m"])
                .variable("x", VariableDefinition::new("string").value("m", "{B.y}")),
            CollectionDefinition::new("B", ["m"])
                .variable("y", VariableDefinition::new("string").value("m", "{A.x}")),
        ];
        let mut store = MemoryStore::new();
        let mut index = VariableIndex::default();
        let report = apply_collections(&mut store, &mut index, &batch, &BatchOptions::default());

        assert!(report.is_aborted());
        assert!(report.aborted.as_deref().unwrap().contains("circular dependency"));
        assert!(store.collections().is_empty());

        let err = try_apply_collections(&mut store, &mut index, &batch, &BatchOptions::default())
            .unwrap_err();
        assert!(matches!(err, BatchError::Order(_)));
    }

    #[test]
    fn test_apply_flat_adds_mode_and_values() {
        let mut store = MemoryStore::new();
        let collection = store.create_collection("Primitives").unwrap();
        store
            .create_variable("Gray/90", &collection.id, DataType::Color)
            .unwrap();
        let index = VariableIndex::build(&store);

        let request = flat(
            &collection.id,
            "Dark",
            &[
                ("Gray/90", RawValue::from("#1a1a1a")),
                ("radius", RawValue::Number(4.0)),
                ("enabled", RawValue::Bool(true)),
                ("surface", RawValue::from("{Gray.90}")),
                ("font", RawValue::from("Inter")),
            ],
        );
        let report = apply_flat(&mut store, &index, &request, &BatchOptions::default());

        assert!(report.is_clean(), "{}", report);
        assert_eq!(report.mode.as_deref(), Some("Dark"));
        assert_eq!(report.variables_updated, 1);
        assert_eq!(report.variables_created, 4);

        let collection = store.collection_by_id(&collection.id).unwrap();
        let dark = collection.mode_by_name("Dark").unwrap().id.clone();
        let gray = store.variable_named("Primitives", "Gray/90").unwrap().clone();
        let surface = store.variable_named("Primitives", "surface").unwrap();
        assert_eq!(surface.resolved_type, DataType::Color);
        assert_eq!(surface.values[&dark], VariableValue::Alias(gray.id.clone()));
        assert_eq!(
            store.variable_named("Primitives", "radius").unwrap().values[&dark],
            VariableValue::Literal(LiteralValue::Float(4.0))
        );
    }

    #[test]
    fn test_apply_flat_skips_unresolved_alias() {
        let mut store = MemoryStore::new();
        let collection = store.create_collection("Primitives").unwrap();
        let index = VariableIndex::build(&store);

        let request = flat(&collection.id, "Dark", &[("surface", RawValue::from("{Gray.90}"))]);
        let report = apply_flat(&mut store, &index, &request, &BatchOptions::default());

        assert!(!report.is_aborted());
        assert_eq!(report.variables_created, 0);
        assert_eq!(report.error_count, 1);
        assert!(report.errors[0].contains("alias target not found: Gray.90"));
    }

    #[test]
    fn test_apply_flat_type_mismatch_is_recorded() {
        let mut store = MemoryStore::new();
        let collection = store.create_collection("Primitives").unwrap();
        store
            .create_variable("radius", &collection.id, DataType::Float)
            .unwrap();
        let index = VariableIndex::build(&store);

        let request = flat(&collection.id, "Dark", &[("radius", RawValue::from("#fff000"))]);
        let report = apply_flat(&mut store, &index, &request, &BatchOptions::default());
        assert_eq!(report.variables_updated, 1);
        assert!(report.errors[0].contains("type mismatch"));
    }

    #[test]
    fn test_apply_flat_refuses_fifth_mode() {
        let mut store = MemoryStore::new();
        let collection = store.create_collection("Theme").unwrap();
        for mode in ["B", "C", "D"] {
            store.add_mode(&collection.id, mode).unwrap();
        }
        let index = VariableIndex::build(&store);

        let request = flat(&collection.id, "E", &[("x", RawValue::Number(1.0))]);
        let err = try_apply_flat(&mut store, &index, &request, &BatchOptions::default()).unwrap_err();
        assert!(matches!(err, BatchError::ModeLimit { .. }));
        assert_eq!(store.collection_by_id(&collection.id).unwrap().modes.len(), 4);
        assert!(store.variables().is_empty());
    }

    #[test]
    fn test_apply_flat_unknown_collection() {
        let mut store = MemoryStore::new();
        let index = VariableIndex::default();
        let request = flat(&CollectionId::from("VariableCollectionId:404"), "Dark", &[]);
        let report = apply_flat(&mut store, &index, &request, &BatchOptions::default());
        assert_eq!(
            report.aborted.as_deref(),
            Some("collection not found: VariableCollectionId:404")
        );
    }

    #[test]
    fn test_list_collections() {
        let mut store = MemoryStore::new();
        let collection = store.create_collection("Theme").unwrap();
        store.add_mode(&collection.id, "Dark").unwrap();
        store
            .create_variable("bg", &collection.id, DataType::Color)
            .unwrap();

        let summaries = list_collections(&store);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Theme");
        assert_eq!(summaries[0].modes.len(), 2);
        assert_eq!(summaries[0].variable_count, 1);
    }
}
