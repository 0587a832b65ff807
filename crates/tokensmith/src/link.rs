//! Link pass: resolve alias strings to variables and point values at them.
//!
//! Runs after every collection of the batch went through the creation pass
//! and the [`VariableIndex`] was refreshed, so forward references and
//! references between collections in either order all resolve. Failures are
//! recorded and never stop the pass.

use tracing::debug;

use crate::document::CollectionDefinition;
use crate::index::VariableIndex;
use crate::report::ProcessingResult;
use crate::store::{VariableStore, VariableValue};
use crate::value::AliasRef;

/// Links every alias value of one collection definition.
///
/// Returns the number of links made.
pub fn link_collection<S: VariableStore + ?Sized>(
    store: &mut S,
    index: &VariableIndex,
    definition: &CollectionDefinition,
    result: &mut ProcessingResult,
) -> usize {
    let Some(collection) = index
        .collection_id(&definition.name)
        .and_then(|id| store.collection_by_id(id))
    else {
        result.record_error(format!(
            "{}: collection missing after creation pass, aliases not linked",
            definition.name
        ));
        return 0;
    };

    let mut linked = 0;
    for (name, variable_def) in &definition.variables {
        for mode in &collection.modes {
            let Some(raw) = variable_def.value_for(&mode.name) else {
                continue;
            };
            let Some(text) = raw.as_str().filter(|_| raw.is_alias()) else {
                continue;
            };
            let location = format!("{}/{} [{}]", definition.name, name, mode.name);
            let text = text.trim();

            let Some(source) = index.find_qualified(&definition.name, name) else {
                result.record_error(format!(
                    "{}: variable was not created, cannot link {}",
                    location, text
                ));
                continue;
            };

            let Some(alias) = AliasRef::parse(text) else {
                result.record_error(format!(
                    "{}: invalid alias {}, expected {{Collection.variable}}",
                    location, text
                ));
                continue;
            };

            if index.collection_id(&alias.collection).is_none() {
                result.record_error(format!(
                    "{}: unresolved alias {}, collection '{}' not found",
                    location, text, alias.collection
                ));
                continue;
            }

            let Some(target) = index.find_qualified(&alias.collection, &alias.variable) else {
                result.record_error(format!(
                    "{}: unresolved alias {}, variable '{}' not found in '{}'",
                    location, text, alias.variable, alias.collection
                ));
                continue;
            };

            match store.set_value_for_mode(
                &source.id,
                &mode.id,
                VariableValue::Alias(target.id.clone()),
            ) {
                Ok(()) => {
                    debug!(from = %location, to = %alias, "linked alias");
                    linked += 1;
                }
                Err(e) => {
                    result.record_error(format!("{}: could not link {}: {}", location, text, e));
                }
            }
        }
    }

    linked
}
