//! In-memory variable store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    Collection, CollectionId, Mode, ModeId, StoreError, Variable, VariableId, VariableStore,
    VariableValue, MAX_MODES,
};
use crate::value::DataType;

/// Name given to the single mode every new collection starts with.
pub const DEFAULT_MODE_NAME: &str = "Mode 1";

/// A [`VariableStore`] held entirely in memory.
///
/// The store is serializable, so a snapshot can be written to disk and
/// loaded back between runs.
///
/// # Example
///
/// ```rust
/// use tokensmith::store::{MemoryStore, VariableStore};
///
/// let mut store = MemoryStore::new();
/// let collection = store.create_collection("Brand").unwrap();
/// assert_eq!(collection.modes.len(), 1);
/// store.add_mode(&collection.id, "Dark").unwrap();
/// assert_eq!(store.collection_by_name("Brand").unwrap().modes.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    collections: Vec<Collection>,
    #[serde(default)]
    variables: IndexMap<VariableId, Variable>,
    #[serde(default)]
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a variable by collection name and variable name.
    pub fn variable_named(&self, collection: &str, name: &str) -> Option<&Variable> {
        let collection = self.collections.iter().find(|c| c.name == collection)?;
        collection
            .variable_ids
            .iter()
            .filter_map(|id| self.variables.get(id))
            .find(|v| v.name == name)
    }

    fn mint(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn collection_mut(&mut self, id: &CollectionId) -> Result<&mut Collection, StoreError> {
        self.collections
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::CollectionNotFound(id.clone()))
    }
}

impl VariableStore for MemoryStore {
    fn collections(&self) -> Vec<Collection> {
        self.collections.clone()
    }

    fn collection_by_id(&self, id: &CollectionId) -> Option<Collection> {
        self.collections.iter().find(|c| &c.id == id).cloned()
    }

    fn collection_by_name(&self, name: &str) -> Option<Collection> {
        self.collections.iter().find(|c| c.name == name).cloned()
    }

    fn create_collection(&mut self, name: &str) -> Result<Collection, StoreError> {
        if self.collections.iter().any(|c| c.name == name) {
            return Err(StoreError::DuplicateCollection {
                name: name.to_string(),
            });
        }

        let id = CollectionId(format!("VariableCollectionId:{}", self.mint()));
        let mode = Mode {
            id: ModeId(format!("ModeId:{}", self.mint())),
            name: DEFAULT_MODE_NAME.to_string(),
        };
        let collection = Collection {
            id,
            name: name.to_string(),
            modes: vec![mode],
            variable_ids: Vec::new(),
        };
        self.collections.push(collection.clone());
        Ok(collection)
    }

    fn rename_mode(
        &mut self,
        collection: &CollectionId,
        mode: &ModeId,
        name: &str,
    ) -> Result<(), StoreError> {
        let target = self.collection_mut(collection)?;
        let slot = target
            .modes
            .iter_mut()
            .find(|m| &m.id == mode)
            .ok_or_else(|| StoreError::ModeNotFound {
                collection: collection.clone(),
                mode: mode.clone(),
            })?;
        slot.name = name.to_string();
        Ok(())
    }

    fn add_mode(&mut self, collection: &CollectionId, name: &str) -> Result<ModeId, StoreError> {
        let mode_count = self.collection_mut(collection)?.modes.len();
        if mode_count >= MAX_MODES {
            let target = self.collection_mut(collection)?;
            return Err(StoreError::ModeLimit {
                collection: target.name.clone(),
                mode: name.to_string(),
                limit: MAX_MODES,
            });
        }

        let id = ModeId(format!("ModeId:{}", self.mint()));
        self.collection_mut(collection)?.modes.push(Mode {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    fn create_variable(
        &mut self,
        name: &str,
        collection: &CollectionId,
        data_type: DataType,
    ) -> Result<Variable, StoreError> {
        if self.variable_by_name(collection, name).is_some() {
            return Err(StoreError::DuplicateVariable {
                collection: collection.clone(),
                name: name.to_string(),
            });
        }

        let id = VariableId(format!("VariableID:{}", self.mint()));
        self.collection_mut(collection)?
            .variable_ids
            .push(id.clone());

        let variable = Variable {
            id: id.clone(),
            name: name.to_string(),
            collection_id: collection.clone(),
            resolved_type: data_type,
            values: IndexMap::new(),
        };
        self.variables.insert(id, variable.clone());
        Ok(variable)
    }

    fn variable_by_id(&self, id: &VariableId) -> Option<Variable> {
        self.variables.get(id).cloned()
    }

    fn variables(&self) -> Vec<Variable> {
        self.variables.values().cloned().collect()
    }

    fn set_value_for_mode(
        &mut self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> Result<(), StoreError> {
        let target = self
            .variables
            .get(variable)
            .ok_or_else(|| StoreError::VariableNotFound(variable.clone()))?;

        let owns_mode = self
            .collections
            .iter()
            .find(|c| c.id == target.collection_id)
            .is_some_and(|c| c.modes.iter().any(|m| &m.id == mode));
        if !owns_mode {
            return Err(StoreError::ModeNotFound {
                collection: target.collection_id.clone(),
                mode: mode.clone(),
            });
        }

        let actual = match &value {
            VariableValue::Literal(literal) => literal.data_type(),
            VariableValue::Alias(alias) => {
                if alias == variable {
                    return Err(StoreError::SelfAlias {
                        variable: target.name.clone(),
                    });
                }
                self.variables
                    .get(alias)
                    .ok_or_else(|| StoreError::VariableNotFound(alias.clone()))?
                    .resolved_type
            }
        };
        if actual != target.resolved_type {
            return Err(StoreError::TypeMismatch {
                variable: target.name.clone(),
                expected: target.resolved_type,
                actual,
            });
        }

        if let Some(slot) = self.variables.get_mut(variable) {
            slot.values.insert(mode.clone(), value);
        }
        Ok(())
    }
}
