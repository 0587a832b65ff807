//! The target variable store.
//!
//! [`VariableStore`] is the capability set the pipeline needs from a host:
//! collection, mode and variable lookup and creation plus per-mode value
//! assignment. Entities are returned as owned snapshots; their ids are minted
//! by the store and never fabricated by callers.
//!
//! [`MemoryStore`] is a complete in-process implementation used by the CLI
//! and by tests.

mod memory;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::{DataType, LiteralValue};

pub use memory::MemoryStore;

/// The maximum number of modes a collection may hold.
pub const MAX_MODES: usize = 4;

macro_rules! store_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

store_id!(
    /// Identifier of a collection.
    CollectionId
);
store_id!(
    /// Identifier of a mode within a collection.
    ModeId
);
store_id!(
    /// Identifier of a variable.
    VariableId
);

/// A named mode of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: ModeId,
    pub name: String,
}

/// A collection of variables sharing an ordered set of modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub variable_ids: Vec<VariableId>,
}

impl Collection {
    /// The first (default) mode.
    pub fn default_mode(&self) -> Option<&Mode> {
        self.modes.first()
    }

    pub fn mode_by_name(&self, name: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.name == name)
    }
}

/// A value held in one mode slot of a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableValue {
    Literal(LiteralValue),
    /// A pointer to another variable.
    Alias(VariableId),
}

/// A typed variable with one value slot per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    pub collection_id: CollectionId,
    pub resolved_type: DataType,
    #[serde(default)]
    pub values: IndexMap<ModeId, VariableValue>,
}

/// A rejected store operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("collection not found: {0}")]
    CollectionNotFound(CollectionId),
    #[error("variable not found: {0}")]
    VariableNotFound(VariableId),
    #[error("mode {mode} does not belong to collection {collection}")]
    ModeNotFound { collection: CollectionId, mode: ModeId },
    #[error("collection '{name}' already exists")]
    DuplicateCollection { name: String },
    #[error("variable '{name}' already exists in collection {collection}")]
    DuplicateVariable { collection: CollectionId, name: String },
    #[error("collection '{collection}' already has {limit} modes; cannot add '{mode}'")]
    ModeLimit {
        collection: String,
        mode: String,
        limit: usize,
    },
    #[error("cannot assign a {actual} value to {expected} variable '{variable}'")]
    TypeMismatch {
        variable: String,
        expected: DataType,
        actual: DataType,
    },
    #[error("variable '{variable}' cannot alias itself")]
    SelfAlias { variable: String },
}

/// Host store capabilities consumed by the pipeline.
///
/// Lookups return owned snapshots. Implementations are expected to enforce
/// [`MAX_MODES`] in [`add_mode`](VariableStore::add_mode) and to reject
/// values whose type differs from the variable's resolved type.
pub trait VariableStore {
    /// All collections, in creation order.
    fn collections(&self) -> Vec<Collection>;

    fn collection_by_id(&self, id: &CollectionId) -> Option<Collection>;

    fn collection_by_name(&self, name: &str) -> Option<Collection> {
        self.collections().into_iter().find(|c| c.name == name)
    }

    /// Creates a collection holding exactly one default mode.
    fn create_collection(&mut self, name: &str) -> Result<Collection, StoreError>;

    fn rename_mode(
        &mut self,
        collection: &CollectionId,
        mode: &ModeId,
        name: &str,
    ) -> Result<(), StoreError>;

    /// Adds a mode, failing if the collection already holds [`MAX_MODES`].
    fn add_mode(&mut self, collection: &CollectionId, name: &str) -> Result<ModeId, StoreError>;

    fn create_variable(
        &mut self,
        name: &str,
        collection: &CollectionId,
        data_type: DataType,
    ) -> Result<Variable, StoreError>;

    fn variable_by_id(&self, id: &VariableId) -> Option<Variable>;

    fn variable_by_name(&self, collection: &CollectionId, name: &str) -> Option<Variable> {
        let collection = self.collection_by_id(collection)?;
        collection
            .variable_ids
            .iter()
            .filter_map(|id| self.variable_by_id(id))
            .find(|v| v.name == name)
    }

    /// Every variable across every collection.
    fn variables(&self) -> Vec<Variable>;

    fn set_value_for_mode(
        &mut self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> Result<(), StoreError>;
}
