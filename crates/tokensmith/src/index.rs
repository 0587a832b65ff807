//! Rebuildable lookup table over the store's variables.
//!
//! The pipeline reads store state through a [`VariableIndex`] instead of
//! querying for every alias. The index is built at batch start and rebuilt
//! once after the creation pass so that it sees every variable just created.

use std::collections::HashMap;

use crate::store::{CollectionId, VariableId, VariableStore};
use crate::value::DataType;

/// A variable as recorded in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedVariable {
    pub id: VariableId,
    pub name: String,
    pub collection_id: CollectionId,
    pub data_type: DataType,
}

/// Variables of every collection, addressable by flat name or by
/// `(collection name, variable name)`.
#[derive(Debug, Clone, Default)]
pub struct VariableIndex {
    variables: Vec<IndexedVariable>,
    collections: HashMap<String, CollectionId>,
    qualified: HashMap<(CollectionId, String), usize>,
}

impl VariableIndex {
    /// Builds the index from current store state.
    pub fn build<S: VariableStore + ?Sized>(store: &S) -> Self {
        let mut index = Self::default();
        index.refresh(store);
        index
    }

    /// Replaces the index contents with current store state.
    pub fn refresh<S: VariableStore + ?Sized>(&mut self, store: &S) {
        self.variables.clear();
        self.collections.clear();
        self.qualified.clear();

        for collection in store.collections() {
            self.collections
                .entry(collection.name.clone())
                .or_insert(collection.id);
        }

        for variable in store.variables() {
            let slot = self.variables.len();
            self.qualified
                .entry((variable.collection_id.clone(), variable.name.clone()))
                .or_insert(slot);
            self.variables.push(IndexedVariable {
                id: variable.id,
                name: variable.name,
                collection_id: variable.collection_id,
                data_type: variable.resolved_type,
            });
        }

        tracing::debug!(
            collections = self.collections.len(),
            variables = self.variables.len(),
            "variable index refreshed"
        );
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Finds a variable anywhere in the store by name.
    ///
    /// Returns the first variable, in store order, whose name matches either
    /// `name` or `name` with every `.` replaced by `/`. `Gray.90` therefore
    /// also finds a variable named `Gray/90`, and whichever of the two
    /// spellings was created first wins.
    pub fn find_flat(&self, name: &str) -> Option<&IndexedVariable> {
        let slashed = name.replace('.', "/");
        self.variables
            .iter()
            .find(|v| v.name == name || v.name == slashed)
    }

    pub fn collection_id(&self, name: &str) -> Option<&CollectionId> {
        self.collections.get(name)
    }

    /// Finds a variable by exact collection name and exact variable name.
    pub fn find_qualified(&self, collection: &str, name: &str) -> Option<&IndexedVariable> {
        let collection_id = self.collections.get(collection)?;
        let slot = self
            .qualified
            .get(&(collection_id.clone(), name.to_string()))?;
        self.variables.get(*slot)
    }
}
