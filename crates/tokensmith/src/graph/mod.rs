//! Collection dependency graph and ordering.
//!
//! Collections may alias variables of other collections. Before anything is
//! created, the batch is ordered so that every collection comes after the
//! collections it references:
//!
//! 1. [`DependencyGraph::build`] scans every value for `{Other.…}` references
//! 2. [`topological_sort`] orders the batch, failing on a cycle

mod sort;

use indexmap::{IndexMap, IndexSet};

use crate::document::CollectionDefinition;
use crate::value::referenced_collection;

pub use sort::{topological_sort, SortError};

/// Directed graph over collection names; an edge `A -> B` means A depends on B.
///
/// Nodes and edges keep the order in which they were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: IndexMap<String, IndexSet<String>>,
}

impl DependencyGraph {
    /// Builds the graph for a batch of collections.
    ///
    /// Every collection becomes a node. Any string value starting with `{` is
    /// read up to its first `.`, and if that names a different collection an
    /// edge is added. References to collections outside the batch are kept as
    /// edges but ignored when sorting.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tokensmith::document::{CollectionDefinition, VariableDefinition};
    /// use tokensmith::graph::DependencyGraph;
    ///
    /// let theme = CollectionDefinition::new("Theme", ["Light"]).variable(
    ///     "bg",
    ///     VariableDefinition::new("color").value("Light", "{Palette.white}"),
    /// );
    /// let palette = CollectionDefinition::new("Palette", ["Default"]);
    ///
    /// let graph = DependencyGraph::build(&[theme, palette]);
    /// assert!(graph.depends_on("Theme", "Palette"));
    /// ```
    pub fn build(collections: &[CollectionDefinition]) -> Self {
        let mut graph = Self::default();

        for collection in collections {
            graph.add_node(&collection.name);

            for variable in collection.variables.values() {
                for raw in variable.values.values() {
                    let Some(target) = raw.as_str().and_then(referenced_collection) else {
                        continue;
                    };
                    if target != collection.name {
                        graph.add_edge(&collection.name, target);
                    }
                }
            }
        }

        graph
    }

    pub fn add_node(&mut self, name: &str) {
        self.edges.entry(name.to_string()).or_default();
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// The collections `name` depends on, in discovery order.
    pub fn dependencies(&self, name: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(name)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }

    pub fn depends_on(&self, from: &str, to: &str) -> bool {
        self.edges.get(from).is_some_and(|deps| deps.contains(to))
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(IndexSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::VariableDefinition;

    fn collection(name: &str, refs: &[&str]) -> CollectionDefinition {
        let mut def = CollectionDefinition::new(name, ["Default"]);
        for (i, r) in refs.iter().enumerate() {
            def = def.variable(
                &format!("v{}", i),
                VariableDefinition::new("color").value("Default", *r),
            );
        }
        def
    }

    #[test]
    fn test_cross_collection_reference_adds_edge() {
        let graph = DependencyGraph::build(&[
            collection("Theme", &["{Palette.gray.900}"]),
            collection("Palette", &["#000000"]),
        ]);
        assert!(graph.depends_on("Theme", "Palette"));
        assert!(!graph.depends_on("Palette", "Theme"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_self_reference_is_ignored() {
        let graph = DependencyGraph::build(&[collection("Palette", &["{Palette.base}"])]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_references_collapse() {
        let graph = DependencyGraph::build(&[collection(
            "Theme",
            &["{Palette.a}", "{Palette.b}", "{Sizes.c}"],
        )]);
        assert_eq!(graph.dependencies("Theme").collect::<Vec<_>>(), vec!["Palette", "Sizes"]);
    }

    #[test]
    fn test_dangling_reference_is_not_a_node() {
        let graph = DependencyGraph::build(&[collection("Theme", &["{Missing.x}"])]);
        assert!(graph.depends_on("Theme", "Missing"));
        assert!(!graph.contains("Missing"));
    }

    #[test]
    fn test_non_reference_values_are_ignored() {
        let graph = DependencyGraph::build(&[collection("Theme", &["#fff", "{NoDot}", "a.b"])]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_all_modes_are_scanned() {
        let theme = CollectionDefinition::new("Theme", ["Light", "Dark"]).variable(
            "bg",
            VariableDefinition::new("color")
                .value("Light", "#fff")
                .value("Dark", "{Palette.black}"),
        );
        let graph = DependencyGraph::build(&[theme]);
        assert!(graph.depends_on("Theme", "Palette"));
    }
}
