//! Depth-first topological ordering of collections.

use std::collections::HashMap;

use thiserror::Error;

use super::DependencyGraph;
use crate::document::CollectionDefinition;

/// Error returned when a batch cannot be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// Collections reference each other in a loop.
    #[error("circular dependency detected at collection '{collection}': {}", .path.join(" -> "))]
    Cycle {
        collection: String,
        path: Vec<String>,
    },
    /// Two collections in the batch share a name.
    #[error("collection '{name}' is defined more than once")]
    DuplicateCollection { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct Walk<'a> {
    graph: &'a DependencyGraph,
    by_name: HashMap<&'a str, &'a CollectionDefinition>,
    marks: HashMap<&'a str, Mark>,
    stack: Vec<&'a str>,
    order: Vec<&'a CollectionDefinition>,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, name: &'a str) -> Result<(), SortError> {
        match self.marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => {
                let start = self.stack.iter().position(|n| *n == name).unwrap_or(0);
                let mut path: Vec<String> =
                    self.stack[start..].iter().map(|n| n.to_string()).collect();
                path.push(name.to_string());
                return Err(SortError::Cycle {
                    collection: name.to_string(),
                    path,
                });
            }
            None => {}
        }

        self.marks.insert(name, Mark::InProgress);
        self.stack.push(name);

        let graph = self.graph;
        for dep in graph.dependencies(name) {
            // References to collections outside the batch surface later as
            // alias errors, not ordering errors.
            if self.by_name.contains_key(dep) {
                self.visit(dep)?;
            }
        }

        self.stack.pop();
        self.marks.insert(name, Mark::Done);
        if let Some(&def) = self.by_name.get(name) {
            self.order.push(def);
        }
        Ok(())
    }
}

/// Orders collections so each appears after every collection it depends on.
///
/// Roots are visited in input order and dependencies in discovery order, so
/// the result is deterministic, and collections without cross-collection
/// references keep their relative input order. A cycle aborts the sort
/// without producing a partial order.
///
/// # Example
///
/// ```rust
/// use tokensmith::document::{CollectionDefinition, VariableDefinition};
/// use tokensmith::graph::{topological_sort, DependencyGraph};
///
/// let theme = CollectionDefinition::new("Theme", ["Light"]).variable(
///     "bg",
///     VariableDefinition::new("color").value("Light", "{Palette.white}"),
/// );
/// let palette = CollectionDefinition::new("Palette", ["Default"]);
/// let batch = vec![theme, palette];
///
/// let graph = DependencyGraph::build(&batch);
/// let order: Vec<_> = topological_sort(&batch, &graph)
///     .unwrap()
///     .iter()
///     .map(|c| c.name.as_str())
///     .collect();
/// assert_eq!(order, vec!["Palette", "Theme"]);
/// ```
pub fn topological_sort<'a>(
    collections: &'a [CollectionDefinition],
    graph: &'a DependencyGraph,
) -> Result<Vec<&'a CollectionDefinition>, SortError> {
    let mut by_name = HashMap::with_capacity(collections.len());
    for collection in collections {
        if by_name.insert(collection.name.as_str(), collection).is_some() {
            return Err(SortError::DuplicateCollection {
                name: collection.name.clone(),
            });
        }
    }

    let mut walk = Walk {
        graph,
        by_name,
        marks: HashMap::new(),
        stack: Vec::new(),
        order: Vec::with_capacity(collections.len()),
    };

    for collection in collections {
        walk.visit(&collection.name)?;
    }

    Ok(walk.order)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::document::VariableDefinition;
    use proptest::prelude::*;

    /// Builds an acyclic batch: collection `i` may only reference `j < i`,
    /// then shuffles the input order.
    fn acyclic_batch(edges: &[(usize, usize)], size: usize, rotate: usize) -> Vec<CollectionDefinition> {
        let mut batch: Vec<CollectionDefinition> = (0..size)
            .map(|i| CollectionDefinition::new(&format!("C{}", i), ["Default"]))
            .collect();
        for (k, &(a, b)) in edges.iter().enumerate() {
            let (a, b) = (a % size, b % size);
            let (from, to) = (a.max(b), a.min(b));
            if from == to {
                continue;
            }
            let def = std::mem::replace(&mut batch[from], CollectionDefinition::new("tmp", ["Default"]));
            batch[from] = def.variable(
                &format!("v{}", k),
                VariableDefinition::new("string").value("Default", format!("{{C{}.x}}", to)),
            );
        }
        batch.rotate_left(rotate % size);
        batch
    }

    proptest! {
        #[test]
        fn acyclic_order_respects_every_edge(
            size in 1usize..8,
            edges in prop::collection::vec((0usize..8, 0usize..8), 0..16),
            rotate in 0usize..8,
        ) {
            let batch = acyclic_batch(&edges, size, rotate);
            let graph = DependencyGraph::build(&batch);
            let order = topological_sort(&batch, &graph).unwrap();

            prop_assert_eq!(order.len(), batch.len());
            let position: HashMap<&str, usize> = order
                .iter()
                .enumerate()
                .map(|(i, c)| (c.name.as_str(), i))
                .collect();
            prop_assert_eq!(position.len(), batch.len());

            for collection in &batch {
                for dep in graph.dependencies(&collection.name) {
                    prop_assert!(position[dep] < position[collection.name.as_str()]);
                }
            }
        }
    }
}
