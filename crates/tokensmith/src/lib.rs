//! # Tokensmith - design tokens into a mode-capped variable store
//!
//! Tokensmith takes a token document made of named collections, each with an
//! ordered list of modes (light/dark, compact/comfortable, ...) and typed
//! variables, and materializes it into a [`VariableStore`]. The store holds
//! at most [`MAX_MODES`] modes per collection and has no notion of references
//! between collections, so the pipeline takes care of both.
//!
//! ## Pipeline
//!
//! 1. [`DependencyGraph`](graph::DependencyGraph) scans values for
//!    `{Collection.variable}` references
//! 2. [`topological_sort`](graph::topological_sort) orders collections so that
//!    referenced collections are created first; cycles abort the batch
//! 3. [`materialize_collection`](materialize::materialize_collection) creates
//!    or updates collections, modes and variables and assigns literal values
//! 4. [`link_collection`](link::link_collection) runs once every collection
//!    exists and turns alias strings into links
//!
//! Values are normalized on the way in: colors written as hex, `rgb()`/`rgba()`
//! or `oklch()` all become one [`Rgba`](color::Rgba) representation.
//!
//! ## Example
//!
//! ```rust
//! use tokensmith::document::{CollectionDefinition, VariableDefinition};
//! use tokensmith::{apply_collections, BatchOptions, MemoryStore, VariableIndex};
//!
//! let batch = vec![
//!     CollectionDefinition::new("Theme", ["Light", "Dark"]).variable(
//!         "bg",
//!         VariableDefinition::new("color")
//!             .value("Light", "{Palette.white}")
//!             .value("Dark", "oklch(0.2 0.02 260)"),
//!     ),
//!     CollectionDefinition::new("Palette", ["Default"])
//!         .variable("white", VariableDefinition::new("color").value("Default", "#ffffff")),
//! ];
//!
//! let mut store = MemoryStore::new();
//! let mut index = VariableIndex::default();
//! let report = apply_collections(&mut store, &mut index, &batch, &BatchOptions::default());
//!
//! assert!(report.is_clean());
//! assert_eq!(report.collections_created, 2);
//! ```
//!
//! ## Errors
//!
//! Structural problems (a dependency cycle, too many modes) abort the batch and
//! are reported through [`BatchError`] or [`Report::aborted`]. Everything else
//! (an unparsable value, an alias that does not resolve, a type mismatch) is
//! recorded in the report and processing moves on.

pub mod batch;
pub mod color;
pub mod document;
pub mod error;
pub mod graph;
pub mod index;
pub mod link;
pub mod materialize;
pub mod report;
pub mod store;
pub mod value;

pub use batch::{
    apply_collections, apply_flat, list_collections, try_apply_collections, try_apply_flat,
    BatchOptions, CollectionSummary, FlatRequest,
};
pub use document::{CollectionDefinition, TokenDocument, VariableDefinition};
pub use error::BatchError;
pub use index::VariableIndex;
pub use report::{ProcessingResult, Report};
pub use store::{MemoryStore, VariableStore, MAX_MODES};
