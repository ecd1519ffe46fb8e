//! Arbor Core
//!
//! This crate is the data-shaping core behind the Arbor diagrams: radial
//! bundled-edge views, 3-D force graphs, and collapsible trees of a software
//! project's module and dependency structure. It implements:
//!
//! - Report decoding (flat and nested JSON shapes)
//! - Hierarchy building from delimiter-named records
//! - Leaf-level dependency resolution with bidirectional adjacency
//! - Leaf extraction with blacklist filtering for the force-graph payload
//! - The expand/collapse view state machine and transition reconciliation
//!
//! Report acquisition and on-screen drawing live outside this crate: the
//! host hands in already-parsed JSON and consumes structured output.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `report`: serde schemas for the incoming report JSON
//! - `hierarchy`: the canonical rooted tree and its builders
//! - `graph`: dependency linking, leaf extraction, hover highlighting
//! - `view`: collapsible-tree state and enter/update/exit reconciliation
//! - `error`: the crate-wide error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use arbor_core::graph::Linker;
//! use arbor_core::hierarchy::HierarchyBuilder;
//! use arbor_core::report::FlatRecord;
//!
//! let records = FlatRecord::from_json_array(report_json)?;
//! let mut tree = HierarchyBuilder::new('.').build(&records)?;
//! let diagnostics = Linker::default().link(&mut tree)?;
//!
//! // Hand the annotated tree to the edge-bundling renderer.
//! for edge in tree.edges() {
//!     println!("{} -> {}", edge.source, edge.target);
//! }
//! ```

pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod report;
pub mod view;

pub use error::{Error, Result};
