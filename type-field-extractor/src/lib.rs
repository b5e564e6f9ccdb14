//! Extraction of the `TypeField` configuration a federated query planner needs for one subgraph.
//!
//! Given a subgraph schema, [`TypeFieldExtractor`] computes two sets of [`TypeField`]s:
//! - **root nodes**: the fields of the root operation types (`Query`, `Mutation`,
//!   `Subscription`) and of federation entities (types carrying `@key`), minus the fields
//!   marked `@external`, since those are owned by another subgraph;
//! - **child nodes**: every field reachable from the return types of the root fields,
//!   deduplicated per type.
//!
//! ## Usage
//!
//! ```
//! use type_field_extractor::TypeField;
//! use type_field_extractor::extract_type_fields;
//!
//! let nodes = extract_type_fields(
//!     r#"
//!     type Query { me: User }
//!     type User @key(fields: "id") { id: ID! name: String }
//!     "#,
//!     "accounts.graphql",
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     nodes.root_nodes,
//!     vec![
//!         TypeField::new("Query", ["me"]),
//!         TypeField::new("User", ["id", "name"]),
//!     ]
//! );
//! assert_eq!(nodes.child_nodes, vec![TypeField::new("User", ["id", "name"])]);
//! ```

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]

pub mod base_schema;
pub mod classifier;
pub mod config;
pub mod error;
mod extractor;
pub mod navigator;
mod registry;
mod type_field;
pub(crate) mod utils;

use apollo_compiler::ast::Document;

pub use crate::config::TypeFieldExtractorConfig;
use crate::error::ExtractError;
pub use crate::extractor::ExtractedTypeFields;
pub use crate::extractor::TypeFieldExtractor;
pub use crate::type_field::TypeField;

/// Parses `sdl` and extracts its root and child nodes with the default configuration.
///
/// This is the only entry point that can fail, and only because of a document that does not
/// parse. Extraction itself always produces a (possibly empty) result.
pub fn extract_type_fields(
    sdl: &str,
    path: impl AsRef<std::path::Path>,
) -> Result<ExtractedTypeFields, ExtractError> {
    let document = Document::parse(sdl, path)?;
    Ok(TypeFieldExtractor::new(&document).extract())
}
