use std::fmt;

use apollo_compiler::ast::Document;
use apollo_compiler::validation::WithErrors;
use thiserror::Error;

/// The step of the base schema pipeline that produced a [`BaseSchemaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSchemaStage {
    /// Parsing the printed subgraph SDL before adding the federation definitions.
    Subgraph,
    /// Parsing the SDL produced by the federation base schema synthesis.
    Synthesized,
    /// Parsing the SDL printed after merging the schema definition.
    Merged,
}

impl fmt::Display for BaseSchemaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseSchemaStage::Subgraph => f.write_str("subgraph"),
            BaseSchemaStage::Synthesized => f.write_str("synthesized base schema"),
            BaseSchemaStage::Merged => f.write_str("merged base schema"),
        }
    }
}

/// Failure to build the base schema used to recognize root operation type names.
///
/// This never fails an extraction: the extractor logs it and treats no type name as a root
/// operation type name for that call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BaseSchemaError {
    #[error("Could not parse the {stage} SDL: {message}")]
    Parse {
        stage: BaseSchemaStage,
        message: String,
    },
    #[error("Could not add the federation definitions: {message}")]
    Synthesis { message: String },
    #[error("Could not merge the schema definition with the base schema: {message}")]
    Merge { message: String },
}

impl BaseSchemaError {
    pub(crate) fn parse<T>(stage: BaseSchemaStage, errors: WithErrors<T>) -> Self {
        BaseSchemaError::Parse {
            stage,
            message: errors.errors.to_string(),
        }
    }
}

/// Errors surfaced by [`crate::extract_type_fields`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("Invalid GraphQL: {message}")]
    InvalidGraphQL { message: String },
}

impl From<WithErrors<Document>> for ExtractError {
    fn from(value: WithErrors<Document>) -> Self {
        ExtractError::InvalidGraphQL {
            message: value.errors.to_string(),
        }
    }
}
