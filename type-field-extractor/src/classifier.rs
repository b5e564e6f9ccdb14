//! Federation signals used to decide what a subgraph owns.

use apollo_compiler::ast::FieldDefinition;

use crate::config::TypeFieldExtractorConfig;
use crate::navigator::TypeNode;

pub const KEY_DIRECTIVE_NAME: &str = "key";
pub const EXTERNAL_DIRECTIVE_NAME: &str = "external";

/// Recognizes entities (`@key`) and external fields (`@external`) by directive name.
#[derive(Debug, Clone)]
pub struct FederationClassifier {
    key_directive: String,
    external_directive: String,
}

impl FederationClassifier {
    pub fn new(config: &TypeFieldExtractorConfig) -> Self {
        Self {
            key_directive: config.key_directive.clone(),
            external_directive: config.external_directive.clone(),
        }
    }

    /// Whether the type node carries the key directive. Arguments are not inspected.
    pub fn is_entity(&self, node: &TypeNode<'_>) -> bool {
        node.directives().has(&self.key_directive)
    }

    pub fn is_external_field(&self, field: &FieldDefinition) -> bool {
        field.directives.has(&self.external_directive)
    }
}
