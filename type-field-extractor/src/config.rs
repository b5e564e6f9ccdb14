use serde::Deserialize;
use serde::Serialize;

use crate::classifier::EXTERNAL_DIRECTIVE_NAME;
use crate::classifier::KEY_DIRECTIVE_NAME;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeFieldExtractorConfig {
    /// The name of the directive that marks a type as a federation entity.
    ///
    /// Subgraphs that import the federation directives under a namespace (for example
    /// `@federation__key`) should set the namespaced name here. Only the name is compared;
    /// the directive arguments are never inspected.
    ///
    /// Defaults to `key`.
    pub key_directive: String,

    /// The name of the directive that marks a field as owned by another subgraph. Such fields
    /// are left out of the root nodes.
    ///
    /// Defaults to `external`.
    pub external_directive: String,
}

impl Default for TypeFieldExtractorConfig {
    fn default() -> Self {
        Self {
            key_directive: KEY_DIRECTIVE_NAME.to_string(),
            external_directive: EXTERNAL_DIRECTIVE_NAME.to_string(),
        }
    }
}
