use apollo_compiler::Name;
use apollo_compiler::ast::Document;
use serde::Deserialize;
use serde::Serialize;

use crate::base_schema::BaseSchema;
use crate::base_schema::BaseSchemaResolver;
use crate::base_schema::FederationBaseSchemaResolver;
use crate::classifier::FederationClassifier;
use crate::config::TypeFieldExtractorConfig;
use crate::navigator::SchemaNavigator;
use crate::navigator::TypeNode;
use crate::navigator::field_type_name;
use crate::registry::TypeFieldRegistry;
use crate::type_field::TypeField;
use crate::utils::logging::snapshot;

/// The root and child nodes of a subgraph, as consumed by the query planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTypeFields {
    pub root_nodes: Vec<TypeField>,
    pub child_nodes: Vec<TypeField>,
}

/// Computes the root and child [`TypeField`]s of a subgraph document.
///
/// A type is a root node if it is a root operation type or a federation entity; its root fields
/// are its fields that are not `@external`. Child nodes are every field reachable from the return
/// types of the root fields, including `@external` ones.
///
/// The document is borrowed for the lifetime of the extractor and never modified. Every call
/// computes its result from scratch.
pub struct TypeFieldExtractor<'doc, R = FederationBaseSchemaResolver> {
    navigator: SchemaNavigator<'doc>,
    classifier: FederationClassifier,
    resolver: R,
}

impl<'doc> TypeFieldExtractor<'doc> {
    pub fn new(document: &'doc Document) -> Self {
        Self::with_config(document, TypeFieldExtractorConfig::default())
    }

    pub fn with_config(document: &'doc Document, config: TypeFieldExtractorConfig) -> Self {
        let resolver = FederationBaseSchemaResolver::new(&config);
        Self::with_resolver(document, config, resolver)
    }
}

impl<'doc, R: BaseSchemaResolver> TypeFieldExtractor<'doc, R> {
    pub fn with_resolver(
        document: &'doc Document,
        config: TypeFieldExtractorConfig,
        resolver: R,
    ) -> Self {
        Self {
            navigator: SchemaNavigator::new(document),
            classifier: FederationClassifier::new(&config),
            resolver,
        }
    }

    /// Returns both the root nodes and the child nodes reachable from them.
    #[cfg_attr(
        feature = "snapshot_tracing",
        tracing::instrument(level = "trace", skip_all, name = "TypeFieldExtractor::extract")
    )]
    pub fn extract(&self) -> ExtractedTypeFields {
        let root_nodes = self.root_nodes();
        let child_nodes = self.child_nodes(&root_nodes);
        ExtractedTypeFields {
            root_nodes,
            child_nodes,
        }
    }

    /// One entry per top-level object type definition or extension that is an entity or
    /// a root operation type and has at least one non-external field.
    ///
    /// A type declared by both a definition and an extension in the document can therefore appear
    /// twice, once per declaration.
    #[cfg_attr(
        feature = "snapshot_tracing",
        tracing::instrument(level = "trace", skip_all, name = "TypeFieldExtractor::root_nodes")
    )]
    pub fn root_nodes(&self) -> Vec<TypeField> {
        let base_schema = self.base_schema();
        let mut root_nodes = Vec::new();

        for node in self.navigator.type_nodes().filter(TypeNode::is_object) {
            let type_name = node.name();
            let is_root_operation_type = base_schema
                .as_ref()
                .is_some_and(|base_schema| base_schema.is_root_operation_type_name(type_name));
            if !is_root_operation_type && !self.classifier.is_entity(&node) {
                continue;
            }

            let field_names: Vec<&str> = node
                .fields()
                .iter()
                .filter(|field| !self.classifier.is_external_field(field))
                .map(|field| field.name.as_str())
                .collect();
            if field_names.is_empty() {
                tracing::trace!(%type_name, "skipping root type without local fields");
                continue;
            }

            root_nodes.push(TypeField::new(type_name.as_str(), field_names));
        }

        snapshot!(root_nodes, "collected root nodes");
        root_nodes
    }

    /// Every field reachable from the return types of the given root fields, grouped by type in
    /// first-discovery order.
    ///
    /// Root types or fields that the document does not declare contribute nothing.
    #[cfg_attr(
        feature = "snapshot_tracing",
        tracing::instrument(level = "trace", skip_all, name = "TypeFieldExtractor::child_nodes")
    )]
    pub fn child_nodes(&self, root_nodes: &[TypeField]) -> Vec<TypeField> {
        let mut registry = TypeFieldRegistry::default();

        for root_node in root_nodes {
            if self.navigator.type_node(&root_node.type_name).is_none() {
                continue;
            }
            for field_name in &root_node.field_names {
                let Some(field) = self
                    .navigator
                    .field_definition(&root_node.type_name, field_name)
                else {
                    continue;
                };
                self.walk_type(field_type_name(field), &mut registry);
            }
        }

        let child_nodes = registry.into_type_fields();
        snapshot!(child_nodes, "collected child nodes");
        child_nodes
    }

    /// Registers the fields of `type_name` and descends into the return type of each field seen
    /// for the first time.
    ///
    /// A field is registered before its return type is visited, which is what stops the walk on
    /// cycles, including a type with a field returning itself.
    fn walk_type(&self, type_name: &Name, registry: &mut TypeFieldRegistry) {
        let Some(node) = self.navigator.type_node(type_name) else {
            // built-in scalars and names the document does not declare
            return;
        };
        for field in node.fields() {
            if !registry.register(type_name, &field.name) {
                continue;
            }
            self.walk_type(field_type_name(field), registry);
        }
    }

    fn base_schema(&self) -> Option<BaseSchema> {
        let sdl = self.navigator.document().to_string();
        match self.resolver.resolve(&sdl) {
            Ok(base_schema) => {
                snapshot!(
                    "BaseSchema",
                    base_schema.schema().to_string(),
                    "resolved base schema"
                );
                Some(base_schema)
            }
            Err(error) => {
                tracing::debug!(
                    %error,
                    "could not resolve the base schema, only entities will be root nodes"
                );
                None
            }
        }
    }
}
