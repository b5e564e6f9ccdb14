//! A read-only view over the type system definitions of a parsed subgraph document.

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast::Definition;
use apollo_compiler::ast::DirectiveList;
use apollo_compiler::ast::Document;
use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::ast::NamedType;
use indexmap::IndexMap;

/// A top-level type definition or type extension of a document.
#[derive(Debug, Clone, Copy)]
pub struct TypeNode<'doc> {
    name: &'doc Name,
    directives: &'doc DirectiveList,
    definition: &'doc Definition,
}

impl<'doc> TypeNode<'doc> {
    /// Returns `None` for definitions that don't declare or extend a type (schema definitions,
    /// directive definitions, operations and fragments).
    pub fn from_definition(definition: &'doc Definition) -> Option<Self> {
        let (name, directives) = match definition {
            Definition::ObjectTypeDefinition(def) => (&def.name, &def.directives),
            Definition::ObjectTypeExtension(ext) => (&ext.name, &ext.directives),
            Definition::InterfaceTypeDefinition(def) => (&def.name, &def.directives),
            Definition::InterfaceTypeExtension(ext) => (&ext.name, &ext.directives),
            Definition::ScalarTypeDefinition(def) => (&def.name, &def.directives),
            Definition::ScalarTypeExtension(ext) => (&ext.name, &ext.directives),
            Definition::UnionTypeDefinition(def) => (&def.name, &def.directives),
            Definition::UnionTypeExtension(ext) => (&ext.name, &ext.directives),
            Definition::EnumTypeDefinition(def) => (&def.name, &def.directives),
            Definition::EnumTypeExtension(ext) => (&ext.name, &ext.directives),
            Definition::InputObjectTypeDefinition(def) => (&def.name, &def.directives),
            Definition::InputObjectTypeExtension(ext) => (&ext.name, &ext.directives),
            _ => return None,
        };
        Some(Self {
            name,
            directives,
            definition,
        })
    }

    pub fn name(&self) -> &'doc Name {
        self.name
    }

    /// Whether this node is an object type definition or extension.
    pub fn is_object(&self) -> bool {
        matches!(
            self.definition,
            Definition::ObjectTypeDefinition(_) | Definition::ObjectTypeExtension(_)
        )
    }

    /// The output field definitions of this node, in declaration order.
    ///
    /// Input object fields are input values rather than field definitions, so input objects
    /// (like scalars, enums and unions) have none.
    pub fn fields(&self) -> &'doc [Node<FieldDefinition>] {
        match self.definition {
            Definition::ObjectTypeDefinition(def) => &def.fields,
            Definition::ObjectTypeExtension(ext) => &ext.fields,
            Definition::InterfaceTypeDefinition(def) => &def.fields,
            Definition::InterfaceTypeExtension(ext) => &ext.fields,
            _ => &[],
        }
    }

    pub fn directives(&self) -> &'doc DirectiveList {
        self.directives
    }
}

/// Answers the structural questions the extraction asks about a document.
///
/// The document is never mutated. Type lookups by name return the first top-level node declaring
/// or extending that name, in document order.
#[derive(Debug)]
pub struct SchemaNavigator<'doc> {
    document: &'doc Document,
    first_node_by_name: IndexMap<&'doc str, TypeNode<'doc>>,
}

impl<'doc> SchemaNavigator<'doc> {
    pub fn new(document: &'doc Document) -> Self {
        let mut first_node_by_name = IndexMap::new();
        for node in document.definitions.iter().filter_map(TypeNode::from_definition) {
            first_node_by_name.entry(node.name().as_str()).or_insert(node);
        }
        Self {
            document,
            first_node_by_name,
        }
    }

    pub fn document(&self) -> &'doc Document {
        self.document
    }

    /// All top-level type definitions and extensions, in document order.
    pub fn type_nodes(&self) -> impl Iterator<Item = TypeNode<'doc>> + use<'doc> {
        self.document
            .definitions
            .iter()
            .filter_map(TypeNode::from_definition)
    }

    pub fn type_node(&self, type_name: &str) -> Option<TypeNode<'doc>> {
        self.first_node_by_name.get(type_name).copied()
    }

    /// Finds the definition of `type_name.field_name` on any top-level node of that type, so
    /// fields declared in a type extension are found even when the type also has a definition.
    pub fn field_definition(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Option<&'doc Node<FieldDefinition>> {
        self.type_nodes()
            .filter(|node| node.name().as_str() == type_name)
            .flat_map(|node| node.fields())
            .find(|field| field.name.as_str() == field_name)
    }
}

/// The named type a field returns, with list and non-null wrappers removed.
pub fn field_type_name(field: &FieldDefinition) -> &NamedType {
    field.ty.inner_named_type()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'doc>(nodes: impl Iterator<Item = TypeNode<'doc>>) -> Vec<&'doc str> {
        nodes.map(|node| node.name().as_str()).collect()
    }

    const SDL: &str = r#"
        schema { query: Query }
        directive @key(fields: String!) on OBJECT
        type Query { users: [User!]! }
        interface Node { id: ID! }
        type User @key(fields: "id") { id: ID! }
        extend type User { friends: [User] }
        scalar Date
        input UserFilter { name: String }
        enum Role { ADMIN }
    "#;

    #[test]
    fn lists_type_nodes_in_document_order() {
        let document = Document::parse(SDL, "schema.graphql").unwrap();
        let navigator = SchemaNavigator::new(&document);

        assert_eq!(
            names(navigator.type_nodes()),
            ["Query", "Node", "User", "User", "Date", "UserFilter", "Role"]
        );
        assert_eq!(
            names(navigator.type_nodes().filter(TypeNode::is_object)),
            ["Query", "User", "User"]
        );
    }

    #[test]
    fn looks_up_the_first_node_by_name() {
        let document = Document::parse(SDL, "schema.graphql").unwrap();
        let navigator = SchemaNavigator::new(&document);

        let user = navigator.type_node("User").unwrap();
        assert!(user.is_object());
        assert_eq!(user.fields().len(), 1);
        assert!(user.directives().has("key"));

        let node = navigator.type_node("Node").unwrap();
        assert!(!node.is_object());
        assert_eq!(node.fields().len(), 1);

        assert!(navigator.type_node("UserFilter").unwrap().fields().is_empty());
        assert!(navigator.type_node("ID").is_none());
        assert!(navigator.type_node("key").is_none());
    }

    #[test]
    fn finds_fields_declared_in_extensions() {
        let document = Document::parse(SDL, "schema.graphql").unwrap();
        let navigator = SchemaNavigator::new(&document);

        let friends = navigator.field_definition("User", "friends").unwrap();
        assert_eq!(field_type_name(friends).as_str(), "User");

        let users = navigator.field_definition("Query", "users").unwrap();
        assert_eq!(field_type_name(users).as_str(), "User");

        assert!(navigator.field_definition("User", "email").is_none());
        assert!(navigator.field_definition("Viewer", "id").is_none());
    }
}
