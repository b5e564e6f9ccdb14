//! Recovery of the root operation type names of a subgraph.
//!
//! A subgraph SDL frequently only *extends* its root types (`extend type Query { ... }`) and has
//! no schema definition, so the document alone cannot tell which types are root operation types.
//! The base schema is the subgraph completed with the federation definitions and a merged schema
//! definition, and its schema definition is authoritative for those names.

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use apollo_compiler::ast::OperationType;
use apollo_compiler::collections::IndexMap;
use apollo_compiler::collections::IndexSet;
use apollo_compiler::name;
use apollo_compiler::schema::Component;
use apollo_compiler::schema::ComponentName;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use apollo_compiler::schema::InputValueDefinition;
use apollo_compiler::schema::ObjectType;
use apollo_compiler::schema::ScalarType;
use apollo_compiler::schema::UnionType;
use apollo_compiler::ty;

use crate::classifier::KEY_DIRECTIVE_NAME;
use crate::config::TypeFieldExtractorConfig;
use crate::error::BaseSchemaError;
use crate::error::BaseSchemaStage;

const ANY_SCALAR_NAME: Name = name!("_Any");
const FIELD_SET_SCALAR_NAME: Name = name!("_FieldSet");
const SERVICE_TYPE: Name = name!("_Service");
const ENTITY_UNION_NAME: Name = name!("_Entity");
const SERVICE_SDL_QUERY: Name = name!("_service");
const ENTITIES_QUERY: Name = name!("_entities");

const FEDERATION_DIRECTIVE_DEFINITIONS: &str = r#"
directive @key(fields: _FieldSet!) repeatable on OBJECT | INTERFACE
directive @external on FIELD_DEFINITION | OBJECT
directive @requires(fields: _FieldSet!) on FIELD_DEFINITION
directive @provides(fields: _FieldSet!) on FIELD_DEFINITION
directive @extends on OBJECT | INTERFACE
"#;

const ROOT_OPERATION_TYPES: [(OperationType, Name); 3] = [
    (OperationType::Query, name!("Query")),
    (OperationType::Mutation, name!("Mutation")),
    (OperationType::Subscription, name!("Subscription")),
];

/// Builds the [`BaseSchema`] of a subgraph from its SDL.
///
/// Implementations report failures instead of guessing: the extractor handles an `Err` by
/// recognizing no root operation type names for that extraction.
pub trait BaseSchemaResolver {
    fn resolve(&self, sdl: &str) -> Result<BaseSchema, BaseSchemaError>;
}

/// A merged subgraph schema whose schema definition names the root operation types.
#[derive(Debug, Clone)]
pub struct BaseSchema {
    schema: Schema,
}

impl BaseSchema {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn root_operation_type_names(&self) -> impl Iterator<Item = &Name> {
        let definition = &self.schema.schema_definition;
        [&definition.query, &definition.mutation, &definition.subscription]
            .into_iter()
            .flatten()
            .map(|component| &component.name)
    }

    pub fn is_root_operation_type_name(&self, type_name: &str) -> bool {
        self.root_operation_type_names()
            .any(|name| name.as_str() == type_name)
    }
}

/// Resolves the base schema by round-tripping the subgraph through the printer and parser:
/// federation definitions are added to the parsed subgraph, the result is printed and parsed
/// again, its schema definition is merged with the default root types, and the merged schema is
/// printed and parsed one last time.
#[derive(Debug, Clone)]
pub struct FederationBaseSchemaResolver {
    key_directive: String,
}

impl FederationBaseSchemaResolver {
    pub fn new(config: &TypeFieldExtractorConfig) -> Self {
        Self {
            key_directive: config.key_directive.clone(),
        }
    }

    /// Adds the federation definitions the subgraph is missing and prints the result.
    fn build_base_schema_sdl(&self, sdl: &str) -> Result<String, BaseSchemaError> {
        let mut schema = parse_schema(sdl, BaseSchemaStage::Subgraph)?;
        populate_missing_federation_directive_definitions(&mut schema)?;
        self.populate_missing_federation_types(&mut schema);
        Ok(schema.to_string())
    }

    fn populate_missing_federation_types(&self, schema: &mut Schema) {
        for scalar_name in [ANY_SCALAR_NAME, FIELD_SET_SCALAR_NAME] {
            schema
                .types
                .entry(scalar_name.clone())
                .or_insert_with(|| {
                    ExtendedType::Scalar(Node::new(ScalarType {
                        description: None,
                        name: scalar_name,
                        directives: Default::default(),
                    }))
                });
        }

        schema
            .types
            .entry(SERVICE_TYPE)
            .or_insert_with(service_object_type_definition);

        let entities = self.locate_entities(schema);
        let entities_present = !entities.is_empty();
        if entities_present {
            schema
                .types
                .entry(ENTITY_UNION_NAME)
                .or_insert_with(|| {
                    ExtendedType::Union(Node::new(UnionType {
                        description: None,
                        name: ENTITY_UNION_NAME,
                        directives: Default::default(),
                        members: entities,
                    }))
                });
        }

        let query_type_name = schema
            .schema_definition
            .make_mut()
            .query
            .get_or_insert(ComponentName::from(name!("Query")))
            .name
            .clone();
        if let ExtendedType::Object(query_type) = schema
            .types
            .entry(query_type_name.clone())
            .or_insert(ExtendedType::Object(Node::new(ObjectType {
                description: None,
                name: query_type_name,
                directives: Default::default(),
                fields: IndexMap::default(),
                implements_interfaces: IndexSet::default(),
            })))
        {
            let query_type = query_type.make_mut();
            query_type
                .fields
                .entry(SERVICE_SDL_QUERY)
                .or_insert_with(service_sdl_query_field);
            if entities_present {
                // _entities(representations: [_Any!]!): [_Entity]!
                query_type
                    .fields
                    .entry(ENTITIES_QUERY)
                    .or_insert_with(entities_query_field);
            }
        }
    }

    /// Object types carrying the key directive, which become the members of `_Entity`.
    fn locate_entities(&self, schema: &Schema) -> IndexSet<ComponentName> {
        schema
            .types
            .iter()
            .filter(|(_, extended_type)| {
                matches!(extended_type, ExtendedType::Object(_))
                    && extended_type.directives().has(&self.key_directive)
            })
            .map(|(name, _)| ComponentName::from(name.clone()))
            .collect()
    }
}

impl Default for FederationBaseSchemaResolver {
    fn default() -> Self {
        Self {
            key_directive: KEY_DIRECTIVE_NAME.to_string(),
        }
    }
}

impl BaseSchemaResolver for FederationBaseSchemaResolver {
    fn resolve(&self, sdl: &str) -> Result<BaseSchema, BaseSchemaError> {
        let base_schema_sdl = self.build_base_schema_sdl(sdl)?;
        let mut schema = parse_schema(&base_schema_sdl, BaseSchemaStage::Synthesized)?;
        merge_schema_definition(&mut schema)?;
        let merged_sdl = schema.to_string();
        let schema = parse_schema(&merged_sdl, BaseSchemaStage::Merged)?;
        Ok(BaseSchema::new(schema))
    }
}

fn parse_schema(sdl: &str, stage: BaseSchemaStage) -> Result<Schema, BaseSchemaError> {
    Schema::builder()
        .adopt_orphan_extensions()
        .parse(sdl, "base_schema.graphql")
        .build()
        .map_err(|errors| BaseSchemaError::parse(stage, errors))
}

fn populate_missing_federation_directive_definitions(
    schema: &mut Schema,
) -> Result<(), BaseSchemaError> {
    let definitions =
        ast::Document::parse(FEDERATION_DIRECTIVE_DEFINITIONS, "federation.graphql").map_err(
            |errors| BaseSchemaError::Synthesis {
                message: errors.errors.to_string(),
            },
        )?;
    for definition in &definitions.definitions {
        if let ast::Definition::DirectiveDefinition(directive_definition) = definition {
            schema
                .directive_definitions
                .entry(directive_definition.name.clone())
                .or_insert_with(|| directive_definition.clone());
        }
    }
    Ok(())
}

/// Points every root operation without a schema definition entry at the object type with the
/// default name for that operation, if there is one.
///
/// Fails if the schema definition names a root operation type that is not an object type of the
/// schema.
fn merge_schema_definition(schema: &mut Schema) -> Result<(), BaseSchemaError> {
    for (operation_type, default_name) in ROOT_OPERATION_TYPES {
        match schema.root_operation(operation_type).cloned() {
            Some(root_type_name) => {
                if !matches!(schema.types.get(&root_type_name), Some(ExtendedType::Object(_))) {
                    return Err(BaseSchemaError::Merge {
                        message: format!(
                            "`{root_type_name}` is the {default_name} root type but is not an object type of the schema"
                        ),
                    });
                }
            }
            None => {
                if matches!(schema.types.get(&default_name), Some(ExtendedType::Object(_))) {
                    let schema_definition = schema.schema_definition.make_mut();
                    let root = match operation_type {
                        OperationType::Query => &mut schema_definition.query,
                        OperationType::Mutation => &mut schema_definition.mutation,
                        OperationType::Subscription => &mut schema_definition.subscription,
                    };
                    *root = Some(ComponentName::from(default_name));
                }
            }
        }
    }
    Ok(())
}

// type _Service { sdl: String }
fn service_object_type_definition() -> ExtendedType {
    let mut fields = IndexMap::default();
    fields.insert(
        name!("sdl"),
        Component::new(FieldDefinition {
            description: None,
            name: name!("sdl"),
            arguments: vec![],
            ty: ty!(String),
            directives: Default::default(),
        }),
    );
    ExtendedType::Object(Node::new(ObjectType {
        description: None,
        name: SERVICE_TYPE,
        directives: Default::default(),
        fields,
        implements_interfaces: IndexSet::default(),
    }))
}

// _service: _Service!
fn service_sdl_query_field() -> Component<FieldDefinition> {
    Component::new(FieldDefinition {
        description: None,
        name: SERVICE_SDL_QUERY,
        arguments: vec![],
        ty: ty!(_Service!),
        directives: Default::default(),
    })
}

// _entities(representations: [_Any!]!): [_Entity]!
fn entities_query_field() -> Component<FieldDefinition> {
    Component::new(FieldDefinition {
        description: None,
        name: ENTITIES_QUERY,
        arguments: vec![Node::new(InputValueDefinition {
            description: None,
            name: name!("representations"),
            ty: ty!([_Any!]!).into(),
            default_value: None,
            directives: Default::default(),
        })],
        ty: ty!([_Entity]!),
        directives: Default::default(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn root_names(base_schema: &BaseSchema) -> Vec<&str> {
        base_schema
            .root_operation_type_names()
            .map(Name::as_str)
            .collect()
    }

    #[test]
    fn recognizes_default_root_types() {
        let base_schema = FederationBaseSchemaResolver::default()
            .resolve(
                r#"
                type Query { me: User }
                type Mutation { login: User }
                type User { id: ID! }
                "#,
            )
            .unwrap();

        assert_eq!(root_names(&base_schema), ["Query", "Mutation"]);
        assert!(base_schema.is_root_operation_type_name("Query"));
        assert!(base_schema.is_root_operation_type_name("Mutation"));
        assert!(!base_schema.is_root_operation_type_name("Subscription"));
        assert!(!base_schema.is_root_operation_type_name("User"));
    }

    #[test]
    fn recognizes_root_types_declared_only_as_extensions() {
        let base_schema = FederationBaseSchemaResolver::default()
            .resolve(
                r#"
                extend type Query { topProducts: [Product] }
                extend type Subscription { productAdded: Product }
                type Product @key(fields: "upc") { upc: String! }
                "#,
            )
            .unwrap();

        assert!(base_schema.is_root_operation_type_name("Query"));
        assert!(base_schema.is_root_operation_type_name("Subscription"));
        assert!(!base_schema.is_root_operation_type_name("Product"));
    }

    #[test]
    fn keeps_renamed_root_types() {
        let base_schema = FederationBaseSchemaResolver::default()
            .resolve(
                r#"
                schema { query: RootQuery }
                type RootQuery { me: String }
                type Query { notRoot: String }
                "#,
            )
            .unwrap();

        assert!(base_schema.is_root_operation_type_name("RootQuery"));
        assert!(!base_schema.is_root_operation_type_name("Query"));
    }

    #[test]
    fn adds_federation_definitions() {
        let base_schema = FederationBaseSchemaResolver::default()
            .resolve(r#"type Product @key(fields: "upc") { upc: String! }"#)
            .unwrap();
        let schema = base_schema.schema();

        assert!(schema.directive_definitions.contains_key("key"));
        assert!(schema.directive_definitions.contains_key("external"));
        assert!(schema.types.contains_key("_Any"));
        assert!(schema.types.contains_key("_Service"));
        let Some(ExtendedType::Union(entity)) = schema.types.get("_Entity") else {
            panic!("expected an _Entity union");
        };
        assert!(
            entity
                .members
                .iter()
                .any(|member| member.name.as_str() == "Product")
        );
        let Some(ExtendedType::Object(query)) = schema.types.get("Query") else {
            panic!("expected a Query type");
        };
        assert!(query.fields.contains_key("_service"));
        assert!(query.fields.contains_key("_entities"));
        assert_eq!(root_names(&base_schema), ["Query"]);
    }

    #[test]
    fn omits_entities_field_without_entities() {
        let base_schema = FederationBaseSchemaResolver::default()
            .resolve("type Query { hello: String }")
            .unwrap();
        let schema = base_schema.schema();

        assert!(!schema.types.contains_key("_Entity"));
        let Some(ExtendedType::Object(query)) = schema.types.get("Query") else {
            panic!("expected a Query type");
        };
        assert!(query.fields.contains_key("hello"));
        assert!(!query.fields.contains_key("_entities"));
    }

    #[test]
    fn fails_on_root_type_that_is_not_an_object() {
        let result = FederationBaseSchemaResolver::default().resolve(
            r#"
            schema { query: Query mutation: Missing }
            type Query { hello: String }
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn fails_on_duplicate_definitions() {
        let error = FederationBaseSchemaResolver::default()
            .resolve(
                r#"
                type Query { hello: String }
                type Query { world: String }
                "#,
            )
            .unwrap_err();

        assert!(matches!(
            error,
            BaseSchemaError::Parse {
                stage: BaseSchemaStage::Subgraph,
                ..
            }
        ));
    }
}
