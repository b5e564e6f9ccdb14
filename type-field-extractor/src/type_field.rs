use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A GraphQL type together with the fields it exposes to the query planner.
///
/// `field_names` never contains the same name twice and keeps the order in which the names were
/// first discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeField {
    pub type_name: String,
    pub field_names: Vec<String>,
}

impl TypeField {
    pub fn new<I>(type_name: impl Into<String>, field_names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            field_names: field_names.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for TypeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ {} }}", self.type_name, self.field_names.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_a_selection() {
        let type_field = TypeField::new("User", ["id", "name"]);
        assert_eq!(type_field.to_string(), "User { id name }");
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let type_field = TypeField::new("Query", ["me"]);
        assert_eq!(
            serde_json::to_string(&type_field).unwrap(),
            r#"{"type_name":"Query","field_names":["me"]}"#
        );
    }
}
