use apollo_compiler::Name;
use indexmap::IndexMap;
use indexmap::IndexSet;

use crate::type_field::TypeField;

/// Accumulates the fields discovered for each type, in first-discovery order.
#[derive(Debug, Default)]
pub(crate) struct TypeFieldRegistry {
    fields_by_type: IndexMap<Name, IndexSet<Name>>,
}

impl TypeFieldRegistry {
    /// Records `type_name.field_name`, returning `false` if the pair was already recorded.
    pub(crate) fn register(&mut self, type_name: &Name, field_name: &Name) -> bool {
        self.fields_by_type
            .entry(type_name.clone())
            .or_default()
            .insert(field_name.clone())
    }

    pub(crate) fn into_type_fields(self) -> Vec<TypeField> {
        self.fields_by_type
            .into_iter()
            .map(|(type_name, field_names)| {
                TypeField::new(type_name.as_str(), field_names.iter().map(Name::as_str))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::name;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn registers_each_pair_once() {
        let mut registry = TypeFieldRegistry::default();

        assert!(registry.register(&name!("User"), &name!("id")));
        assert!(registry.register(&name!("Review"), &name!("author")));
        assert!(registry.register(&name!("User"), &name!("reviews")));
        assert!(!registry.register(&name!("User"), &name!("id")));
        assert!(registry.register(&name!("Review"), &name!("id")));
        assert!(!registry.register(&name!("Review"), &name!("author")));

        assert_eq!(
            registry.into_type_fields(),
            vec![
                TypeField::new("User", ["id", "reviews"]),
                TypeField::new("Review", ["author", "id"]),
            ]
        );
    }
}
