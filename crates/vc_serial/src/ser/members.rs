//! Member naming and selection rules shared by every direction.

use alloc::borrow::Cow;

use vc_reflect::info::{NamedField, StructInfo, TypeInfo};

use crate::config::{Config, PropertyConvention, TypeConfig};
use crate::convert::text_case;

/// The name a member is written under.
///
/// A [`TypeConfig`] rename wins over a `#[reflect(rename)]` alias, which
/// wins over the text case of the type config or the effective config.
pub fn wire_name<'a>(field: &'a NamedField, type_config: Option<&'a TypeConfig>, config: &Config) -> Cow<'a, str> {
    if let Some(renamed) = type_config.and_then(|tc| tc.renamed(field.name())) {
        return Cow::Borrowed(renamed);
    }
    if let Some(alias) = field.alias() {
        return Cow::Borrowed(alias);
    }
    let case = type_config.and_then(|tc| tc.text_case).unwrap_or(config.text_case);
    text_case::apply(case, field.name())
}

/// Whether a member takes part in serialization at all.
///
/// Ignored members, unmarked members of data contracts, members excluded
/// through [`TypeConfig::exclude`], members named in
/// [`exclude_property_references`](Config::exclude_property_references)
/// and members of an excluded type are left out.
pub fn is_included(
    field: &NamedField,
    owner: &StructInfo,
    owner_info: &TypeInfo,
    type_config: Option<&TypeConfig>,
    config: &Config,
) -> bool {
    if field.is_ignored() || (owner.is_data_contract() && !field.is_data_member()) {
        return false;
    }
    if type_config.is_some_and(|tc| tc.excludes(field.name())) {
        return false;
    }
    let type_name = owner_info.type_name();
    if config.excludes_reference(type_name, field.name())
        || field.alias().is_some_and(|alias| config.excludes_reference(type_name, alias))
    {
        return false;
    }
    let ty = field.ty();
    !config.exclude_types.iter().any(|excluded| excluded == ty.name() || excluded == ty.path())
}

/// Finds the member an input key refers to.
///
/// Exact wire names are tried first, then a case-insensitive match on the
/// wire or declared name, and, under [`PropertyConvention::Lenient`], a
/// match that also ignores `_` and `-`.
pub fn find_member<'a>(
    key: &str,
    owner: &'a StructInfo,
    type_config: Option<&TypeConfig>,
    config: &Config,
) -> Option<&'a NamedField> {
    let fields = owner.fields();
    let usable = |field: &&NamedField| !field.is_ignored() && (!owner.is_data_contract() || field.is_data_member());

    if let Some(field) = fields.iter().filter(usable).find(|field| wire_name(field, type_config, config) == key) {
        return Some(field);
    }
    if let Some(field) = fields.iter().filter(usable).find(|field| {
        wire_name(field, type_config, config).eq_ignore_ascii_case(key) || field.name().eq_ignore_ascii_case(key)
    }) {
        return Some(field);
    }
    if config.property_convention == PropertyConvention::Lenient {
        let folded = text_case::fold_lenient(key);
        return fields.iter().filter(usable).find(|field| {
            text_case::fold_lenient(&wire_name(field, type_config, config)) == folded
                || text_case::fold_lenient(field.name()) == folded
        });
    }
    None
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_reflect::derive::Reflect;
    use vc_reflect::info::Typed;

    use super::{find_member, is_included, wire_name};
    use crate::config::{Config, PropertyConvention, TextCase, TypeConfig};

    #[derive(Reflect, Clone, Default)]
    struct Person {
        first_name: String,
        #[reflect(rename = "years")]
        age: u8,
        #[reflect(ignore)]
        secret: String,
    }

    #[derive(Reflect, Clone, Default)]
    #[reflect(data_contract)]
    struct Contract {
        #[reflect(data_member)]
        shown: i32,
        hidden: i32,
    }

    #[test]
    fn names_follow_precedence() {
        let info = Person::type_info().as_struct().unwrap();
        let camel = Config { text_case: TextCase::CamelCase, ..Config::default() };
        let first = info.field("first_name").unwrap();
        let age = info.field("age").unwrap();

        assert_eq!(wire_name(first, None, &Config::default()), "first_name");
        assert_eq!(wire_name(first, None, &camel), "firstName");
        assert_eq!(wire_name(age, None, &camel), "years");

        let mut tc = TypeConfig::default();
        tc.rename("age", "Age").text_case = Some(TextCase::PascalCase);
        assert_eq!(wire_name(age, Some(&tc), &camel), "Age");
        assert_eq!(wire_name(first, Some(&tc), &camel), "FirstName");
    }

    #[test]
    fn selection_rules() {
        let config = Config::default();
        let person = Person::type_info();
        let info = person.as_struct().unwrap();
        assert!(is_included(info.field("first_name").unwrap(), info, person, None, &config));
        assert!(!is_included(info.field("secret").unwrap(), info, person, None, &config));

        let scoped = Config {
            exclude_property_references: vec!["Person.first_name".into()],
            exclude_types: vec!["u8".into()],
            ..Config::default()
        };
        assert!(!is_included(info.field("first_name").unwrap(), info, person, None, &scoped));
        assert!(!is_included(info.field("age").unwrap(), info, person, None, &scoped));

        let contract = Contract::type_info();
        let info = contract.as_struct().unwrap();
        assert!(is_included(info.field("shown").unwrap(), info, contract, None, &config));
        assert!(!is_included(info.field("hidden").unwrap(), info, contract, None, &config));
    }

    #[test]
    fn member_lookup() {
        let info = Person::type_info().as_struct().unwrap();
        let strict = Config::default();
        let lenient = Config { property_convention: PropertyConvention::Lenient, ..Config::default() };

        assert_eq!(find_member("first_name", info, None, &strict).map(|f| f.name()), Some("first_name"));
        assert_eq!(find_member("FIRST_NAME", info, None, &strict).map(|f| f.name()), Some("first_name"));
        assert_eq!(find_member("Years", info, None, &strict).map(|f| f.name()), Some("age"));
        assert_eq!(find_member("age", info, None, &strict).map(|f| f.name()), Some("age"));
        assert!(find_member("FirstName", info, None, &strict).is_none());
        assert_eq!(find_member("FirstName", info, None, &lenient).map(|f| f.name()), Some("first_name"));
        assert!(find_member("secret", info, None, &lenient).is_none());
    }
}
