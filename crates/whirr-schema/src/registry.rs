use std::collections::BTreeMap;

use whirr_types::{normalize_pk, ObjectClass, RpslObject};

use crate::error::{SchemaError, SchemaResult};
use crate::rule::{AttributeRule, Cardinality};
use crate::syntax::ValueSyntax;

use Cardinality::{Multiple, OptionalMultiple, Single};
use ObjectClass::{AsSet, AutNum, KeyCert, Mntner, Person, Role, Route, Route6, RouteSet};

/// The attribute rules for one object class, in canonical output order.
#[derive(Clone, Debug)]
pub struct Schema {
    pub class: ObjectClass,
    pub attributes: Vec<AttributeRule>,
}

impl Schema {
    /// The rule for a named attribute, if the class defines it.
    pub fn rule(&self, name: &str) -> Option<&AttributeRule> {
        self.attributes.iter().find(|r| r.name == name)
    }

    /// Primary-key rules in declaration order.
    pub fn primary_key_rules(&self) -> impl Iterator<Item = &AttributeRule> {
        self.attributes.iter().filter(|r| r.primary_key)
    }

    /// Mandatory rules in declaration order.
    pub fn mandatory_rules(&self) -> impl Iterator<Item = &AttributeRule> {
        self.attributes.iter().filter(|r| r.cardinality.is_mandatory())
    }

    /// Returns `true` if the named attribute is indexed for reverse lookup.
    pub fn is_lookup_key(&self, name: &str) -> bool {
        self.rule(name).is_some_and(|r| r.lookup_key)
    }

    /// Compute the normalized primary key of an object under this schema:
    /// the concatenation of its primary-key attribute values, in schema
    /// order, each normalized.
    pub fn primary_key_of(&self, object: &RpslObject) -> SchemaResult<String> {
        let mut pk = String::new();
        for rule in self.primary_key_rules() {
            let value =
                object
                    .first_value(rule.name)
                    .ok_or_else(|| SchemaError::MissingPrimaryKey {
                        class: self.class,
                        attribute: rule.name.to_string(),
                    })?;
            pk.push_str(&normalize_pk(value));
        }
        Ok(pk)
    }
}

/// Process-wide registry of all class schemas.
///
/// Built once at startup from the embedded definition table below and then
/// shared immutably; never editable at runtime.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: BTreeMap<ObjectClass, Schema>,
}

impl SchemaRegistry {
    /// Construct the built-in schema table.
    pub fn builtin() -> Self {
        let mut schemas = BTreeMap::new();
        for class in ObjectClass::ALL {
            let mut attributes = class_rules(class);
            // Every class carries a source attribute; appended here so the
            // per-class tables stay focused on what differs.
            attributes.push(
                AttributeRule::new("source", Single, ValueSyntax::ObjectName).lookup_key(),
            );
            debug_assert!(
                attributes.iter().any(|r| r.primary_key),
                "every class needs a primary key"
            );
            schemas.insert(class, Schema { class, attributes });
        }
        Self { schemas }
    }

    /// The schema for a class. Infallible: the class set is closed and every
    /// class has an entry; unknown classes are rejected earlier, when the
    /// class tag itself is parsed.
    pub fn schema_for(&self, class: ObjectClass) -> &Schema {
        self.schemas
            .get(&class)
            .expect("builtin table covers every class")
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn class_rules(class: ObjectClass) -> Vec<AttributeRule> {
    use ValueSyntax::*;
    match class {
        Route => vec![
            AttributeRule::new("route", Single, Prefix4).primary_key().lookup_key(),
            AttributeRule::new("descr", OptionalMultiple, AnyText).continuable(),
            AttributeRule::new("origin", Single, AsNumber).primary_key().lookup_key(),
            AttributeRule::new("holes", OptionalMultiple, Prefix4),
            AttributeRule::new("member-of", OptionalMultiple, ObjectName)
                .references(&[RouteSet])
                .soft(),
            AttributeRule::new("mnt-by", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .lookup_key(),
            AttributeRule::new("notify", OptionalMultiple, EmailAddress),
            AttributeRule::new("remarks", OptionalMultiple, AnyText).continuable(),
        ],
        Route6 => vec![
            AttributeRule::new("route6", Single, Prefix6).primary_key().lookup_key(),
            AttributeRule::new("descr", OptionalMultiple, AnyText).continuable(),
            AttributeRule::new("origin", Single, AsNumber).primary_key().lookup_key(),
            AttributeRule::new("holes", OptionalMultiple, Prefix6),
            AttributeRule::new("member-of", OptionalMultiple, ObjectName)
                .references(&[RouteSet])
                .soft(),
            AttributeRule::new("mnt-by", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .lookup_key(),
            AttributeRule::new("notify", OptionalMultiple, EmailAddress),
            AttributeRule::new("remarks", OptionalMultiple, AnyText).continuable(),
        ],
        AutNum => vec![
            AttributeRule::new("aut-num", Single, AsNumber).primary_key().lookup_key(),
            AttributeRule::new("as-name", Single, ObjectName),
            AttributeRule::new("descr", OptionalMultiple, AnyText).continuable(),
            AttributeRule::new("member-of", OptionalMultiple, ObjectName)
                .references(&[AsSet])
                .soft(),
            AttributeRule::new("import", OptionalMultiple, AnyText).continuable(),
            AttributeRule::new("export", OptionalMultiple, AnyText).continuable(),
            AttributeRule::new("admin-c", Multiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("tech-c", Multiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("mnt-by", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .lookup_key(),
            AttributeRule::new("notify", OptionalMultiple, EmailAddress),
            AttributeRule::new("remarks", OptionalMultiple, AnyText).continuable(),
        ],
        AsSet => vec![
            AttributeRule::new("as-set", Single, ObjectName).primary_key().lookup_key(),
            AttributeRule::new("descr", OptionalMultiple, AnyText).continuable(),
            AttributeRule::new("members", OptionalMultiple, Members).lookup_key(),
            AttributeRule::new("mbrs-by-ref", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .soft(),
            AttributeRule::new("admin-c", OptionalMultiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("tech-c", OptionalMultiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("mnt-by", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .lookup_key(),
            AttributeRule::new("notify", OptionalMultiple, EmailAddress),
            AttributeRule::new("remarks", OptionalMultiple, AnyText).continuable(),
        ],
        RouteSet => vec![
            AttributeRule::new("route-set", Single, ObjectName).primary_key().lookup_key(),
            AttributeRule::new("descr", OptionalMultiple, AnyText).continuable(),
            AttributeRule::new("members", OptionalMultiple, Members).lookup_key(),
            AttributeRule::new("mbrs-by-ref", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .soft(),
            AttributeRule::new("admin-c", OptionalMultiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("tech-c", OptionalMultiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("mnt-by", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .lookup_key(),
            AttributeRule::new("notify", OptionalMultiple, EmailAddress),
            AttributeRule::new("remarks", OptionalMultiple, AnyText).continuable(),
        ],
        Mntner => vec![
            AttributeRule::new("mntner", Single, ObjectName).primary_key().lookup_key(),
            AttributeRule::new("descr", OptionalMultiple, AnyText).continuable(),
            AttributeRule::new("admin-c", Multiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("upd-to", Multiple, EmailAddress),
            AttributeRule::new("mnt-nfy", OptionalMultiple, EmailAddress),
            AttributeRule::new("auth", Multiple, AuthScheme),
            AttributeRule::new("mnt-by", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .lookup_key(),
            AttributeRule::new("remarks", OptionalMultiple, AnyText).continuable(),
        ],
        Person => vec![
            AttributeRule::new("person", Single, AnyText).lookup_key(),
            AttributeRule::new("address", Multiple, AnyText).continuable(),
            AttributeRule::new("phone", Multiple, AnyText),
            AttributeRule::new("fax-no", OptionalMultiple, AnyText),
            AttributeRule::new("e-mail", Multiple, EmailAddress).lookup_key(),
            AttributeRule::new("nic-hdl", Single, NicHandle).primary_key().lookup_key(),
            AttributeRule::new("mnt-by", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .lookup_key(),
            AttributeRule::new("notify", OptionalMultiple, EmailAddress),
            AttributeRule::new("remarks", OptionalMultiple, AnyText).continuable(),
        ],
        Role => vec![
            AttributeRule::new("role", Single, AnyText).lookup_key(),
            AttributeRule::new("address", Multiple, AnyText).continuable(),
            AttributeRule::new("phone", OptionalMultiple, AnyText),
            AttributeRule::new("fax-no", OptionalMultiple, AnyText),
            AttributeRule::new("e-mail", Multiple, EmailAddress).lookup_key(),
            AttributeRule::new("admin-c", OptionalMultiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("tech-c", OptionalMultiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("nic-hdl", Single, NicHandle).primary_key().lookup_key(),
            AttributeRule::new("mnt-by", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .lookup_key(),
            AttributeRule::new("notify", OptionalMultiple, EmailAddress),
            AttributeRule::new("remarks", OptionalMultiple, AnyText).continuable(),
        ],
        KeyCert => vec![
            AttributeRule::new("key-cert", Single, ObjectName).primary_key().lookup_key(),
            AttributeRule::new("method", Single, AnyText),
            AttributeRule::new("owner", OptionalMultiple, AnyText),
            AttributeRule::new("fingerpr", Single, Hexadecimal),
            AttributeRule::new("certif", Multiple, AnyText).continuable(),
            AttributeRule::new("admin-c", OptionalMultiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("tech-c", OptionalMultiple, NicHandle)
                .references(&[Person, Role])
                .lookup_key(),
            AttributeRule::new("mnt-by", OptionalMultiple, ObjectName)
                .references(&[Mntner])
                .lookup_key(),
            AttributeRule::new("remarks", OptionalMultiple, AnyText).continuable(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whirr_types::RpslAttribute;

    #[test]
    fn every_class_has_a_schema_with_pk_and_source() {
        let registry = SchemaRegistry::builtin();
        for class in ObjectClass::ALL {
            let schema = registry.schema_for(class);
            assert!(
                schema.primary_key_rules().count() >= 1,
                "{class} has no primary key"
            );
            let source = schema.rule("source").expect("source rule appended");
            assert_eq!(source.cardinality, Single);
            assert!(source.lookup_key);
        }
    }

    #[test]
    fn route_pk_is_prefix_plus_origin() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(Route);
        let pks: Vec<_> = schema.primary_key_rules().map(|r| r.name).collect();
        assert_eq!(pks, vec!["route", "origin"]);

        let obj = RpslObject::new(
            Route,
            vec![
                RpslAttribute::new("route", "192.0.2.0/24"),
                RpslAttribute::new("origin", "as65000"),
                RpslAttribute::new("source", "TEST"),
            ],
        );
        assert_eq!(schema.primary_key_of(&obj).unwrap(), "192.0.2.0/24AS65000");
    }

    #[test]
    fn person_pk_is_nic_hdl_not_name() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(Person);
        let obj = RpslObject::new(
            Person,
            vec![
                RpslAttribute::new("person", "Jane Doe"),
                RpslAttribute::new("nic-hdl", "jd1-test"),
            ],
        );
        assert_eq!(schema.primary_key_of(&obj).unwrap(), "JD1-TEST");
    }

    #[test]
    fn missing_pk_attribute_is_an_error() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(Route);
        let obj = RpslObject::new(
            Route,
            vec![RpslAttribute::new("route", "192.0.2.0/24")],
        );
        let err = schema.primary_key_of(&obj).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingPrimaryKey {
                class: Route,
                attribute: "origin".to_string()
            }
        );
    }

    #[test]
    fn lookup_key_flags() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(AutNum);
        assert!(schema.is_lookup_key("admin-c"));
        assert!(schema.is_lookup_key("mnt-by"));
        assert!(!schema.is_lookup_key("descr"));
        assert!(!schema.is_lookup_key("no-such-attr"));
    }

    #[test]
    fn soft_references_are_not_hard() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(Route);
        assert!(!schema.rule("member-of").unwrap().is_hard_reference());
        assert!(schema.rule("mnt-by").unwrap().is_hard_reference());
    }

    #[test]
    fn mntner_auth_is_mandatory() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(Mntner);
        assert!(schema.rule("auth").unwrap().cardinality.is_mandatory());
    }
}
