use thiserror::Error;
use whirr_schema::Schema;
use whirr_types::{parse_prefix, split_list_value, ObjectKey, RpslObject, Source};

use crate::lookup::ObjectLookup;
use crate::violation::{Collector, Violations};

/// How thoroughly to validate a candidate object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    /// The authenticated submission path: every rule applies.
    Strict,
    /// The mirror/seed path: only the primary key must be present and
    /// well-formed. Mirrored data may reference objects that arrive later
    /// in the stream and may carry attributes newer than this schema.
    NonStrict,
}

/// Validate a candidate object against its class schema.
///
/// Checks run in order — cardinality, unknown attributes, value syntax,
/// hard references, primary-key consistency — and every violation is
/// collected; the result is all-or-nothing and the caller must reject the
/// whole object on any violation.
pub fn validate(
    object: &RpslObject,
    source: &Source,
    schema: &Schema,
    lookup: &dyn ObjectLookup,
    mode: ValidationMode,
) -> Result<(), Violations> {
    let mut collector = Collector::default();

    match mode {
        ValidationMode::Strict => {
            check_cardinality(object, schema, &mut collector);
            check_unknown_attributes(object, &mut collector);
            check_syntax(object, schema, &mut collector);
            check_references(object, source, schema, lookup, &mut collector);
            check_primary_key(object, schema, &mut collector);
        }
        ValidationMode::NonStrict => {
            for rule in schema.primary_key_rules() {
                match object.first_value(rule.name) {
                    None => collector.push(rule.name, "missing primary key attribute"),
                    Some(value) => {
                        if let Err(reason) = rule.syntax.validate(value) {
                            collector.push(rule.name, reason);
                        }
                    }
                }
            }
        }
    }

    collector.finish()
}

fn check_cardinality(object: &RpslObject, schema: &Schema, collector: &mut Collector) {
    for rule in &schema.attributes {
        let count = object.count(rule.name);
        if rule.cardinality.is_mandatory() && count == 0 {
            collector.push(rule.name, "missing mandatory attribute");
        }
        if !rule.cardinality.allows_multiple() && count > 1 {
            collector.push(
                rule.name,
                format!("appears {count} times, allowed at most once"),
            );
        }
    }
}

fn check_unknown_attributes(object: &RpslObject, collector: &mut Collector) {
    for attr in &object.attributes {
        if attr.unrecognized {
            collector.push(&attr.name, "unknown attribute");
        }
    }
}

fn check_syntax(object: &RpslObject, schema: &Schema, collector: &mut Collector) {
    for attr in &object.attributes {
        if let Some(rule) = schema.rule(&attr.name) {
            if let Err(reason) = rule.syntax.validate(&attr.value) {
                collector.push(&attr.name, reason);
            }
        }
    }
}

fn check_references(
    object: &RpslObject,
    source: &Source,
    schema: &Schema,
    lookup: &dyn ObjectLookup,
    collector: &mut Collector,
) {
    // A reference to the candidate object itself is satisfied by the very
    // commit under validation (a mntner may be mnt-by itself on creation).
    let own_pk = schema.primary_key_of(object).ok();

    for attr in &object.attributes {
        let Some(rule) = schema.rule(&attr.name) else {
            continue;
        };
        if !rule.is_hard_reference() {
            continue;
        }
        for referenced in split_list_value(&attr.value) {
            let pk = whirr_types::normalize_pk(referenced);
            let is_self =
                rule.references.contains(&object.class) && own_pk.as_deref() == Some(pk.as_str());
            if !is_self && !lookup.exists(source, rule.references, &pk) {
                collector.push(
                    &attr.name,
                    format!("referenced object does not exist: {referenced}"),
                );
            }
        }
    }
}

/// Primary-key internal consistency. Each key part must already be valid
/// (syntax check); here we additionally require route prefixes to be in
/// canonical form so the stored key equals what the text declares.
fn check_primary_key(object: &RpslObject, schema: &Schema, collector: &mut Collector) {
    if !object.class.is_route() {
        return;
    }
    let name = object.class.as_str();
    if let Some(value) = object.first_value(name) {
        if let Ok(net) = parse_prefix(value) {
            let canonical = net.to_string();
            if !value.trim().eq_ignore_ascii_case(&canonical) {
                collector.push(
                    name,
                    format!("prefix not in canonical form, expected {canonical}"),
                );
            }
        }
    }
}

/// Errors blocking a deletion.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeleteError {
    #[error("object not found: {0}")]
    NotFound(ObjectKey),

    /// Referential integrity: the object is the target of a hard reference
    /// from another still-existing object.
    #[error("object {key} is still referenced by {referrers:?}")]
    ReferencedBy {
        key: ObjectKey,
        referrers: Vec<ObjectKey>,
    },
}

/// Validate a deletion: the object must exist and must not be referenced.
pub fn validate_delete(key: &ObjectKey, lookup: &dyn ObjectLookup) -> Result<(), DeleteError> {
    if !lookup.exists(&key.source, &[key.class], &key.pk) {
        return Err(DeleteError::NotFound(key.clone()));
    }
    let referrers = lookup.referenced_by(key);
    if !referrers.is_empty() {
        tracing::debug!(%key, count = referrers.len(), "delete blocked by live references");
        return Err(DeleteError::ReferencedBy {
            key: key.clone(),
            referrers,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::testing::FakeLookup;
    use whirr_schema::SchemaRegistry;
    use whirr_types::{ObjectClass, RpslAttribute};

    fn source() -> Source {
        Source::new("TEST").unwrap()
    }

    fn route(attrs: Vec<RpslAttribute>) -> RpslObject {
        RpslObject::new(ObjectClass::Route, attrs)
    }

    fn valid_route() -> RpslObject {
        route(vec![
            RpslAttribute::new("route", "192.0.2.0/24"),
            RpslAttribute::new("origin", "AS65000"),
            RpslAttribute::new("mnt-by", "EXAMPLE-MNT"),
            RpslAttribute::new("source", "TEST"),
        ])
    }

    fn lookup_with_mntner() -> FakeLookup {
        FakeLookup::default().with_object(&source(), ObjectClass::Mntner, "EXAMPLE-MNT")
    }

    // -----------------------------------------------------------------------
    // Happy path
    // -----------------------------------------------------------------------

    #[test]
    fn valid_route_passes() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let result = validate(
            &valid_route(),
            &source(),
            schema,
            &lookup_with_mntner(),
            ValidationMode::Strict,
        );
        assert!(result.is_ok());
    }

    // -----------------------------------------------------------------------
    // Cardinality
    // -----------------------------------------------------------------------

    #[test]
    fn missing_mandatory_attribute() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let object = route(vec![
            RpslAttribute::new("route", "192.0.2.0/24"),
            RpslAttribute::new("source", "TEST"),
        ]);
        let err = validate(
            &object,
            &source(),
            schema,
            &FakeLookup::default(),
            ValidationMode::Strict,
        )
        .unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.attribute == "origin" && v.reason.contains("missing mandatory")));
    }

    #[test]
    fn repeated_single_attribute() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let mut object = valid_route();
        object
            .attributes
            .push(RpslAttribute::new("origin", "AS65001"));
        let err = validate(
            &object,
            &source(),
            schema,
            &lookup_with_mntner(),
            ValidationMode::Strict,
        )
        .unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.attribute == "origin" && v.reason.contains("allowed at most once")));
    }

    // -----------------------------------------------------------------------
    // Syntax
    // -----------------------------------------------------------------------

    #[test]
    fn bad_prefix_syntax() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let object = route(vec![
            RpslAttribute::new("route", "not-a-prefix"),
            RpslAttribute::new("origin", "AS65000"),
            RpslAttribute::new("source", "TEST"),
        ]);
        let err = validate(
            &object,
            &source(),
            schema,
            &FakeLookup::default(),
            ValidationMode::Strict,
        )
        .unwrap_err();
        assert!(err.violations.iter().any(|v| v.attribute == "route"));
    }

    #[test]
    fn all_violations_are_collected() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        // Bad prefix AND bad origin AND missing source: three problems,
        // one report.
        let object = route(vec![
            RpslAttribute::new("route", "bogus"),
            RpslAttribute::new("origin", "not-an-asn"),
        ]);
        let err = validate(
            &object,
            &source(),
            schema,
            &FakeLookup::default(),
            ValidationMode::Strict,
        )
        .unwrap_err();
        assert!(err.violations.len() >= 3);
        let attrs: Vec<_> = err.violations.iter().map(|v| v.attribute.as_str()).collect();
        assert!(attrs.contains(&"route"));
        assert!(attrs.contains(&"origin"));
        assert!(attrs.contains(&"source"));
    }

    // -----------------------------------------------------------------------
    // Unknown attributes
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_attribute_rejected_in_strict_mode() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let mut object = valid_route();
        let mut attr = RpslAttribute::new("future-attr", "x");
        attr.unrecognized = true;
        object.attributes.push(attr);

        let err = validate(
            &object,
            &source(),
            schema,
            &lookup_with_mntner(),
            ValidationMode::Strict,
        )
        .unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.attribute == "future-attr" && v.reason == "unknown attribute"));

        // Non-strict keeps it.
        let ok = validate(
            &object,
            &source(),
            schema,
            &FakeLookup::default(),
            ValidationMode::NonStrict,
        );
        assert!(ok.is_ok());
    }

    // -----------------------------------------------------------------------
    // References
    // -----------------------------------------------------------------------

    #[test]
    fn hard_reference_must_resolve() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let err = validate(
            &valid_route(),
            &source(),
            schema,
            &FakeLookup::default(), // no mntner present
            ValidationMode::Strict,
        )
        .unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.attribute == "mnt-by" && v.reason.contains("does not exist")));
    }

    #[test]
    fn soft_reference_may_dangle() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let mut object = valid_route();
        object
            .attributes
            .push(RpslAttribute::new("member-of", "RS-NONEXISTENT"));
        let result = validate(
            &object,
            &source(),
            schema,
            &lookup_with_mntner(),
            ValidationMode::Strict,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn self_reference_is_satisfied_by_the_commit_itself() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Mntner);
        let object = RpslObject::new(
            ObjectClass::Mntner,
            vec![
                RpslAttribute::new("mntner", "NEW-MNT"),
                RpslAttribute::new("admin-c", "JD1-TEST"),
                RpslAttribute::new("upd-to", "upd@example.net"),
                RpslAttribute::new("auth", "MD5-PW $1$ab$cd"),
                RpslAttribute::new("mnt-by", "NEW-MNT"),
                RpslAttribute::new("source", "TEST"),
            ],
        );
        let lookup = FakeLookup::default().with_object(&source(), ObjectClass::Person, "JD1-TEST");
        assert!(validate(&object, &source(), schema, &lookup, ValidationMode::Strict).is_ok());
    }

    #[test]
    fn reference_lookup_is_case_insensitive() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let mut object = valid_route();
        object.attributes.retain(|a| a.name != "mnt-by");
        object
            .attributes
            .push(RpslAttribute::new("mnt-by", "example-mnt"));
        let result = validate(
            &object,
            &source(),
            schema,
            &lookup_with_mntner(),
            ValidationMode::Strict,
        );
        assert!(result.is_ok());
    }

    // -----------------------------------------------------------------------
    // Primary-key consistency
    // -----------------------------------------------------------------------

    #[test]
    fn non_canonical_prefix_is_rejected() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let object = route(vec![
            RpslAttribute::new("route", "192.0.2.77/24"),
            RpslAttribute::new("origin", "AS65000"),
            RpslAttribute::new("mnt-by", "EXAMPLE-MNT"),
            RpslAttribute::new("source", "TEST"),
        ]);
        let err = validate(
            &object,
            &source(),
            schema,
            &lookup_with_mntner(),
            ValidationMode::Strict,
        )
        .unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.reason.contains("canonical form")));
    }

    // -----------------------------------------------------------------------
    // Non-strict mode
    // -----------------------------------------------------------------------

    #[test]
    fn non_strict_requires_only_primary_key() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::AutNum);
        // No as-name, no admin-c, no tech-c: strict would reject.
        let object = RpslObject::new(
            ObjectClass::AutNum,
            vec![
                RpslAttribute::new("aut-num", "AS65000"),
                RpslAttribute::new("source", "TEST"),
            ],
        );
        assert!(validate(
            &object,
            &source(),
            schema,
            &FakeLookup::default(),
            ValidationMode::NonStrict,
        )
        .is_ok());
        assert!(validate(
            &object,
            &source(),
            schema,
            &FakeLookup::default(),
            ValidationMode::Strict,
        )
        .is_err());
    }

    #[test]
    fn non_strict_still_needs_a_valid_primary_key() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(ObjectClass::Route);
        let object = route(vec![RpslAttribute::new("route", "bogus")]);
        let err = validate(
            &object,
            &source(),
            schema,
            &FakeLookup::default(),
            ValidationMode::NonStrict,
        )
        .unwrap_err();
        assert_eq!(err.violations.len(), 2); // bad route, missing origin
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    fn key(class: ObjectClass, pk: &str) -> ObjectKey {
        ObjectKey::new(source(), class, pk.to_string())
    }

    #[test]
    fn delete_existing_unreferenced() {
        let lookup = FakeLookup::default().with_object(&source(), ObjectClass::Route, "X");
        assert!(validate_delete(&key(ObjectClass::Route, "X"), &lookup).is_ok());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let lookup = FakeLookup::default();
        let err = validate_delete(&key(ObjectClass::Route, "X"), &lookup).unwrap_err();
        assert!(matches!(err, DeleteError::NotFound(_)));
    }

    #[test]
    fn delete_referenced_is_blocked() {
        let target = key(ObjectClass::Mntner, "EXAMPLE-MNT");
        let referrer = key(ObjectClass::Route, "192.0.2.0/24AS65000");
        let lookup = FakeLookup::default()
            .with_object(&source(), ObjectClass::Mntner, "EXAMPLE-MNT")
            .with_referrer(target.clone(), referrer.clone());
        let err = validate_delete(&target, &lookup).unwrap_err();
        assert_eq!(
            err,
            DeleteError::ReferencedBy {
                key: target,
                referrers: vec![referrer],
            }
        );
    }
}
