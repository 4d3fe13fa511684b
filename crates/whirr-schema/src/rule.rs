use whirr_types::ObjectClass;

use crate::syntax::ValueSyntax;

/// How many times an attribute may (or must) appear in an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly once.
    Single,
    /// At least once.
    Multiple,
    /// Zero or one.
    OptionalSingle,
    /// Zero or more.
    OptionalMultiple,
}

impl Cardinality {
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Self::Single | Self::Multiple)
    }

    pub fn allows_multiple(&self) -> bool {
        matches!(self, Self::Multiple | Self::OptionalMultiple)
    }
}

/// The schema rule for one attribute of one object class.
#[derive(Clone, Debug)]
pub struct AttributeRule {
    pub name: &'static str,
    pub cardinality: Cardinality,
    pub syntax: ValueSyntax,
    /// Part of the object's primary key.
    pub primary_key: bool,
    /// Indexed for reverse-attribute queries.
    pub lookup_key: bool,
    /// Classes this attribute's value must reference, empty for none.
    pub references: &'static [ObjectClass],
    /// A soft reference is advisory: validation does not require the
    /// referenced object to exist.
    pub soft_reference: bool,
    /// Long values of this attribute may be re-wrapped on serialization.
    pub continuable: bool,
}

impl AttributeRule {
    pub const fn new(name: &'static str, cardinality: Cardinality, syntax: ValueSyntax) -> Self {
        Self {
            name,
            cardinality,
            syntax,
            primary_key: false,
            lookup_key: false,
            references: &[],
            soft_reference: false,
            continuable: false,
        }
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub const fn lookup_key(mut self) -> Self {
        self.lookup_key = true;
        self
    }

    pub const fn references(mut self, classes: &'static [ObjectClass]) -> Self {
        self.references = classes;
        self
    }

    pub const fn soft(mut self) -> Self {
        self.soft_reference = true;
        self
    }

    pub const fn continuable(mut self) -> Self {
        self.continuable = true;
        self
    }

    /// A hard reference must resolve to an existing object at validation.
    pub fn is_hard_reference(&self) -> bool {
        !self.references.is_empty() && !self.soft_reference
    }
}
