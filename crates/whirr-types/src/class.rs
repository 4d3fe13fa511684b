use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The closed set of RPSL object classes the registry understands.
///
/// The class of an object is given by the name of its first attribute.
/// Classes outside this set are rejected at parse time; attribute-level
/// forward compatibility is handled separately by the parser's
/// `unrecognized` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectClass {
    Route,
    Route6,
    AutNum,
    AsSet,
    RouteSet,
    Mntner,
    Person,
    Role,
    KeyCert,
}

impl ObjectClass {
    /// All classes, in schema declaration order.
    pub const ALL: [ObjectClass; 9] = [
        ObjectClass::Route,
        ObjectClass::Route6,
        ObjectClass::AutNum,
        ObjectClass::AsSet,
        ObjectClass::RouteSet,
        ObjectClass::Mntner,
        ObjectClass::Person,
        ObjectClass::Role,
        ObjectClass::KeyCert,
    ];

    /// The RPSL class name as it appears in object text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Route6 => "route6",
            Self::AutNum => "aut-num",
            Self::AsSet => "as-set",
            Self::RouteSet => "route-set",
            Self::Mntner => "mntner",
            Self::Person => "person",
            Self::Role => "role",
            Self::KeyCert => "key-cert",
        }
    }

    /// Returns `true` for set classes that support recursive member expansion.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::AsSet | Self::RouteSet)
    }

    /// Returns `true` for route registration classes.
    pub fn is_route(&self) -> bool {
        matches!(self, Self::Route | Self::Route6)
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectClass {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "route" => Ok(Self::Route),
            "route6" => Ok(Self::Route6),
            "aut-num" => Ok(Self::AutNum),
            "as-set" => Ok(Self::AsSet),
            "route-set" => Ok(Self::RouteSet),
            "mntner" => Ok(Self::Mntner),
            "person" => Ok(Self::Person),
            "role" => Ok(Self::Role),
            "key-cert" => Ok(Self::KeyCert),
            other => Err(TypeError::UnknownClass(other.to_string())),
        }
    }
}
