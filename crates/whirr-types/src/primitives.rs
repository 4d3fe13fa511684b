use std::fmt;
use std::str::FromStr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// An autonomous system number, e.g. `AS65000`.
///
/// Covers the full 32-bit range. Parsing accepts any casing of the `AS`
/// prefix; display always emits upper case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AsNumber(pub u32);

impl AsNumber {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl FromStr for AsNumber {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("AS")
            .or_else(|| trimmed.strip_prefix("as"))
            .or_else(|| trimmed.strip_prefix("As"))
            .or_else(|| trimmed.strip_prefix("aS"))
            .ok_or_else(|| TypeError::InvalidAsNumber(s.to_string()))?;
        let number: u32 = digits
            .parse()
            .map_err(|_| TypeError::InvalidAsNumber(s.to_string()))?;
        Ok(Self(number))
    }
}

/// Parse a CIDR prefix, normalizing host bits to zero.
///
/// Accepts both address families. A bare address without a mask length is
/// rejected; registry prefixes are always explicit CIDR.
pub fn parse_prefix(s: &str) -> Result<IpNet, TypeError> {
    let trimmed = s.trim();
    if !trimmed.contains('/') {
        return Err(TypeError::InvalidPrefix(s.to_string()));
    }
    let net: IpNet = trimmed
        .parse()
        .map_err(|_| TypeError::InvalidPrefix(s.to_string()))?;
    Ok(net.trunc())
}
