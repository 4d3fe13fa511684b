use std::net::IpAddr;

use whirr_types::{parse_prefix, split_list_value, AsNumber};

/// Value syntax rules an attribute value can be checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueSyntax {
    /// Free-form text, anything goes (including empty).
    AnyText,
    /// An RPSL object name: letters, digits, `-`, `_`, `:` for hierarchical
    /// set names. Must start with a letter or digit.
    ObjectName,
    /// A NIC handle, e.g. `JD1-TEST`.
    NicHandle,
    /// An autonomous system number, e.g. `AS65000`.
    AsNumber,
    /// A CIDR prefix of either address family.
    Prefix,
    /// An IPv4 CIDR prefix.
    Prefix4,
    /// An IPv6 CIDR prefix.
    Prefix6,
    /// An RFC 2822-shaped email address (loose check).
    EmailAddress,
    /// An authentication scheme line: `MD5-PW ...`, `BCRYPT-PW ...`,
    /// `ED25519 ...`.
    AuthScheme,
    /// A comma/whitespace-separated member list; each element must be a
    /// plausible member name (AS number, set name, or prefix).
    Members,
    /// Hexadecimal digits, whitespace allowed between groups.
    Hexadecimal,
}

impl ValueSyntax {
    /// Check a single attribute value against this syntax.
    ///
    /// Returns a human-readable reason on failure; the validator attaches
    /// the attribute name.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        let value = value.trim();
        match self {
            Self::AnyText => Ok(()),
            Self::ObjectName => validate_name(value, true),
            Self::NicHandle => validate_name(value, false),
            Self::AsNumber => value
                .parse::<AsNumber>()
                .map(|_| ())
                .map_err(|_| format!("not a valid AS number: {value}")),
            Self::Prefix => parse_prefix(value)
                .map(|_| ())
                .map_err(|_| format!("not a valid CIDR prefix: {value}")),
            Self::Prefix4 => match parse_prefix(value) {
                Ok(net) if matches!(net.addr(), IpAddr::V4(_)) => Ok(()),
                Ok(_) => Err(format!("not an IPv4 prefix: {value}")),
                Err(_) => Err(format!("not a valid CIDR prefix: {value}")),
            },
            Self::Prefix6 => match parse_prefix(value) {
                Ok(net) if matches!(net.addr(), IpAddr::V6(_)) => Ok(()),
                Ok(_) => Err(format!("not an IPv6 prefix: {value}")),
                Err(_) => Err(format!("not a valid CIDR prefix: {value}")),
            },
            Self::EmailAddress => {
                let mut parts = value.split('@');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(local), Some(domain), None)
                        if !local.is_empty()
                            && !domain.is_empty()
                            && !value.chars().any(char::is_whitespace) =>
                    {
                        Ok(())
                    }
                    _ => Err(format!("not a valid email address: {value}")),
                }
            }
            Self::AuthScheme => {
                let mut parts = value.splitn(2, char::is_whitespace);
                let scheme = parts.next().unwrap_or_default();
                let rest = parts.next().unwrap_or_default().trim();
                match scheme.to_ascii_uppercase().as_str() {
                    "MD5-PW" | "BCRYPT-PW" | "ED25519" if !rest.is_empty() => Ok(()),
                    "MD5-PW" | "BCRYPT-PW" | "ED25519" => {
                        Err("auth scheme is missing its data".to_string())
                    }
                    other => Err(format!("unknown auth scheme: {other}")),
                }
            }
            Self::Members => {
                for member in split_list_value(value) {
                    if member.parse::<AsNumber>().is_ok()
                        || parse_prefix(member).is_ok()
                        || validate_name(member, true).is_ok()
                    {
                        continue;
                    }
                    return Err(format!("invalid member: {member}"));
                }
                Ok(())
            }
            Self::Hexadecimal => {
                if !value.is_empty()
                    && value
                        .chars()
                        .all(|c| c.is_ascii_hexdigit() || c.is_whitespace())
                {
                    Ok(())
                } else {
                    Err(format!("not hexadecimal: {value}"))
                }
            }
        }
    }
}

fn validate_name(value: &str, allow_hierarchy: bool) -> Result<(), String> {
    if value.is_empty() {
        return Err("empty name".to_string());
    }
    let first = value.chars().next().unwrap_or(' ');
    if !first.is_ascii_alphanumeric() {
        return Err(format!("name must start with a letter or digit: {value}"));
    }
    let valid = value.chars().all(|c| {
        c.is_ascii_alphanumeric() || c == '-' || c == '_' || (allow_hierarchy && c == ':')
    });
    if valid {
        Ok(())
    } else {
        Err(format!("invalid character in name: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names() {
        assert!(ValueSyntax::ObjectName.validate("AS-EXAMPLE").is_ok());
        assert!(ValueSyntax::ObjectName.validate("AS65000:AS-CUST").is_ok());
        assert!(ValueSyntax::ObjectName.validate("-leading").is_err());
        assert!(ValueSyntax::ObjectName.validate("has space").is_err());
        assert!(ValueSyntax::ObjectName.validate("").is_err());
    }

    #[test]
    fn nic_handles_reject_hierarchy() {
        assert!(ValueSyntax::NicHandle.validate("JD1-TEST").is_ok());
        assert!(ValueSyntax::NicHandle.validate("A:B").is_err());
    }

    #[test]
    fn as_numbers() {
        assert!(ValueSyntax::AsNumber.validate("AS65000").is_ok());
        assert!(ValueSyntax::AsNumber.validate("65000").is_err());
    }

    #[test]
    fn prefixes_by_family() {
        assert!(ValueSyntax::Prefix4.validate("192.0.2.0/24").is_ok());
        assert!(ValueSyntax::Prefix4.validate("2001:db8::/32").is_err());
        assert!(ValueSyntax::Prefix6.validate("2001:db8::/32").is_ok());
        assert!(ValueSyntax::Prefix6.validate("192.0.2.0/24").is_err());
        assert!(ValueSyntax::Prefix.validate("192.0.2.0/24").is_ok());
        assert!(ValueSyntax::Prefix.validate("2001:db8::/32").is_ok());
        assert!(ValueSyntax::Prefix.validate("192.0.2.1").is_err());
    }

    #[test]
    fn email_addresses() {
        assert!(ValueSyntax::EmailAddress.validate("a@b.example").is_ok());
        assert!(ValueSyntax::EmailAddress.validate("no-at-sign").is_err());
        assert!(ValueSyntax::EmailAddress.validate("two@@signs").is_err());
        assert!(ValueSyntax::EmailAddress.validate("spa ce@x").is_err());
    }

    #[test]
    fn auth_schemes() {
        assert!(ValueSyntax::AuthScheme.validate("MD5-PW $1$abc$def").is_ok());
        assert!(ValueSyntax::AuthScheme.validate("BCRYPT-PW $2b$12$xyz").is_ok());
        assert!(ValueSyntax::AuthScheme.validate("ED25519 abcdef").is_ok());
        assert!(ValueSyntax::AuthScheme.validate("MD5-PW").is_err());
        assert!(ValueSyntax::AuthScheme.validate("CRYPT-PW x").is_err());
    }

    #[test]
    fn member_lists() {
        assert!(ValueSyntax::Members.validate("AS1, AS2, AS-FOO").is_ok());
        assert!(ValueSyntax::Members.validate("192.0.2.0/24, AS3").is_ok());
        assert!(ValueSyntax::Members.validate("AS1, !bad!").is_err());
        // Empty member list is fine; cardinality is checked elsewhere.
        assert!(ValueSyntax::Members.validate("").is_ok());
    }

    #[test]
    fn hexadecimal() {
        assert!(ValueSyntax::Hexadecimal.validate("DEAD BEEF 1234").is_ok());
        assert!(ValueSyntax::Hexadecimal.validate("XYZ").is_err());
        assert!(ValueSyntax::Hexadecimal.validate("").is_err());
    }
}
