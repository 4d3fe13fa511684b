use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use whirr_types::RpslObject;

use crate::error::{AuthError, AuthResult};

/// One credential from a maintainer's `auth:` attribute.
///
/// Tagged variants, all evaluated through [`Credential::matches`]; a
/// maintainer authorizes a mutation when any one of its credentials
/// matches the submitted proof.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// `MD5-PW $1$salt$digest` — legacy MD5-crypt hash.
    Md5Password(String),
    /// `BCRYPT-PW $2b$...` — salted bcrypt hash.
    BcryptPassword(String),
    /// `ED25519 <64 hex chars>` — public key for detached signatures.
    Ed25519Key(VerifyingKey),
}

impl Credential {
    /// Parse one `auth:` attribute value.
    pub fn parse(value: &str) -> AuthResult<Self> {
        let value = value.trim();
        let (scheme, data) = value
            .split_once(char::is_whitespace)
            .ok_or_else(|| AuthError::MalformedCredential(value.to_string()))?;
        let data = data.trim();
        match scheme.to_ascii_uppercase().as_str() {
            "MD5-PW" => {
                if data.starts_with("$1$") && data.matches('$').count() >= 3 {
                    Ok(Self::Md5Password(data.to_string()))
                } else {
                    Err(AuthError::MalformedCredential(value.to_string()))
                }
            }
            "BCRYPT-PW" => {
                if data.starts_with("$2") {
                    Ok(Self::BcryptPassword(data.to_string()))
                } else {
                    Err(AuthError::MalformedCredential(value.to_string()))
                }
            }
            "ED25519" => {
                let bytes = hex::decode(data)
                    .map_err(|_| AuthError::MalformedCredential(value.to_string()))?;
                let bytes: [u8; 32] = bytes
                    .try_into()
                    .map_err(|_| AuthError::MalformedCredential(value.to_string()))?;
                let key = VerifyingKey::from_bytes(&bytes)
                    .map_err(|_| AuthError::MalformedCredential(value.to_string()))?;
                Ok(Self::Ed25519Key(key))
            }
            other => Err(AuthError::UnknownScheme(other.to_string())),
        }
    }

    /// Evaluate this credential against a proof. Password proofs are
    /// checked with constant-time hash comparison; mismatched proof kinds
    /// simply do not match.
    pub fn matches(&self, proof: &Proof) -> bool {
        match (self, proof) {
            (Self::Md5Password(stored), Proof::Password(candidate)) => {
                crate::md5_crypt::verify(candidate, stored)
            }
            (Self::BcryptPassword(stored), Proof::Password(candidate)) => {
                bcrypt::verify(candidate, stored).unwrap_or(false)
            }
            (Self::Ed25519Key(key), Proof::Signature { payload, signature }) => {
                match Signature::from_slice(signature) {
                    Ok(sig) => key.verify(payload, &sig).is_ok(),
                    Err(_) => false,
                }
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Md5Password(_) => write!(f, "Credential::Md5Password(<hash>)"),
            Self::BcryptPassword(_) => write!(f, "Credential::BcryptPassword(<hash>)"),
            Self::Ed25519Key(key) => {
                write!(f, "Credential::Ed25519Key({})", hex::encode(key.to_bytes()))
            }
        }
    }
}

/// The proof a submitter attaches to a mutation.
#[derive(Clone, PartialEq, Eq)]
pub enum Proof {
    /// A plaintext password candidate. Never logged, never stored.
    Password(String),
    /// A detached signature over the submitted object text.
    Signature { payload: Vec<u8>, signature: Vec<u8> },
}

impl std::fmt::Debug for Proof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password(_) => write!(f, "Proof::Password(<redacted>)"),
            Self::Signature { payload, signature } => f
                .debug_struct("Proof::Signature")
                .field("payload_len", &payload.len())
                .field("signature_len", &signature.len())
                .finish(),
        }
    }
}

/// The credentials of one maintainer, extracted fresh from its mntner
/// object for each authorization check.
#[derive(Clone, Debug)]
pub struct MaintainerAuth {
    pub name: String,
    pub credentials: Vec<Credential>,
}

impl MaintainerAuth {
    /// Collect the parseable credentials from a mntner object's `auth:`
    /// attributes. Unparseable entries are dropped: a credential that
    /// cannot be understood can never authorize anything.
    pub fn from_object(object: &RpslObject) -> Self {
        let name = object.class_value().unwrap_or_default().to_string();
        let credentials = object
            .values("auth")
            .into_iter()
            .filter_map(|value| Credential::parse(value).ok())
            .collect();
        Self { name, credentials }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::md5_crypt::md5_crypt;
    use ed25519_dalek::{Signer, SigningKey};
    use whirr_types::{ObjectClass, RpslAttribute};

    fn signing_key() -> SigningKey {
        SigningKey::generate(&mut rand::thread_rng())
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn parse_md5() {
        let cred = Credential::parse("MD5-PW $1$abcd$efgh12345678901234567").unwrap();
        assert!(matches!(cred, Credential::Md5Password(_)));
    }

    #[test]
    fn parse_bcrypt() {
        let hash = bcrypt::hash("pw", 4).unwrap();
        let cred = Credential::parse(&format!("BCRYPT-PW {hash}")).unwrap();
        assert!(matches!(cred, Credential::BcryptPassword(_)));
    }

    #[test]
    fn parse_ed25519() {
        let key = signing_key().verifying_key();
        let value = format!("ED25519 {}", hex::encode(key.to_bytes()));
        let cred = Credential::parse(&value).unwrap();
        assert_eq!(cred, Credential::Ed25519Key(key));
    }

    #[test]
    fn parse_is_scheme_case_insensitive() {
        assert!(Credential::parse("md5-pw $1$a$b").is_ok());
    }

    #[test]
    fn parse_rejects_unknown_scheme() {
        assert_eq!(
            Credential::parse("CRYPT-PW abc").unwrap_err(),
            AuthError::UnknownScheme("CRYPT-PW".to_string())
        );
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Credential::parse("MD5-PW").is_err());
        assert!(Credential::parse("MD5-PW plaintext").is_err());
        assert!(Credential::parse("BCRYPT-PW $1$wrong").is_err());
        assert!(Credential::parse("ED25519 nothex").is_err());
        assert!(Credential::parse("ED25519 abcd").is_err()); // wrong length
    }

    // -----------------------------------------------------------------------
    // Matching
    // -----------------------------------------------------------------------

    #[test]
    fn md5_password_matches() {
        let cred = Credential::Md5Password(md5_crypt(b"s3cret", "testsalt"));
        assert!(cred.matches(&Proof::Password("s3cret".to_string())));
        assert!(!cred.matches(&Proof::Password("wrong".to_string())));
    }

    #[test]
    fn bcrypt_password_matches() {
        let cred = Credential::BcryptPassword(bcrypt::hash("s3cret", 4).unwrap());
        assert!(cred.matches(&Proof::Password("s3cret".to_string())));
        assert!(!cred.matches(&Proof::Password("wrong".to_string())));
    }

    #[test]
    fn signature_matches() {
        let sk = signing_key();
        let cred = Credential::Ed25519Key(sk.verifying_key());
        let payload = b"route: 192.0.2.0/24".to_vec();
        let signature = sk.sign(&payload).to_bytes().to_vec();
        assert!(cred.matches(&Proof::Signature {
            payload: payload.clone(),
            signature,
        }));
        assert!(!cred.matches(&Proof::Signature {
            payload,
            signature: vec![0u8; 64],
        }));
    }

    #[test]
    fn proof_kind_mismatch_never_matches() {
        let cred = Credential::Md5Password(md5_crypt(b"pw", "salt"));
        assert!(!cred.matches(&Proof::Signature {
            payload: vec![],
            signature: vec![],
        }));
        let key = signing_key().verifying_key();
        let cred = Credential::Ed25519Key(key);
        assert!(!cred.matches(&Proof::Password("pw".to_string())));
    }

    // -----------------------------------------------------------------------
    // Extraction and redaction
    // -----------------------------------------------------------------------

    #[test]
    fn maintainer_auth_from_object_skips_unparseable() {
        let object = RpslObject::new(
            ObjectClass::Mntner,
            vec![
                RpslAttribute::new("mntner", "EXAMPLE-MNT"),
                RpslAttribute::new("auth", "MD5-PW $1$abcd$efgh"),
                RpslAttribute::new("auth", "PGPKEY-DEADBEEF"),
                RpslAttribute::new("source", "TEST"),
            ],
        );
        let auth = MaintainerAuth::from_object(&object);
        assert_eq!(auth.name, "EXAMPLE-MNT");
        assert_eq!(auth.credentials.len(), 1);
    }

    #[test]
    fn debug_redacts_secrets() {
        let proof = Proof::Password("topsecret".to_string());
        assert!(!format!("{proof:?}").contains("topsecret"));

        let cred = Credential::Md5Password(md5_crypt(b"topsecret", "salt"));
        assert!(!format!("{cred:?}").contains("salt"));
    }
}
