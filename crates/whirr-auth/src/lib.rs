//! Maintainer authentication for the whirr routing registry.
//!
//! A write to a protected object is authorized when at least one credential
//! on one of the object's responsible maintainers validates the submitted
//! proof. Credentials are tagged variants ([`Credential`]); proofs are
//! plaintext password candidates or detached Ed25519 signatures
//! ([`Proof`]). Evaluation is constant-structure: every credential is
//! checked, results are OR-accumulated, and hash comparisons are
//! constant-time, so neither timing nor the denial message reveals which
//! credential came close.

pub mod authorizer;
pub mod credential;
pub mod error;
pub mod md5_crypt;

pub use authorizer::{authorize, Decision};
pub use credential::{Credential, MaintainerAuth, Proof};
pub use error::{AuthError, AuthResult};
