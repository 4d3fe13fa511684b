use crate::credential::{MaintainerAuth, Proof};

/// Outcome of an authorization check.
///
/// A denial is generic on purpose: it never reveals which maintainer or
/// credential came close.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Authorized,
    Denied,
}

impl Decision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }
}

/// Evaluate a proof against every credential of every listed maintainer.
///
/// OR semantics: any single match authorizes. Constant structure: every
/// credential is evaluated and the results are OR-accumulated; the loop
/// never returns early, so response timing does not depend on which
/// maintainer or credential matched.
pub fn authorize(maintainers: &[MaintainerAuth], proof: &Proof) -> Decision {
    let mut matched = false;
    for maintainer in maintainers {
        for credential in &maintainer.credentials {
            matched |= credential.matches(proof);
        }
    }
    if matched {
        Decision::Authorized
    } else {
        Decision::Denied
    }
}
