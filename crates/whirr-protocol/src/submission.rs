use whirr_auth::Proof;
use whirr_update::UpdateRequest;

use crate::error::{ProtocolError, ProtocolResult};

/// A parsed submission block: the object text with proof and control
/// pseudo-attributes separated out.
///
/// Pseudo-attributes (`password:`, `signature:`, `delete:`) carry
/// authentication proof and the requested operation; they are stripped
/// from the object text and are never stored.
#[derive(Clone)]
pub struct Submission {
    pub object_text: String,
    pub delete_reason: Option<String>,
    passwords: Vec<String>,
    signature: Option<Vec<u8>>,
}

impl Submission {
    /// The proofs to try, strongest first. Empty when the submission
    /// carried none.
    pub fn proofs(&self) -> Vec<Proof> {
        let mut proofs = Vec::new();
        if let Some(signature) = &self.signature {
            proofs.push(Proof::Signature {
                payload: self.object_text.as_bytes().to_vec(),
                signature: signature.clone(),
            });
        }
        for password in &self.passwords {
            proofs.push(Proof::Password(password.clone()));
        }
        proofs
    }

    /// The pipeline requests this submission expands to: one per proof, or
    /// a single proof-less request (which the pipeline will deny) when no
    /// proof was supplied.
    pub fn to_requests(&self) -> Vec<UpdateRequest> {
        let build = |proof: Option<Proof>| match &self.delete_reason {
            Some(reason) => UpdateRequest::delete(&self.object_text, reason, proof),
            None => UpdateRequest::add_or_update(&self.object_text, proof),
        };
        let proofs = self.proofs();
        if proofs.is_empty() {
            vec![build(None)]
        } else {
            proofs.into_iter().map(|p| build(Some(p))).collect()
        }
    }
}

impl std::fmt::Debug for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submission")
            .field("object_text_len", &self.object_text.len())
            .field("delete", &self.delete_reason.is_some())
            .field("passwords", &self.passwords.len())
            .field("has_signature", &self.signature.is_some())
            .finish()
    }
}

/// Parse the body of an `update` block: one RPSL object plus pseudo-
/// attributes.
pub fn parse_submission(block: &str) -> ProtocolResult<Submission> {
    let mut object_lines: Vec<&str> = Vec::new();
    let mut passwords = Vec::new();
    let mut signature = None;
    let mut delete_reason = None;

    for line in block.lines() {
        let lowered = line.trim_start().to_ascii_lowercase();
        if let Some(value) = pseudo_value(line, &lowered, "password:") {
            passwords.push(value.to_string());
        } else if let Some(value) = pseudo_value(line, &lowered, "signature:") {
            let decoded = hex::decode(value).map_err(|_| ProtocolError::InvalidSignature)?;
            signature = Some(decoded);
        } else if let Some(value) = pseudo_value(line, &lowered, "delete:") {
            delete_reason = Some(value.to_string());
        } else {
            object_lines.push(line);
        }
    }

    let object_text = object_lines.join("\n");
    if object_text.trim().is_empty() {
        return Err(ProtocolError::EmptySubmission);
    }

    Ok(Submission {
        object_text,
        delete_reason,
        passwords,
        signature,
    })
}

/// Continuation lines never start pseudo-attributes, so the match is
/// anchored at column zero.
fn pseudo_value<'a>(line: &'a str, lowered: &str, name: &str) -> Option<&'a str> {
    if line.starts_with(char::is_whitespace) || !lowered.starts_with(name) {
        return None;
    }
    line.split_once(':').map(|(_, value)| value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use whirr_update::Operation;

    const BLOCK: &str = "route: 192.0.2.0/24\norigin: AS65000\nmnt-by: EXAMPLE-MNT\nsource: TEST\npassword: s3cret\n";

    #[test]
    fn password_is_stripped_from_object_text() {
        let submission = parse_submission(BLOCK).unwrap();
        assert!(!submission.object_text.contains("password"));
        assert!(submission.object_text.contains("route:"));
        assert_eq!(
            submission.proofs(),
            vec![Proof::Password("s3cret".to_string())]
        );
    }

    #[test]
    fn multiple_passwords_all_become_proofs() {
        let block = format!("{BLOCK}password: other\n");
        let submission = parse_submission(&block).unwrap();
        assert_eq!(submission.proofs().len(), 2);
    }

    #[test]
    fn signature_proof_covers_stripped_text() {
        let block =
            "route: 192.0.2.0/24\norigin: AS65000\nsource: TEST\nsignature: deadbeef\n";
        let submission = parse_submission(block).unwrap();
        let proofs = submission.proofs();
        let Proof::Signature { payload, signature } = &proofs[0] else {
            panic!("expected signature proof");
        };
        assert_eq!(payload, submission.object_text.as_bytes());
        assert_eq!(signature, &vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn bad_signature_hex_is_an_error() {
        let block = "route: 192.0.2.0/24\nsignature: zzzz\n";
        assert_eq!(
            parse_submission(block).unwrap_err(),
            ProtocolError::InvalidSignature
        );
    }

    #[test]
    fn delete_marker_selects_deletion() {
        let block = format!("{BLOCK}delete: no longer announced\n");
        let submission = parse_submission(&block).unwrap();
        assert_eq!(
            submission.delete_reason.as_deref(),
            Some("no longer announced")
        );
        let requests = submission.to_requests();
        assert!(matches!(requests[0].operation, Operation::Delete { .. }));
    }

    #[test]
    fn no_proof_yields_single_proofless_request() {
        let block = "route: 192.0.2.0/24\norigin: AS65000\nsource: TEST\n";
        let submission = parse_submission(block).unwrap();
        let requests = submission.to_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].proof.is_none());
    }

    #[test]
    fn pseudo_attributes_only_match_at_column_zero() {
        // A continuation line mentioning a password stays in the object.
        let block = "mntner: X-MNT\nremarks: change the\n password: here\nsource: TEST\n";
        let submission = parse_submission(block).unwrap();
        assert!(submission.object_text.contains("password: here"));
        assert!(submission.proofs().is_empty());
    }

    #[test]
    fn empty_block_is_an_error() {
        assert_eq!(
            parse_submission("password: x\n").unwrap_err(),
            ProtocolError::EmptySubmission
        );
        assert_eq!(
            parse_submission("").unwrap_err(),
            ProtocolError::EmptySubmission
        );
    }

    #[test]
    fn debug_redacts_passwords() {
        let submission = parse_submission(BLOCK).unwrap();
        assert!(!format!("{submission:?}").contains("s3cret"));
    }
}
