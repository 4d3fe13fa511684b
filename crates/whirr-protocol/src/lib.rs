//! The whois line protocol of the whirr routing registry.
//!
//! Requests are single UTF-8 text lines: a bare search term, RIPE-style
//! flags selecting query modes, or bang commands (`!i`, `!q`). Mutations
//! arrive as an `update` block terminated by a lone `.`, carrying one RPSL
//! object plus `password:`/`signature:`/`delete:` pseudo-attributes.
//! Responses are serialized object text, `% ` status lines, or
//! `%% ERROR:` lines, each terminated by a blank line. Framing (reading
//! lines and blocks off the socket) belongs to the server crate.

pub mod error;
pub mod request;
pub mod response;
pub mod submission;

pub use error::{ProtocolError, ProtocolResult};
pub use request::{parse_request_line, Request};
pub use response::Response;
pub use submission::{parse_submission, Submission};
