use whirr_query::{Query, QueryMode};
use whirr_types::{ObjectClass, Source};

use crate::error::{ProtocolError, ProtocolResult};

/// One parsed client request line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Query(Query),
    /// `!q` — close the connection.
    Quit,
}

/// Parse one whois request line.
///
/// Grammar: RIPE-style flags before a bare search term —
/// `-T class[,class]` type filter, `-i attr value` inverse lookup,
/// `-L` less-specific, `-M` more-specific, `-x` exact prefix,
/// `-s src[,src]` source restriction, `-a` all sources — plus the
/// bang commands `!i<set-name>` (set expansion) and `!q` (quit).
pub fn parse_request_line(line: &str) -> ProtocolResult<Request> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::EmptyRequest);
    }

    if let Some(rest) = line.strip_prefix('!') {
        return parse_bang_command(rest);
    }

    let mut mode: Option<QueryMode> = None;
    let mut classes: Option<Vec<ObjectClass>> = None;
    let mut sources: Option<Vec<Source>> = None;
    let mut all_sources = false;
    let mut key_parts: Vec<&str> = Vec::new();

    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if !key_parts.is_empty() || !token.starts_with('-') {
            // Flags come first; everything from the first non-flag token on
            // is the search term (person names contain spaces).
            key_parts.push(token);
            continue;
        }
        match token {
            "-T" => {
                let arg = tokens
                    .next()
                    .ok_or_else(|| ProtocolError::MissingArgument("-T".to_string()))?;
                let mut parsed = Vec::new();
                for name in arg.split(',') {
                    let class: ObjectClass = name
                        .parse()
                        .map_err(|_| ProtocolError::UnknownClass(name.to_string()))?;
                    parsed.push(class);
                }
                classes = Some(parsed);
            }
            "-i" => {
                let attribute = tokens
                    .next()
                    .ok_or_else(|| ProtocolError::MissingArgument("-i".to_string()))?;
                set_mode(
                    &mut mode,
                    QueryMode::ReverseAttribute {
                        attribute: attribute.to_ascii_lowercase(),
                    },
                )?;
            }
            "-L" => set_mode(&mut mode, QueryMode::LessSpecific)?,
            "-M" => set_mode(&mut mode, QueryMode::MoreSpecific)?,
            "-x" => set_mode(&mut mode, QueryMode::ExactPrefix)?,
            "-s" => {
                let arg = tokens
                    .next()
                    .ok_or_else(|| ProtocolError::MissingArgument("-s".to_string()))?;
                let mut parsed = Vec::new();
                for name in arg.split(',') {
                    let source = Source::new(name)
                        .map_err(|_| ProtocolError::InvalidSource(name.to_string()))?;
                    parsed.push(source);
                }
                sources = Some(parsed);
            }
            "-a" => all_sources = true,
            other => return Err(ProtocolError::UnknownFlag(other.to_string())),
        }
    }

    if key_parts.is_empty() {
        return Err(ProtocolError::MissingSearchTerm);
    }

    let mut query = Query::new(mode.unwrap_or(QueryMode::Exact), &key_parts.join(" "));
    query.class_filter = classes;
    query.sources = sources;
    query.all_sources = all_sources;
    Ok(Request::Query(query))
}

fn parse_bang_command(rest: &str) -> ProtocolResult<Request> {
    if rest.eq_ignore_ascii_case("q") {
        return Ok(Request::Quit);
    }
    if let Some(name) = rest.strip_prefix('i').or_else(|| rest.strip_prefix('I')) {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProtocolError::MissingSearchTerm);
        }
        return Ok(Request::Query(Query::new(QueryMode::SetExpand, name)));
    }
    Err(ProtocolError::UnknownFlag(format!("!{rest}")))
}

fn set_mode(slot: &mut Option<QueryMode>, mode: QueryMode) -> ProtocolResult<()> {
    if slot.is_some() {
        return Err(ProtocolError::ConflictingFlags);
    }
    *slot = Some(mode);
    Ok(())
}
