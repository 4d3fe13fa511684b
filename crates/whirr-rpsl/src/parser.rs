use whirr_schema::SchemaRegistry;
use whirr_types::{ObjectClass, RpslAttribute, RpslObject};

use crate::error::{ParseError, ParseResult};

/// Split a dump or submission into blank-line-separated object blocks.
///
/// Blocks consisting only of comment lines are dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            let block = &text[start..offset];
            if block_has_content(block) {
                blocks.push(block);
            }
            start = offset + line.len();
        }
        offset += line.len();
    }
    let tail = &text[start..];
    if block_has_content(tail) {
        blocks.push(tail);
    }
    blocks
}

fn block_has_content(block: &str) -> bool {
    block
        .lines()
        .any(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
}

/// Parse one RPSL object from text.
///
/// Rules:
/// - `name: value` lines start attributes; the name before the first colon
///   must be non-empty and use `a-z0-9-` only;
/// - lines starting with space, tab, or `+` continue the previous
///   attribute's value (joined with a newline);
/// - `#` starts a comment running to end of line;
/// - a blank line ends the object, and trailing non-blank content after it
///   is an error;
/// - the first attribute's name selects the object class.
///
/// Attributes the class schema does not define are kept and flagged
/// `unrecognized`, so serialization is lossless for forward-incompatible
/// objects.
pub fn parse_object(text: &str, registry: &SchemaRegistry) -> ParseResult<RpslObject> {
    let mut attributes: Vec<RpslAttribute> = Vec::new();
    let mut object_ended = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw_line.trim().is_empty() {
            if !attributes.is_empty() {
                object_ended = true;
            }
            continue;
        }
        if object_ended {
            return Err(ParseError::MultipleObjects);
        }

        let line = strip_comment(raw_line);
        if line.trim().is_empty() {
            // Line was only a comment.
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') || line.starts_with('+') {
            let last = attributes
                .last_mut()
                .ok_or(ParseError::ContinuationBeforeAttribute { line: line_no })?;
            // Only the first character is the continuation marker.
            let continued = line[1..].trim();
            last.value.push('\n');
            last.value.push_str(continued);
            continue;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedLine {
                line: line_no,
                content: raw_line.trim_end().to_string(),
            })?;
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ParseError::InvalidAttributeName {
                line: line_no,
                name: name.to_string(),
            });
        }
        attributes.push(RpslAttribute::new(&name, value.trim()));
    }

    let first = attributes.first().ok_or(ParseError::Empty)?;
    let class: ObjectClass = first
        .name
        .parse()
        .map_err(|_| ParseError::UnknownClass(first.name.clone()))?;

    let schema = registry.schema_for(class);
    for attr in &mut attributes {
        attr.unrecognized = schema.rule(&attr.name).is_none();
    }

    Ok(RpslObject::new(class, attributes))
}

/// Strip an end-of-line `#` comment.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
