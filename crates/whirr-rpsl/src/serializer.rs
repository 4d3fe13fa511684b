use whirr_schema::Schema;
use whirr_types::{RpslAttribute, RpslObject};

/// Column at which attribute values start; RPSL convention.
const VALUE_COLUMN: usize = 16;

/// Width at which continuable attribute values are re-wrapped.
const WRAP_COLUMN: usize = 78;

/// Serialize an object in its class's canonical attribute order.
///
/// Schema-defined attributes are emitted in schema declaration order (each
/// name's occurrences keep their relative input order); attributes the
/// schema does not define follow, in input order. Values are re-wrapped
/// only for attributes the schema marks continuable.
pub fn serialize(object: &RpslObject, schema: &Schema) -> String {
    let mut out = String::new();

    for rule in &schema.attributes {
        for attr in object.attributes.iter().filter(|a| a.name == rule.name) {
            let value = if rule.continuable {
                rewrap(&attr.value)
            } else {
                attr.value.clone()
            };
            emit_attribute(&mut out, &attr.name, &value);
        }
    }
    for attr in &object.attributes {
        if schema.rule(&attr.name).is_none() {
            emit_attribute(&mut out, &attr.name, &attr.value);
        }
    }
    out
}

fn emit_attribute(out: &mut String, name: &str, value: &str) {
    let mut lines = value.split('\n');
    let first = lines.next().unwrap_or_default();
    let label = format!("{name}:");
    out.push_str(&label);
    if label.len() < VALUE_COLUMN {
        out.push_str(&" ".repeat(VALUE_COLUMN - label.len()));
    } else {
        out.push(' ');
    }
    out.push_str(first);
    out.push('\n');
    for line in lines {
        if line.is_empty() {
            out.push('+');
        } else {
            out.push_str(&" ".repeat(VALUE_COLUMN));
            out.push_str(line);
        }
        out.push('\n');
    }
}

/// Re-wrap a value's lines at [`WRAP_COLUMN`], breaking at word boundaries.
/// Words longer than the wrap width are kept intact.
fn rewrap(value: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in value.split('\n') {
        if line.len() <= WRAP_COLUMN {
            lines.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() > WRAP_COLUMN {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines.join("\n")
}

/// Compare two attribute lists for semantic equality: same names in the same
/// multiset, values equal after whitespace collapsing.
pub fn semantically_equal(a: &RpslObject, b: &RpslObject) -> bool {
    if a.class != b.class || a.attributes.len() != b.attributes.len() {
        return false;
    }
    let key = |attr: &RpslAttribute| {
        (
            attr.name.clone(),
            attr.value.split_whitespace().collect::<Vec<_>>().join(" "),
        )
    };
    let mut left: Vec<_> = a.attributes.iter().map(key).collect();
    let mut right: Vec<_> = b.attributes.iter().map(key).collect();
    left.sort();
    right.sort();
    left == right
}
