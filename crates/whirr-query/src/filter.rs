use whirr_types::RpslObject;

/// Attributes suppressed from the output of filtered sources: personal
/// contact detail. This is data shaping, not an authorization decision;
/// reads are unauthenticated by design.
pub const FILTERED_ATTRIBUTES: [&str; 4] = ["e-mail", "phone", "fax-no", "notify"];

/// Strip personal-contact attributes from an object for output.
pub fn shape_for_output(object: &mut RpslObject) {
    object
        .attributes
        .retain(|attr| !FILTERED_ATTRIBUTES.contains(&attr.name.as_str()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use whirr_types::{ObjectClass, RpslAttribute};

    #[test]
    fn personal_attributes_are_dropped() {
        let mut object = RpslObject::new(
            ObjectClass::Person,
            vec![
                RpslAttribute::new("person", "Jane Doe"),
                RpslAttribute::new("e-mail", "jane@example.net"),
                RpslAttribute::new("phone", "+1 555 0100"),
                RpslAttribute::new("nic-hdl", "JD1-TEST"),
                RpslAttribute::new("source", "TEST"),
            ],
        );
        shape_for_output(&mut object);
        let names: Vec<_> = object.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["person", "nic-hdl", "source"]);
    }

    #[test]
    fn objects_without_personal_data_are_untouched() {
        let mut object = RpslObject::new(
            ObjectClass::Route,
            vec![
                RpslAttribute::new("route", "192.0.2.0/24"),
                RpslAttribute::new("origin", "AS65000"),
                RpslAttribute::new("source", "TEST"),
            ],
        );
        let before = object.clone();
        shape_for_output(&mut object);
        assert_eq!(object, before);
    }
}
