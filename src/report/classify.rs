//! Row classification
//!
//! Derives the display metadata of a report row from its element record:
//! the semantic type category and the mandatory/multiplicity labels.

use std::fmt;

use serde::Serialize;

use crate::flatten::{ElementRecord, Occurs};
use crate::names::prefixed;

/// Semantic category shown in the `type` column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeCategory {
    /// `int` and `integer`
    Integer,
    /// `double`
    Double,
    /// `base64Binary`
    Base64,
    /// `date`
    Date,
    /// `dateTime`
    DateTime,
    /// `string`
    String,
    /// Element of a complex type, with the declared type
    Struct(String),
    /// Element of an enumeration type, with the declared type
    Enum(String),
    /// Group or element reference
    Group,
    /// Any other declared type, kept verbatim
    Other(String),
}

const PRIMITIVES: &[(&str, TypeCategory)] = &[
    ("int", TypeCategory::Integer),
    ("integer", TypeCategory::Integer),
    ("double", TypeCategory::Double),
    ("base64Binary", TypeCategory::Base64),
    ("date", TypeCategory::Date),
    ("dateTime", TypeCategory::DateTime),
    ("string", TypeCategory::String),
];

impl TypeCategory {
    /// Category of a declared primitive type
    ///
    /// Only names written with the root schema's XSD prefix are recognised;
    /// when the XSD namespace is the default namespace the bare local name is
    /// expected instead.
    pub fn for_primitive(type_name: &str, xsd_prefix: Option<&str>) -> Self {
        PRIMITIVES
            .iter()
            .find(|(local, _)| prefixed(xsd_prefix, local) == type_name)
            .map(|(_, category)| category.clone())
            .unwrap_or_else(|| TypeCategory::Other(type_name.to_string()))
    }

    /// Category of a flattened element
    pub fn for_record(record: &ElementRecord, xsd_prefix: Option<&str>) -> Self {
        let declared = record.type_name.clone().unwrap_or_default();
        if record.is_complex() {
            TypeCategory::Struct(declared)
        } else if record.is_simple() {
            TypeCategory::Enum(declared)
        } else if record.reference.as_deref().is_some_and(|r| !r.is_empty()) {
            TypeCategory::Group
        } else {
            Self::for_primitive(&declared, xsd_prefix)
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCategory::Integer => f.write_str("INTEGER"),
            TypeCategory::Double => f.write_str("DOUBLE"),
            TypeCategory::Base64 => f.write_str("BASE64"),
            TypeCategory::Date => f.write_str("DATE"),
            TypeCategory::DateTime => f.write_str("DATE+TIME"),
            TypeCategory::String => f.write_str("STRING"),
            TypeCategory::Struct(t) => write!(f, "STRUCT\n({})", t),
            TypeCategory::Enum(t) => write!(f, "ENUM\n({})", t),
            TypeCategory::Group => f.write_str("GROUP"),
            TypeCategory::Other(t) => f.write_str(t),
        }
    }
}

/// Mandatory and multiplicity labels of an occurrence range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cardinality {
    /// `"Y"`, `"O"` or `""`
    pub mandatory: &'static str,
    /// `"1"`, `"0..1"`, `"0..N"`, `"1..N"` or `""`
    pub multiplicity: &'static str,
}

impl Cardinality {
    /// Look up the labels of `occurs`
    ///
    /// Combinations outside the four recognised ranges get empty labels.
    pub fn of(occurs: &Occurs) -> Self {
        let (mandatory, multiplicity) = match (occurs.min.as_str(), occurs.max.as_str()) {
            ("1", "1") => ("Y", "1"),
            ("0", "1") => ("O", "0..1"),
            ("0", "unbounded") => ("O", "0..N"),
            ("1", "unbounded") => ("Y", "1..N"),
            _ => ("", ""),
        };
        Self {
            mandatory,
            multiplicity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{Direction, ElementKind, Nillable};
    use proptest::prelude::*;

    fn record(kind: ElementKind, type_name: Option<&str>, reference: Option<&str>) -> ElementRecord {
        ElementRecord {
            sequence: 0,
            name: Some("field".to_string()),
            type_name: type_name.map(str::to_string),
            reference: reference.map(str::to_string),
            kind,
            occurs: Occurs::default(),
            nillable: Nillable::Unset,
            description: String::new(),
            depth: 0,
            direction: Direction::In,
            recursive: false,
            foreign_prefix: None,
            enum_key: type_name.map(str::to_string),
        }
    }

    #[test]
    fn test_primitive_categories() {
        let xs = Some("xs");
        assert_eq!(TypeCategory::for_primitive("xs:int", xs), TypeCategory::Integer);
        assert_eq!(TypeCategory::for_primitive("xs:integer", xs), TypeCategory::Integer);
        assert_eq!(TypeCategory::for_primitive("xs:dateTime", xs).to_string(), "DATE+TIME");
        assert_eq!(TypeCategory::for_primitive("xs:base64Binary", xs).to_string(), "BASE64");
        assert_eq!(TypeCategory::for_primitive("xs:decimal", xs).to_string(), "xs:decimal");
    }

    #[test]
    fn test_primitive_needs_matching_prefix() {
        assert_eq!(
            TypeCategory::for_primitive("xsd:string", Some("xs")),
            TypeCategory::Other("xsd:string".to_string())
        );
        assert_eq!(TypeCategory::for_primitive("string", None), TypeCategory::String);
        assert_eq!(TypeCategory::for_primitive("", Some("xs")).to_string(), "");
    }

    #[test]
    fn test_record_categories() {
        let xs = Some("xs");
        let complex = record(ElementKind::Complex, Some("tns:OrderType"), None);
        assert_eq!(TypeCategory::for_record(&complex, xs).to_string(), "STRUCT\n(tns:OrderType)");

        let simple = record(ElementKind::Simple, Some("Status"), None);
        assert_eq!(TypeCategory::for_record(&simple, xs).to_string(), "ENUM\n(Status)");

        let group = record(ElementKind::GroupRef, None, Some("Audit"));
        assert_eq!(TypeCategory::for_record(&group, xs), TypeCategory::Group);

        let primitive = record(ElementKind::Primitive, Some("xs:double"), None);
        assert_eq!(TypeCategory::for_record(&primitive, xs), TypeCategory::Double);
    }

    #[test]
    fn test_cardinality_table() {
        let cases = [
            (None, None, "Y", "1"),
            (Some("0"), None, "O", "0..1"),
            (Some("0"), Some("unbounded"), "O", "0..N"),
            (None, Some("unbounded"), "Y", "1..N"),
            (Some("2"), Some("5"), "", ""),
            (Some("0"), Some("3"), "", ""),
        ];
        for (min, max, mandatory, multiplicity) in cases {
            let c = Cardinality::of(&Occurs::from_attributes(min, max));
            assert_eq!(c.mandatory, mandatory, "min={:?} max={:?}", min, max);
            assert_eq!(c.multiplicity, multiplicity, "min={:?} max={:?}", min, max);
        }
    }

    proptest! {
        #[test]
        fn test_unlisted_ranges_have_no_labels(min in 2u32..100, max in "[0-9]{1,3}|unbounded") {
            let occurs = Occurs::from_attributes(Some(&min.to_string()), Some(&max));
            let c = Cardinality::of(&occurs);
            prop_assert_eq!(c.mandatory, "");
            prop_assert_eq!(c.multiplicity, "");
        }

        #[test]
        fn test_labels_set_together(min in "0|1|2", max in "1|2|unbounded") {
            let c = Cardinality::of(&Occurs::from_attributes(Some(&min), Some(&max)));
            prop_assert_eq!(c.mandatory.is_empty(), c.multiplicity.is_empty());
        }
    }
}
