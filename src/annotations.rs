//! Schema annotations
//!
//! Documentation text attached to schema components, and the `$length(N)`
//! and `$format(S)` directives authors embed in it to feed the
//! length/precision column of the report.

use crate::documents::Element;
use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$length\((\d+)\)|\$format\((\S+)\)").unwrap());

/// Text of the first `annotation/documentation` of a component, or `""`
pub fn documentation(node: &Element) -> String {
    node.xsd_children("annotation")
        .flat_map(|annotation| annotation.xsd_children("documentation"))
        .next()
        .map(|entry| entry.text_content().trim().to_string())
        .unwrap_or_default()
}

/// A description split into display text and its length/precision directive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Description {
    /// Description with every directive removed
    pub text: String,
    /// Argument of the first directive, or `""`
    pub length: String,
}

impl Description {
    /// Split directives out of raw documentation text
    pub fn parse(raw: &str) -> Self {
        let length = DIRECTIVE
            .captures(raw)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let text = DIRECTIVE.replace_all(raw, "").trim().to_string();

        Self { text, length }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use proptest::prelude::*;

    fn element(xml: &str) -> Element {
        let wrapped = format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">{}</xs:schema>"#,
            xml
        );
        let doc = Document::from_string(&wrapped).unwrap();
        doc.root.unwrap().children.remove(0)
    }

    #[test]
    fn test_documentation_first_only() {
        let node = element(
            r#"<xs:element name="id">
                <xs:annotation>
                    <xs:documentation>Customer id</xs:documentation>
                    <xs:documentation>second</xs:documentation>
                </xs:annotation>
            </xs:element>"#,
        );
        assert_eq!(documentation(&node), "Customer id");
    }

    #[test]
    fn test_documentation_keeps_spaces_around_markup() {
        let node = element(
            r#"<xs:element name="id">
                <xs:annotation>
                    <xs:documentation>
                        Order <b>id</b> of the customer
                    </xs:documentation>
                </xs:annotation>
            </xs:element>"#,
        );
        assert_eq!(documentation(&node), "Order id of the customer");
    }

    #[test]
    fn test_documentation_absent() {
        let node = element(r#"<xs:element name="id"/>"#);
        assert_eq!(documentation(&node), "");
    }

    #[test]
    fn test_length_directive() {
        let desc = Description::parse("Customer id $length(10) more text");
        assert_eq!(desc.text, "Customer id  more text");
        assert_eq!(desc.length, "10");
    }

    #[test]
    fn test_format_directive() {
        let desc = Description::parse("Issued on $format(dd.mm.yyyy)");
        assert_eq!(desc.text, "Issued on");
        assert_eq!(desc.length, "dd.mm.yyyy");
    }

    #[test]
    fn test_first_directive_wins() {
        let desc = Description::parse("$format(9.2) amount $length(12)");
        assert_eq!(desc.length, "9.2");
        assert_eq!(desc.text, "amount");
    }

    #[test]
    fn test_no_directive() {
        let desc = Description::parse("  plain text ");
        assert_eq!(desc, Description { text: "plain text".to_string(), length: String::new() });
    }

    proptest! {
        #[test]
        fn prop_length_directive_removed(prefix in "[a-zA-Z ]{0,20}", n in 0u32..100000, suffix in "[a-zA-Z ]{0,20}") {
            let raw = format!("{}$length({}){}", prefix, n, suffix);
            let desc = Description::parse(&raw);
            prop_assert_eq!(desc.length, n.to_string());
            prop_assert!(!desc.text.contains("$length"));
            prop_assert_eq!(desc.text, format!("{}{}", prefix, suffix).trim().to_string());
        }
    }
}
