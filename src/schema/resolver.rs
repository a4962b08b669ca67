//! Type resolution
//!
//! Decides what a schema node refers to by interrogating the document that
//! owns it, and locates the definitions the walker descends into: member
//! particles, extension bases, group bodies and enumeration facets.

use crate::annotations::documentation;
use crate::documents::Element;
use crate::names::{is_valid_qname, split_qname};
use crate::namespaces::QName;
use crate::XSD_NAMESPACE;

use super::registry::{SchemaDocument, SchemaRegistry};

/// What a schema node turned out to be
#[derive(Debug, Clone)]
pub enum NodeKind<'a> {
    /// Element of a named or inline complex type
    Complex {
        /// The `complexType` definition
        definition: &'a Element,
        /// Qualified name of a named type, `None` for an inline type
        key: Option<QName>,
    },
    /// Element of a named or inline simple type
    Simple {
        /// The `simpleType` definition
        definition: &'a Element,
        /// Declared type name, or the element name for an inline type
        type_name: String,
        /// Qualified name of a named type, `None` for an inline type
        key: Option<QName>,
    },
    /// `xs:group ref="..."`
    GroupRef {
        /// The referenced group definition, when it exists
        group: Option<&'a Element>,
        /// Qualified name of the referenced group
        key: QName,
    },
    /// Built-in typed element, untyped element or element reference
    Primitive,
}

/// A QName-valued attribute resolved against a document's prefix table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Component of the XSD namespace itself
    Builtin(String),
    /// Top-level component of the document (unprefixed or its own namespace)
    Local(String),
    /// Component of another namespace
    Foreign(QName),
    /// Unbound prefix or malformed name
    Unresolved(String),
}

impl TypeRef {
    /// Resolve a lexical QName in the context of `doc`
    pub fn parse(doc: &SchemaDocument, raw: &str) -> Self {
        if !is_valid_qname(raw) {
            return TypeRef::Unresolved(raw.to_string());
        }

        match split_qname(raw) {
            (None, local) => TypeRef::Local(local.to_string()),
            (Some(prefix), local) => match doc.namespace_for(prefix) {
                None => TypeRef::Unresolved(raw.to_string()),
                Some(XSD_NAMESPACE) => TypeRef::Builtin(local.to_string()),
                Some(ns) if Some(ns) == doc.target_namespace() => TypeRef::Local(local.to_string()),
                Some(ns) => TypeRef::Foreign(QName::namespaced(ns, local)),
            },
        }
    }
}

/// Classify a node of `doc`
pub fn classify<'a>(doc: &'a SchemaDocument, node: &'a Element) -> NodeKind<'a> {
    if node.is_xsd("group") {
        if let Some(reference) = node.get_attribute("ref") {
            return match TypeRef::parse(doc, reference) {
                TypeRef::Local(local) => NodeKind::GroupRef {
                    group: doc.group(&local),
                    key: doc.qualify(&local),
                },
                TypeRef::Foreign(key) => NodeKind::GroupRef { group: None, key },
                TypeRef::Builtin(local) | TypeRef::Unresolved(local) => NodeKind::GroupRef {
                    group: None,
                    key: QName::local(local),
                },
            };
        }
    }

    if let Some(type_name) = node.get_attribute("type") {
        if let TypeRef::Local(local) = TypeRef::parse(doc, type_name) {
            if let Some(definition) = doc.complex_type(&local) {
                return NodeKind::Complex {
                    definition,
                    key: Some(doc.qualify(&local)),
                };
            }
            if let Some(definition) = doc.simple_type(&local) {
                return NodeKind::Simple {
                    definition,
                    type_name: type_name.to_string(),
                    key: Some(doc.qualify(&local)),
                };
            }
        }
        return NodeKind::Primitive;
    }

    if let Some(definition) = node.xsd_child("complexType") {
        return NodeKind::Complex { definition, key: None };
    }
    if let Some(definition) = node.xsd_child("simpleType") {
        return NodeKind::Simple {
            definition,
            type_name: node.get_attribute("name").unwrap_or_default().to_string(),
            key: None,
        };
    }

    NodeKind::Primitive
}

/// Whether the node is an element of a complex type
pub fn is_complex_type(doc: &SchemaDocument, node: &Element) -> bool {
    matches!(classify(doc, node), NodeKind::Complex { .. })
}

/// Whether the node is an element of a simple (enumeration) type
pub fn is_simple_type(doc: &SchemaDocument, node: &Element) -> bool {
    matches!(classify(doc, node), NodeKind::Simple { .. })
}

/// Element and group particles declared by a type or group definition
///
/// Collection stops at each particle: nested content belongs to the
/// particle's own type. Annotations are skipped.
pub fn members(definition: &Element) -> Vec<&Element> {
    let mut found = Vec::new();
    collect_members(definition, &mut found);
    found
}

fn collect_members<'a>(node: &'a Element, found: &mut Vec<&'a Element>) {
    for child in &node.children {
        if child.is_xsd("element") || child.is_xsd("group") {
            found.push(child);
        } else if child.namespace() == Some(XSD_NAMESPACE) && !child.is_xsd("annotation") {
            collect_members(child, found);
        }
    }
}

/// `base` of the `complexContent` or `simpleContent` extension of a type
pub fn extension_base(definition: &Element) -> Option<&str> {
    ["complexContent", "simpleContent"]
        .iter()
        .filter_map(|content| definition.xsd_child(content))
        .filter_map(|content| content.xsd_child("extension"))
        .find_map(|extension| extension.get_attribute("base"))
}

/// Which document a resolved base type lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin<'a> {
    /// The document that declared the extension
    Current,
    /// The root document of the registry
    Primary,
    /// An imported document, with the prefix it is registered under
    Import(&'a str),
}

/// Outcome of resolving an extension base
#[derive(Debug, Clone)]
pub enum BaseType<'a> {
    /// A complex type definition whose members are inherited
    Found {
        /// Document that owns the definition
        document: &'a SchemaDocument,
        /// The base `complexType`
        definition: &'a Element,
        /// Qualified name of the base type
        key: QName,
        /// Where the document sits in the registry
        origin: Origin<'a>,
    },
    /// A built-in XSD type, which has no members
    Builtin,
    /// A foreign base while imports are disabled
    ImportsDisabled,
    /// Unbound prefix, unknown namespace or missing definition
    Unresolved,
}

/// Resolve the `base` of an extension declared in `doc`
pub fn resolve_base<'a>(
    registry: &'a SchemaRegistry,
    doc: &'a SchemaDocument,
    base: &str,
    imports_enabled: bool,
) -> BaseType<'a> {
    match TypeRef::parse(doc, base) {
        TypeRef::Builtin(_) => BaseType::Builtin,
        TypeRef::Unresolved(_) => BaseType::Unresolved,
        TypeRef::Local(local) => match doc.complex_type(&local) {
            Some(definition) => BaseType::Found {
                document: doc,
                definition,
                key: doc.qualify(&local),
                origin: Origin::Current,
            },
            None => BaseType::Unresolved,
        },
        TypeRef::Foreign(key) => {
            let root = registry.root();
            if key.namespace.as_deref() == root.target_namespace() {
                return match root.complex_type(&key.local_name) {
                    Some(definition) => BaseType::Found {
                        document: root,
                        definition,
                        key,
                        origin: Origin::Primary,
                    },
                    None => BaseType::Unresolved,
                };
            }

            if !imports_enabled {
                return BaseType::ImportsDisabled;
            }

            let Some(import) = key
                .namespace
                .as_deref()
                .and_then(|ns| registry.import_for_namespace(ns))
            else {
                return BaseType::Unresolved;
            };

            match import.document.complex_type(&key.local_name) {
                Some(definition) => BaseType::Found {
                    document: &import.document,
                    definition,
                    key,
                    origin: Origin::Import(&import.prefix),
                },
                None => BaseType::Unresolved,
            }
        }
    }
}

/// Enumeration facets of a simple type: each value with its own documentation
pub fn enumerations(definition: &Element) -> Vec<(String, String)> {
    definition
        .xsd_descendants("enumeration")
        .into_iter()
        .map(|facet| {
            (
                facet.get_attribute("value").unwrap_or_default().to_string(),
                documentation(facet),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:tns="urn:orders" xmlns:ext="urn:common"
           targetNamespace="urn:orders">
    <xs:element name="order" type="tns:OrderType"/>
    <xs:element name="status" type="Status"/>
    <xs:element name="note" type="xs:string"/>
    <xs:element name="party" type="ext:PartyType"/>
    <xs:element name="inline">
        <xs:complexType>
            <xs:sequence>
                <xs:element name="a" type="xs:int"/>
            </xs:sequence>
        </xs:complexType>
    </xs:element>
    <xs:element name="flag">
        <xs:simpleType>
            <xs:restriction base="xs:string">
                <xs:enumeration value="Y"/>
            </xs:restriction>
        </xs:simpleType>
    </xs:element>
    <xs:complexType name="OrderType">
        <xs:complexContent>
            <xs:extension base="ext:BaseType">
                <xs:sequence>
                    <xs:annotation><xs:documentation>members</xs:documentation></xs:annotation>
                    <xs:element name="id" type="xs:string"/>
                    <xs:element name="line">
                        <xs:complexType>
                            <xs:sequence><xs:element name="nested"/></xs:sequence>
                        </xs:complexType>
                    </xs:element>
                    <xs:choice>
                        <xs:element name="email"/>
                        <xs:group ref="tns:Contact"/>
                    </xs:choice>
                </xs:sequence>
            </xs:extension>
        </xs:complexContent>
    </xs:complexType>
    <xs:simpleType name="Status">
        <xs:restriction base="xs:string">
            <xs:enumeration value="A">
                <xs:annotation><xs:documentation>Active</xs:documentation></xs:annotation>
            </xs:enumeration>
            <xs:enumeration value="B"/>
        </xs:restriction>
    </xs:simpleType>
    <xs:group name="Contact">
        <xs:sequence><xs:element name="phone"/></xs:sequence>
    </xs:group>
</xs:schema>"#;

    fn element<'a>(doc: &'a SchemaDocument, name: &str) -> &'a Element {
        doc.top_level_elements()
            .into_iter()
            .find(|e| e.get_attribute("name") == Some(name))
            .unwrap()
    }

    #[test]
    fn test_type_ref_parse() {
        let doc = SchemaDocument::from_string(SCHEMA).unwrap();

        assert_eq!(TypeRef::parse(&doc, "xs:string"), TypeRef::Builtin("string".into()));
        assert_eq!(TypeRef::parse(&doc, "tns:OrderType"), TypeRef::Local("OrderType".into()));
        assert_eq!(TypeRef::parse(&doc, "Status"), TypeRef::Local("Status".into()));
        assert_eq!(
            TypeRef::parse(&doc, "ext:BaseType"),
            TypeRef::Foreign(QName::namespaced("urn:common", "BaseType"))
        );
        assert_eq!(TypeRef::parse(&doc, "zz:Thing"), TypeRef::Unresolved("zz:Thing".into()));
        assert_eq!(TypeRef::parse(&doc, ":bad"), TypeRef::Unresolved(":bad".into()));
    }

    #[test]
    fn test_classify_named_types() {
        let doc = SchemaDocument::from_string(SCHEMA).unwrap();

        assert!(is_complex_type(&doc, element(&doc, "order")));
        assert!(!is_simple_type(&doc, element(&doc, "order")));
        assert!(is_simple_type(&doc, element(&doc, "status")));
        assert!(matches!(classify(&doc, element(&doc, "note")), NodeKind::Primitive));
        assert!(matches!(classify(&doc, element(&doc, "party")), NodeKind::Primitive));

        match classify(&doc, element(&doc, "order")) {
            NodeKind::Complex { key, .. } => {
                assert_eq!(key, Some(QName::namespaced("urn:orders", "OrderType")))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_classify_inline_types() {
        let doc = SchemaDocument::from_string(SCHEMA).unwrap();

        assert!(matches!(
            classify(&doc, element(&doc, "inline")),
            NodeKind::Complex { key: None, .. }
        ));
        match classify(&doc, element(&doc, "flag")) {
            NodeKind::Simple { type_name, key, .. } => {
                assert_eq!(type_name, "flag");
                assert_eq!(key, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_members_stop_at_particles() {
        let doc = SchemaDocument::from_string(SCHEMA).unwrap();
        let order = doc.complex_type("OrderType").unwrap();

        let names: Vec<_> = members(order)
            .iter()
            .map(|m| m.get_attribute("name").or(m.get_attribute("ref")).unwrap())
            .collect();
        assert_eq!(names, vec!["id", "line", "email", "tns:Contact"]);
    }

    #[test]
    fn test_group_ref_resolution() {
        let doc = SchemaDocument::from_string(SCHEMA).unwrap();
        let order = doc.complex_type("OrderType").unwrap();
        let group_ref = members(order)[3];

        match classify(&doc, group_ref) {
            NodeKind::GroupRef { group, key } => {
                assert!(group.is_some());
                assert_eq!(key, QName::namespaced("urn:orders", "Contact"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_extension_base() {
        let doc = SchemaDocument::from_string(SCHEMA).unwrap();
        assert_eq!(extension_base(doc.complex_type("OrderType").unwrap()), Some("ext:BaseType"));
        assert_eq!(extension_base(doc.group("Contact").unwrap()), None);
    }

    #[test]
    fn test_resolve_base_without_import() {
        let registry = SchemaRegistry::from_string(SCHEMA).unwrap();
        let doc = registry.root();

        assert!(matches!(resolve_base(&registry, doc, "ext:BaseType", false), BaseType::ImportsDisabled));
        assert!(matches!(resolve_base(&registry, doc, "ext:BaseType", true), BaseType::Unresolved));
        assert!(matches!(resolve_base(&registry, doc, "xs:string", true), BaseType::Builtin));
        assert!(matches!(
            resolve_base(&registry, doc, "OrderType", false),
            BaseType::Found { origin: Origin::Current, .. }
        ));
        assert!(matches!(resolve_base(&registry, doc, "Missing", false), BaseType::Unresolved));
    }

    #[test]
    fn test_root_namespace_reference_from_imported_document() {
        let registry = SchemaRegistry::from_string(SCHEMA).unwrap();
        let imported = SchemaDocument::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                       xmlns:o="urn:orders" targetNamespace="urn:ext">
                <xs:element name="back" type="o:OrderType"/>
            </xs:schema>"#,
        )
        .unwrap();

        // Element types stay within their own document, extension bases may reach the root
        assert!(matches!(classify(&imported, element(&imported, "back")), NodeKind::Primitive));
        assert!(matches!(
            resolve_base(&registry, &imported, "o:OrderType", false),
            BaseType::Found { origin: Origin::Primary, .. }
        ));
    }

    #[test]
    fn test_enumerations_carry_own_documentation() {
        let doc = SchemaDocument::from_string(SCHEMA).unwrap();
        let values = enumerations(doc.simple_type("Status").unwrap());

        assert_eq!(
            values,
            vec![("A".to_string(), "Active".to_string()), ("B".to_string(), String::new())]
        );
    }
}
