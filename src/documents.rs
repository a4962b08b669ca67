//! XML document tree
//!
//! A small owned tree built with quick-xml. Element names are resolved
//! against the namespace declarations in scope while parsing, so schema
//! components can be matched by namespace and local name regardless of
//! the prefix a particular file happens to use.

use crate::error::{Error, Result};
use crate::namespaces::{NamespaceContext, QName};
use crate::names::split_qname;
use crate::{XML_NAMESPACE, XSD_NAMESPACE};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name with its namespace resolved
    pub qname: QName,
    /// Prefix the element was written with
    pub prefix: Option<String>,
    /// Element attributes by lexical name, in document order
    pub attributes: IndexMap<String, String>,
    /// Direct text content (if any)
    pub text: Option<String>,
    /// Text between the end tag and the next sibling
    pub tail: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            prefix: None,
            attributes: IndexMap::new(),
            text: None,
            tail: None,
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Whether this is the XSD component with the given local name
    pub fn is_xsd(&self, local_name: &str) -> bool {
        self.local_name() == local_name && self.qname.is_in(XSD_NAMESPACE)
    }

    /// Get an attribute value by its name as written
    ///
    /// Schema attributes such as `name` or `type` are unprefixed, so a
    /// prefixed attribute like `foo:type` only matches `"foo:type"`.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append a run of character data at the current end of the content
    ///
    /// Text after a child element belongs to that child's tail.
    pub fn push_text(&mut self, text: &str) {
        let slot = match self.children.last_mut() {
            Some(child) => &mut child.tail,
            None => &mut self.text,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }

    /// Text of this element and all of its descendants, in document order
    pub fn text_content(&self) -> String {
        let mut content = self.text.clone().unwrap_or_default();
        for child in &self.children {
            content.push_str(&child.text_content());
            if let Some(tail) = &child.tail {
                content.push_str(tail);
            }
        }
        content
    }

    /// Find child elements by local name
    pub fn find_children(&self, local_name: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|e| e.local_name() == local_name)
            .collect()
    }

    /// Iterate over XSD child components with the given local name
    pub fn xsd_children<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |e| e.is_xsd(local_name))
    }

    /// First XSD child component with the given local name
    pub fn xsd_child(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.is_xsd(local_name))
    }

    /// All XSD descendants with the given local name, in document order
    pub fn xsd_descendants<'a>(&'a self, local_name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        for child in &self.children {
            if child.is_xsd(local_name) {
                found.push(child);
            }
            found.extend(child.xsd_descendants(local_name));
        }
        found
    }
}

/// XML Document representation
#[derive(Debug, Default)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
    /// Every prefix declared anywhere in the document, first declaration wins
    pub namespaces: NamespaceContext,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);

        let mut doc = Document::new();
        let mut element_stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let element = Self::parse_element(&e, &element_stack)?;
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = element_stack.pop() {
                        if let Some(parent) = element_stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            doc.root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::parse_element(&e, &element_stack)?;
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        doc.root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?;
                        if !text.trim().is_empty() {
                            current.push_text(&text);
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let bytes = e.into_inner();
                        let text = std::str::from_utf8(&bytes)
                            .map_err(|e| Error::Xml(format!("Invalid CDATA section: {}", e)))?;
                        current.push_text(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Comments, processing instructions, doctype
            }
            buf.clear();
        }

        if !element_stack.is_empty() {
            return Err(Error::Xml("Unexpected end of document".to_string()));
        }

        if let Some(root) = &doc.root {
            collect_namespaces(root, &mut doc.namespaces);
        }

        Ok(doc)
    }

    /// Parse element from BytesStart event
    fn parse_element(start: &BytesStart, ancestors: &[Element]) -> Result<Element> {
        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?;
        let (prefix, local) = split_qname(name);

        let mut element = Element::new(QName::local(local));
        element.prefix = prefix.map(str::to_string);

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?;

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            if attr_name == "xmlns" {
                element.namespaces.set_default_namespace(attr_value);
            } else if let Some(ns_prefix) = attr_name.strip_prefix("xmlns:") {
                element.namespaces.add_prefix(ns_prefix, attr_value);
            } else {
                element.attributes.insert(attr_name.to_string(), attr_value);
            }
        }

        element.qname.namespace = lookup_namespace(prefix, &element.namespaces, ancestors);
        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }
}

/// Find the namespace bound to `prefix` in the innermost enclosing scope
fn lookup_namespace(
    prefix: Option<&str>,
    own: &NamespaceContext,
    ancestors: &[Element],
) -> Option<String> {
    if prefix == Some("xml") {
        return Some(XML_NAMESPACE.to_string());
    }

    let scopes = std::iter::once(own).chain(ancestors.iter().rev().map(|e| &e.namespaces));
    for scope in scopes {
        let found = match prefix {
            Some(p) => scope.get_namespace(p),
            None => scope.get_default_namespace(),
        };
        if let Some(uri) = found {
            return Some(uri.to_string());
        }
    }
    None
}

fn collect_namespaces(element: &Element, into: &mut NamespaceContext) {
    into.merge_missing(&element.namespaces);
    for child in &element.children {
        collect_namespaces(child, into);
    }
}
