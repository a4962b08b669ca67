//! Flattened records
//!
//! The walker produces one [`ElementRecord`] per visited particle and one
//! [`EnumRecord`] per enumeration value it meets, collected in a
//! [`FlattenOutput`] whose iteration order is the creation order.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Whether an element belongs to a request (`in`) or a response (`out`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Request side, the default
    #[default]
    In,
    /// Response side
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// Shape of a flattened record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Element of a complex type
    Complex,
    /// Element of a simple (enumeration) type
    Simple,
    /// Primitive element or element reference
    Primitive,
    /// Reference to a named group
    GroupRef,
}

/// Tri-state `nillable` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Nillable {
    /// Attribute absent
    #[default]
    Unset,
    /// `nillable="true"`
    True,
    /// `nillable="false"`
    False,
}

impl Nillable {
    /// Read the attribute value
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("true") | Some("1") => Nillable::True,
            Some("false") | Some("0") => Nillable::False,
            _ => Nillable::Unset,
        }
    }

    /// Report form: `"true"`, `"false"` or `""`
    pub fn as_str(&self) -> &'static str {
        match self {
            Nillable::Unset => "",
            Nillable::True => "true",
            Nillable::False => "false",
        }
    }
}

/// Raw `minOccurs` / `maxOccurs` values, absent attributes defaulted to `"1"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurs {
    /// `minOccurs`
    pub min: String,
    /// `maxOccurs`, `"unbounded"` for no upper bound
    pub max: String,
}

impl Occurs {
    /// Build from the attribute values of a particle
    pub fn from_attributes(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.unwrap_or("1").trim().to_string(),
            max: max.unwrap_or("1").trim().to_string(),
        }
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::from_attributes(None, None)
    }
}

/// Identity of an element record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementKey {
    /// Creation sequence number
    pub sequence: usize,
    /// Element name
    pub name: Option<String>,
    /// Declared type
    pub type_name: Option<String>,
    /// Group or element reference
    pub reference: Option<String>,
}

/// One row-to-be of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRecord {
    /// Creation sequence number, unique within one run
    pub sequence: usize,
    /// `name` attribute
    pub name: Option<String>,
    /// `type` attribute
    pub type_name: Option<String>,
    /// `ref` attribute
    pub reference: Option<String>,
    /// What the node resolved to
    pub kind: ElementKind,
    /// Occurrence bounds
    pub occurs: Occurs,
    /// `nillable` attribute
    pub nillable: Nillable,
    /// Documentation text, or the recursion notice
    pub description: String,
    /// Nesting level, 0 for top-level elements
    pub depth: usize,
    /// Request or response side
    pub direction: Direction,
    /// Set where a type cycle was cut
    pub recursive: bool,
    /// Prefix of the imported schema the record was pulled from
    pub foreign_prefix: Option<String>,
    /// Key of the enumeration values of a simple element
    ///
    /// The type name for a named simple type. An inline type is keyed by
    /// element name and sequence number, so two inline types under the
    /// same element name keep separate value lists.
    pub enum_key: Option<String>,
}

impl ElementRecord {
    /// Whether the element has a complex type
    pub fn is_complex(&self) -> bool {
        self.kind == ElementKind::Complex
    }

    /// Whether the element has a simple (enumeration) type
    pub fn is_simple(&self) -> bool {
        self.kind == ElementKind::Simple
    }

    /// Identity of the record
    pub fn key(&self) -> ElementKey {
        ElementKey {
            sequence: self.sequence,
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            reference: self.reference.clone(),
        }
    }

    /// Name under which the enumeration values of a simple element are stored
    pub fn enumeration_key(&self) -> Option<&str> {
        if !self.is_simple() {
            return None;
        }
        self.enum_key.as_deref()
    }

    /// Mark the record as the point where a cycle was cut
    ///
    /// Only the first call has an effect.
    pub fn mark_recursive(&mut self, notice: String) {
        if !self.recursive {
            self.recursive = true;
            self.description = notice;
        }
    }
}

/// One permitted value of a simple type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumRecord {
    /// Owning element name
    pub name: String,
    /// Owning simple type name
    pub type_name: String,
    /// Literal value
    pub value: String,
    /// Documentation of this value
    pub description: String,
}

type EnumKey = (String, String, String);

/// Everything one flattening run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlattenOutput {
    elements: Vec<ElementRecord>,
    enums: Vec<EnumRecord>,
    enumerations: IndexMap<String, Vec<String>>,
    #[serde(skip)]
    enum_keys: IndexSet<EnumKey>,
}

impl FlattenOutput {
    /// Create an empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Element records in creation order
    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    /// Enumeration records in creation order
    pub fn enums(&self) -> &[EnumRecord] {
        &self.enums
    }

    /// Enumeration key -> ordered values
    pub fn enumerations(&self) -> &IndexMap<String, Vec<String>> {
        &self.enumerations
    }

    /// Values stored under an enumeration key joined by newlines, `""` when unknown
    pub fn enumeration_text(&self, key: &str) -> String {
        self.enumerations
            .get(key)
            .map(|values| values.join("\n"))
            .unwrap_or_default()
    }

    /// Number of element records
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing was emitted
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn push_element(&mut self, record: ElementRecord) -> usize {
        self.elements.push(record);
        self.elements.len() - 1
    }

    pub(crate) fn element_mut(&mut self, index: usize) -> Option<&mut ElementRecord> {
        self.elements.get_mut(index)
    }

    pub(crate) fn add_enumerations(
        &mut self,
        owner: &str,
        type_name: &str,
        key: &str,
        values: Vec<(String, String)>,
    ) {
        self.enumerations.insert(
            key.to_string(),
            values.iter().map(|(value, _)| value.clone()).collect(),
        );

        for (value, description) in values {
            let key = (owner.to_string(), type_name.to_string(), value.clone());
            if self.enum_keys.insert(key) {
                self.enums.push(EnumRecord {
                    name: owner.to_string(),
                    type_name: type_name.to_string(),
                    value,
                    description,
                });
            }
        }
    }
}
