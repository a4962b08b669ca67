//! Report rows
//!
//! Converts a [`FlattenOutput`] into the rows a tabular renderer writes:
//! one header row, one row per element record, and the optional section
//! breaks in front of request and response elements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::annotations::Description;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::flatten::{ElementRecord, EnumRecord, FlattenOutput};
use crate::namespaces::NamespaceContext;
use crate::schema::SchemaRegistry;

use super::classify::{Cardinality, TypeCategory};

/// A report column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    /// Element name, indented and prefixed
    #[serde(rename = "name")]
    Name,
    /// Schema construct the element uses
    #[serde(rename = "schematype")]
    SchemaType,
    /// Semantic type category
    #[serde(rename = "type")]
    Type,
    /// `$length` / `$format` directive value
    #[serde(rename = "length")]
    Length,
    /// Multiplicity label
    #[serde(rename = "multi")]
    Multiplicity,
    /// Enumeration values of a simple type
    #[serde(rename = "enum")]
    Enumeration,
    /// `in` or `out`
    #[serde(rename = "kind")]
    Kind,
    /// Documentation without directives
    #[serde(rename = "desc")]
    Description,
    /// Mandatory label
    #[serde(rename = "mandatory")]
    Mandatory,
    /// `Y` for complex types
    #[serde(rename = "complex")]
    Complex,
    /// `Y` for simple types
    #[serde(rename = "simple")]
    Simple,
    /// Raw `minOccurs`
    #[serde(rename = "minoccurs")]
    MinOccurs,
    /// Raw `maxOccurs`
    #[serde(rename = "maxoccurs")]
    MaxOccurs,
    /// `nillable`
    #[serde(rename = "nill")]
    Nillable,
}

impl Column {
    /// Every column in canonical order
    pub const ALL: [Column; 14] = [
        Column::Name,
        Column::SchemaType,
        Column::Type,
        Column::Length,
        Column::Multiplicity,
        Column::Enumeration,
        Column::Kind,
        Column::Description,
        Column::Mandatory,
        Column::Complex,
        Column::Simple,
        Column::MinOccurs,
        Column::MaxOccurs,
        Column::Nillable,
    ];

    /// Key used on the command line and in configuration files
    pub fn key(&self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::SchemaType => "schematype",
            Column::Type => "type",
            Column::Length => "length",
            Column::Multiplicity => "multi",
            Column::Enumeration => "enum",
            Column::Kind => "kind",
            Column::Description => "desc",
            Column::Mandatory => "mandatory",
            Column::Complex => "complex",
            Column::Simple => "simple",
            Column::MinOccurs => "minoccurs",
            Column::MaxOccurs => "maxoccurs",
            Column::Nillable => "nill",
        }
    }

    /// Label shown in the header row
    pub fn header(&self) -> &'static str {
        match self {
            Column::Name => "NAME",
            Column::SchemaType => "XMLSCHEMA\nTYPE",
            Column::Type => "TYPE",
            Column::Length => "LENGTH/\nPRECISION",
            Column::Multiplicity => "MULTIPL.",
            Column::Enumeration => "ENUM.\nVALUES",
            Column::Kind => "KIND",
            Column::Description => "DESCRIPTION",
            Column::Mandatory => "MANDATORY",
            Column::Complex => "COMPLEX\nTYPE",
            Column::Simple => "SIMPLE\nTYPE",
            Column::MinOccurs => "MIN\nOCCURS",
            Column::MaxOccurs => "MAX\nOCCURS",
            Column::Nillable => "NILLABLE",
        }
    }

    /// Parse a comma-separated column list such as `name,type,desc`
    pub fn parse_list(list: &str) -> Result<Vec<Column>> {
        let columns = list
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(Column::from_str)
            .collect::<Result<Vec<_>>>()?;

        if columns.is_empty() {
            return Err(Error::Config("no report columns selected".to_string()));
        }
        Ok(columns)
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Column::ALL
            .iter()
            .find(|c| c.key() == s)
            .copied()
            .ok_or_else(|| Error::Config(format!("unknown column '{}'", s)))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Presentation hint for the renderer
///
/// Variants are listed by precedence, later ones win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStyle {
    /// Plain element
    Normal,
    /// Group or element reference
    Reference,
    /// Complex type element
    Complex,
    /// Enumeration element
    Enumeration,
    /// Recursion cut point
    Recursion,
    /// Request or response element
    Marked,
    /// Column headers
    Header,
    /// Empty separator
    Blank,
}

/// What a row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    /// Column headers
    Header,
    /// Empty separator before a repeated header
    Blank,
    /// An element record
    Element,
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// What the row represents
    pub kind: RowKind,
    /// Presentation hint
    pub style: RowStyle,
    /// Cell values, one per selected column
    pub cells: Vec<String>,
}

impl ReportRow {
    fn header(columns: &[Column]) -> Self {
        Self {
            kind: RowKind::Header,
            style: RowStyle::Header,
            cells: columns.iter().map(|c| c.header().to_string()).collect(),
        }
    }

    fn blank(columns: &[Column]) -> Self {
        Self {
            kind: RowKind::Blank,
            style: RowStyle::Blank,
            cells: vec![String::new(); columns.len()],
        }
    }
}

/// The tabular form of a flattening run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Selected columns in canonical order
    pub columns: Vec<Column>,
    /// Rows, starting with the header row
    pub rows: Vec<ReportRow>,
    /// Enumeration values with their own documentation
    pub enums: Vec<EnumRecord>,
    /// Prefix table of the root schema
    pub namespaces: NamespaceContext,
    /// Prefix of the XSD namespace in the root schema
    pub xsd_prefix: Option<String>,
}

impl Report {
    /// Build the report of a flattening run
    pub fn build(output: &FlattenOutput, registry: &SchemaRegistry, config: &Config) -> Self {
        let columns: Vec<Column> = Column::ALL
            .iter()
            .filter(|c| config.columns.contains(c))
            .copied()
            .collect();
        let xsd_prefix = registry.xsd_prefix();

        let mut rows = vec![ReportRow::header(&columns)];
        for (i, record) in output.elements().iter().enumerate() {
            let name = base_name(record);
            let section_break = (config.header_request && config.is_request(name))
                || (config.header_response && config.is_response(name));
            if i != 0 && section_break {
                rows.push(ReportRow::blank(&columns));
                rows.push(ReportRow::header(&columns));
            }

            rows.push(ReportRow {
                kind: RowKind::Element,
                style: row_style(record, config),
                cells: columns
                    .iter()
                    .map(|c| cell(*c, record, output, config, xsd_prefix))
                    .collect(),
            });
        }

        Self {
            columns,
            rows,
            enums: output.enums().to_vec(),
            namespaces: registry.namespaces().clone(),
            xsd_prefix: xsd_prefix.map(str::to_string),
        }
    }

    /// Element rows only
    pub fn element_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|r| r.kind == RowKind::Element)
    }

    /// Render as tab-separated values
    ///
    /// Cells holding tabs, quotes or line breaks are quoted.
    pub fn to_tsv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(vec![]);

        for row in &self.rows {
            writer.write_record(&row.cells)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn base_name(record: &ElementRecord) -> &str {
    match (&record.name, &record.reference) {
        (Some(name), _) if !name.is_empty() => name,
        (_, Some(reference)) => reference,
        _ => "",
    }
}

fn display_name(record: &ElementRecord, config: &Config) -> String {
    let name = base_name(record);
    let name = match &record.foreign_prefix {
        Some(prefix) if !name.is_empty() => format!("{}:{}", prefix, name),
        _ => name.to_string(),
    };
    if config.indent_output {
        format!("{}{}", "  ".repeat(record.depth), name)
    } else {
        name
    }
}

fn schema_type(record: &ElementRecord) -> String {
    let declared = record.type_name.as_deref().unwrap_or_default();
    if record.is_complex() {
        format!("ComplexType\n({})", declared)
    } else if record.is_simple() {
        format!("SimpleType\n({})", declared)
    } else if let Some(reference) = record.reference.as_deref().filter(|r| !r.is_empty()) {
        format!("Reference\n({})", reference)
    } else {
        declared.to_string()
    }
}

fn flag(set: bool) -> String {
    let label = if set { "Y" } else { "" };
    label.to_string()
}

fn cell(
    column: Column,
    record: &ElementRecord,
    output: &FlattenOutput,
    config: &Config,
    xsd_prefix: Option<&str>,
) -> String {
    match column {
        Column::Name => display_name(record, config),
        Column::SchemaType => schema_type(record),
        Column::Type => TypeCategory::for_record(record, xsd_prefix).to_string(),
        Column::Length => Description::parse(&record.description).length,
        Column::Multiplicity => Cardinality::of(&record.occurs).multiplicity.to_string(),
        Column::Enumeration => record
            .enumeration_key()
            .map(|key| output.enumeration_text(key))
            .unwrap_or_default(),
        Column::Kind => record.direction.to_string(),
        Column::Description => Description::parse(&record.description).text,
        Column::Mandatory => Cardinality::of(&record.occurs).mandatory.to_string(),
        Column::Complex => flag(record.is_complex()),
        Column::Simple => flag(record.is_simple()),
        Column::MinOccurs => record.occurs.min.clone(),
        Column::MaxOccurs => record.occurs.max.clone(),
        Column::Nillable => record.nillable.as_str().to_string(),
    }
}

fn row_style(record: &ElementRecord, config: &Config) -> RowStyle {
    let name = base_name(record);
    if config.is_request(name) || config.is_response(name) {
        RowStyle::Marked
    } else if record.recursive {
        RowStyle::Recursion
    } else if record.is_simple() {
        RowStyle::Enumeration
    } else if record.is_complex() {
        RowStyle::Complex
    } else if record.reference.is_some() {
        RowStyle::Reference
    } else {
        RowStyle::Normal
    }
}
