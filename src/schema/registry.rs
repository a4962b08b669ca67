//! Schema registry
//!
//! Holds the root schema document and every schema reachable through its
//! `import` declarations, keyed by the prefix the root document binds to
//! the imported namespace.

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::Config;
use crate::documents::{Document, Element};
use crate::error::{Error, ParseError, Result};
use crate::loaders::Loader;
use crate::locations::Location;
use crate::namespaces::{NamespaceContext, QName};
use crate::XSD_NAMESPACE;

/// A parsed XSD file
#[derive(Debug)]
pub struct SchemaDocument {
    /// The `xs:schema` element
    root: Element,
    /// Every prefix declared in the file
    namespaces: NamespaceContext,
    /// Value of `targetNamespace`, if any
    target_namespace: Option<String>,
    /// Where the file was loaded from
    location: Option<Location>,
}

impl SchemaDocument {
    /// Load a schema file from disk
    ///
    /// A missing file is reported as [`Error::NotFound`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(&Location::Path(path.as_ref().to_path_buf()), &Loader::new())
    }

    /// Load a schema from a resolved location through a loader
    pub fn load_with(location: &Location, loader: &Loader) -> Result<Self> {
        let content = loader.load(location)?;
        Self::parse(&content, Some(location.clone()))
    }

    /// Parse a schema from an in-memory string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml, None)
    }

    fn parse(xml: &str, location: Option<Location>) -> Result<Self> {
        let describe = || {
            location
                .as_ref()
                .map(Location::as_str)
                .unwrap_or_else(|| "<string>".to_string())
        };

        let doc = Document::from_string(xml)?;
        let Document { root, namespaces } = doc;
        let root = root.ok_or_else(|| {
            Error::Parse(ParseError::new("Empty schema document").with_location(describe()))
        })?;

        if !root.is_xsd("schema") {
            return Err(Error::Parse(
                ParseError::new(format!(
                    "Expected xs:schema root element, got {}",
                    root.qname
                ))
                .with_location(describe()),
            ));
        }

        let target_namespace = root.get_attribute("targetNamespace").map(str::to_string);

        Ok(Self {
            root,
            namespaces,
            target_namespace,
            location,
        })
    }

    /// The `xs:schema` element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Prefix table of the document
    pub fn namespaces(&self) -> &NamespaceContext {
        &self.namespaces
    }

    /// Target namespace of the document
    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// Location the document was loaded from
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Namespace URI bound to a prefix
    pub fn namespace_for(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get_namespace(prefix)
    }

    /// Prefix bound to a namespace URI
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.namespaces.get_prefix(namespace)
    }

    /// Qualify a top-level component name with the target namespace
    pub fn qualify(&self, local_name: &str) -> QName {
        QName::new(self.target_namespace.clone(), local_name)
    }

    /// `schema/element`
    pub fn top_level_elements(&self) -> Vec<&Element> {
        self.root.xsd_children("element").collect()
    }

    /// `schema/complexType[@name]`
    pub fn complex_type(&self, name: &str) -> Option<&Element> {
        self.named_child("complexType", name)
    }

    /// `schema/simpleType[@name]`
    pub fn simple_type(&self, name: &str) -> Option<&Element> {
        self.named_child("simpleType", name)
    }

    /// `schema/group[@name]`
    pub fn group(&self, name: &str) -> Option<&Element> {
        self.named_child("group", name)
    }

    /// `schema/import`
    pub fn imports(&self) -> impl Iterator<Item = &Element> {
        self.root.xsd_children("import")
    }

    fn named_child(&self, component: &str, name: &str) -> Option<&Element> {
        self.root
            .children
            .iter()
            .find(|e| e.is_xsd(component) && e.get_attribute("name") == Some(name))
    }
}

/// A schema brought in by an `import` of the root document
#[derive(Debug)]
pub struct ImportedSchema {
    /// Prefix the root document binds to the namespace
    pub prefix: String,
    /// Imported namespace URI
    pub namespace: String,
    /// `schemaLocation` as written in the import
    pub location: String,
    /// The loaded document
    pub document: SchemaDocument,
}

/// Root schema plus its imports
#[derive(Debug)]
pub struct SchemaRegistry {
    root: SchemaDocument,
    imports: IndexMap<String, ImportedSchema>,
}

impl SchemaRegistry {
    /// Load the root schema, following imports when the configuration enables them
    pub fn load(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        Self::load_with(path, config, &Loader::new())
    }

    /// Load through a specific loader
    pub fn load_with(path: impl AsRef<Path>, config: &Config, loader: &Loader) -> Result<Self> {
        let root = SchemaDocument::load_with(&Location::Path(path.as_ref().to_path_buf()), loader)?;
        let imports = if config.imports_enabled {
            resolve_imports(&root, loader)
        } else {
            IndexMap::new()
        };
        Ok(Self { root, imports })
    }

    /// Registry of a single in-memory schema, without imports
    pub fn from_string(xml: &str) -> Result<Self> {
        Ok(Self::from_document(SchemaDocument::from_string(xml)?))
    }

    /// Registry of a single document, without imports
    pub fn from_document(root: SchemaDocument) -> Self {
        Self {
            root,
            imports: IndexMap::new(),
        }
    }

    /// Register an already loaded schema under a prefix
    pub fn add_import(&mut self, import: ImportedSchema) {
        self.imports.insert(import.prefix.clone(), import);
    }

    /// The root document
    pub fn root(&self) -> &SchemaDocument {
        &self.root
    }

    /// Prefix table of the root document
    pub fn namespaces(&self) -> &NamespaceContext {
        self.root.namespaces()
    }

    /// The prefix the root document uses for the XSD namespace
    ///
    /// `None` when the XSD namespace is the default namespace.
    pub fn xsd_prefix(&self) -> Option<&str> {
        self.root.prefix_for(XSD_NAMESPACE)
    }

    /// Imports by prefix, in declaration order
    pub fn imports(&self) -> &IndexMap<String, ImportedSchema> {
        &self.imports
    }

    /// Import registered under a prefix
    pub fn import(&self, prefix: &str) -> Option<&ImportedSchema> {
        self.imports.get(prefix)
    }

    /// Import of a namespace URI
    pub fn import_for_namespace(&self, namespace: &str) -> Option<&ImportedSchema> {
        self.imports.values().find(|i| i.namespace == namespace)
    }
}

/// Load every schema the root document imports
///
/// Imports that cannot be referenced (no prefix bound in the root document)
/// or cannot be loaded are skipped.
pub fn resolve_imports(root: &SchemaDocument, loader: &Loader) -> IndexMap<String, ImportedSchema> {
    let mut imports = IndexMap::new();
    let base_dir = root.location().and_then(Location::base_dir);

    for import in root.imports() {
        let Some(namespace) = import.get_attribute("namespace") else {
            warn!("skipping xs:import without a namespace");
            continue;
        };
        let Some(prefix) = root.prefix_for(namespace) else {
            warn!(namespace, "skipping xs:import: no prefix is bound to the namespace");
            continue;
        };
        let Some(raw_location) = import.get_attribute("schemaLocation") else {
            warn!(namespace, "skipping xs:import without a schemaLocation");
            continue;
        };
        if imports.contains_key(prefix) {
            debug!(prefix, "namespace already imported");
            continue;
        }
        if let Err(e) = loader.limits().check_imports(imports.len()) {
            warn!("ignoring remaining imports: {}", e);
            break;
        }

        let location = Location::resolve(raw_location, base_dir);
        match SchemaDocument::load_with(&location, loader) {
            Ok(document) => {
                debug!(prefix, location = %location.as_str(), "loaded imported schema");
                imports.insert(
                    prefix.to_string(),
                    ImportedSchema {
                        prefix: prefix.to_string(),
                        namespace: namespace.to_string(),
                        location: raw_location.to_string(),
                        document,
                    },
                );
            }
            Err(e) => {
                warn!(prefix, location = %location.as_str(), "skipping xs:import: {}", e);
            }
        }
    }

    imports
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const ROOT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:tns="urn:orders" xmlns:ext="urn:common"
           targetNamespace="urn:orders">
    <xs:import namespace="urn:common" schemaLocation="common.xsd"/>
    <xs:import namespace="urn:unbound" schemaLocation="unbound.xsd"/>
    <xs:element name="order" type="tns:OrderType"/>
    <xs:complexType name="OrderType"/>
    <xs:simpleType name="Status"/>
    <xs:group name="Audit"/>
</xs:schema>"#;

    const COMMON: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           targetNamespace="urn:common">
    <xs:complexType name="BaseType"/>
</xs:schema>"#;

    #[test]
    fn test_top_level_lookups() {
        let doc = SchemaDocument::from_string(ROOT).unwrap();

        assert_eq!(doc.target_namespace(), Some("urn:orders"));
        assert_eq!(doc.top_level_elements().len(), 1);
        assert!(doc.complex_type("OrderType").is_some());
        assert!(doc.simple_type("Status").is_some());
        assert!(doc.group("Audit").is_some());
        assert!(doc.complex_type("Status").is_none());
        assert_eq!(doc.prefix_for("urn:common"), Some("ext"));
        assert_eq!(doc.namespace_for("tns"), Some("urn:orders"));
        assert_eq!(doc.imports().count(), 2);
    }

    #[test]
    fn test_non_schema_root_rejected() {
        let result = SchemaDocument::from_string("<root/>");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_missing_file_not_found() {
        let result = SchemaDocument::load("/nonexistent/orders.xsd");
        assert!(matches!(result, Err(Error::NotFound(p)) if p == PathBuf::from("/nonexistent/orders.xsd")));
    }

    #[test]
    fn test_xsd_prefix() {
        let registry = SchemaRegistry::from_string(ROOT).unwrap();
        assert_eq!(registry.xsd_prefix(), Some("xs"));

        let default_ns = SchemaRegistry::from_string(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"/>"#,
        )
        .unwrap();
        assert_eq!(default_ns.xsd_prefix(), None);
    }

    #[test]
    fn test_resolve_imports_skips_unbound_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("orders.xsd"), ROOT).unwrap();
        std::fs::write(dir.path().join("common.xsd"), COMMON).unwrap();

        let root = SchemaDocument::load(dir.path().join("orders.xsd")).unwrap();
        let imports = resolve_imports(&root, &Loader::new());

        assert_eq!(imports.len(), 1);
        let ext = &imports["ext"];
        assert_eq!(ext.namespace, "urn:common");
        assert_eq!(ext.location, "common.xsd");
        assert!(ext.document.complex_type("BaseType").is_some());
    }

    #[test]
    fn test_failed_import_load_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("orders.xsd"), ROOT).unwrap();

        let config = Config::new().with_imports_enabled(true);
        let registry = SchemaRegistry::load(dir.path().join("orders.xsd"), &config).unwrap();
        assert!(registry.imports().is_empty());
    }

    #[test]
    fn test_imports_disabled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("orders.xsd"), ROOT).unwrap();
        std::fs::write(dir.path().join("common.xsd"), COMMON).unwrap();

        let registry = SchemaRegistry::load(dir.path().join("orders.xsd"), &Config::new()).unwrap();
        assert!(registry.imports().is_empty());

        let config = Config::new().with_imports_enabled(true);
        let registry = SchemaRegistry::load(dir.path().join("orders.xsd"), &config).unwrap();
        assert!(registry.import("ext").is_some());
        assert!(registry.import_for_namespace("urn:common").is_some());
    }
}
