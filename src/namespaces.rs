//! XML namespace handling
//!
//! Qualified names and the prefix <-> URI tables that schema documents
//! declare. Tables keep declaration order, which is also the order the
//! namespace listing is reported in.

use crate::error::{Error, Result};
use crate::names::split_qname;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Check whether this name lives in the given namespace
    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace context for resolving prefixes
#[derive(Debug, Clone, Default, Serialize)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI, in declaration order
    prefixes: IndexMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Copy declarations of `other` that are not declared here yet
    pub fn merge_missing(&mut self, other: &NamespaceContext) {
        for (prefix, uri) in &other.prefixes {
            if !self.prefixes.contains_key(prefix) {
                self.prefixes.insert(prefix.clone(), uri.clone());
            }
        }
        if self.default_namespace.is_none() {
            self.default_namespace = other.default_namespace.clone();
        }
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Get the first prefix bound to a namespace URI
    pub fn get_prefix(&self, namespace: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, uri)| uri.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Iterate over prefix declarations in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Prefix, &NamespaceUri)> {
        self.prefixes.iter()
    }

    /// Number of prefixed declarations
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether the context declares nothing at all
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }

    /// Resolve a prefixed name to a QName
    pub fn resolve(&self, prefixed_name: &str) -> Result<QName> {
        match split_qname(prefixed_name) {
            (Some(prefix), local) => {
                let namespace = self
                    .get_namespace(prefix)
                    .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
                Ok(QName::namespaced(namespace, local))
            }
            (None, local) => Ok(QName::new(self.default_namespace.clone(), local)),
        }
    }
}
