//! Recursion guard
//!
//! A [`RecursionPath`] holds the complex types and named groups entered
//! along one branch, root first. Each child branch gets its own copy, so
//! siblings never see each other's ancestors: a type may appear any number
//! of times across unrelated branches, and only re-entering an ancestor is
//! a cycle.

use std::fmt;

use crate::namespaces::QName;

/// A component the walker has descended into
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ancestor {
    /// A named complex type
    ComplexType(QName),
    /// A named model group
    Group(QName),
}

impl Ancestor {
    /// Local name of the component
    pub fn name(&self) -> &str {
        match self {
            Ancestor::ComplexType(q) | Ancestor::Group(q) => &q.local_name,
        }
    }

    /// Description stored on the record where the cycle was cut
    pub fn recursion_notice(&self) -> String {
        match self {
            Ancestor::ComplexType(q) => format!("Recursion of complex type \"{}\"...", q.local_name),
            Ancestor::Group(q) => format!("Recursion of group \"{}\"...", q.local_name),
        }
    }
}

impl fmt::Display for Ancestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ancestor::ComplexType(q) => write!(f, "{}", q.local_name),
            Ancestor::Group(q) => write!(f, "group:{}", q.local_name),
        }
    }
}

/// Ordered ancestors of one traversal branch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecursionPath {
    ancestors: Vec<Ancestor>,
}

impl RecursionPath {
    /// An empty path, as at the top of the schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether entering `ancestor` would re-enter it along this branch
    pub fn would_cycle(&self, ancestor: &Ancestor) -> bool {
        self.ancestors.contains(ancestor)
    }

    /// Copy of this path extended with `ancestor`
    pub fn with(&self, ancestor: Ancestor) -> Self {
        let mut ancestors = Vec::with_capacity(self.ancestors.len() + 1);
        ancestors.extend_from_slice(&self.ancestors);
        ancestors.push(ancestor);
        Self { ancestors }
    }

    /// Number of ancestors
    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    /// Whether the path is empty
    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// Ancestors, root first
    pub fn iter(&self) -> impl Iterator<Item = &Ancestor> {
        self.ancestors.iter()
    }
}

impl fmt::Display for RecursionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ancestor) in self.ancestors.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", ancestor)?;
        }
        Ok(())
    }
}
