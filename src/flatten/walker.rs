//! Flattening walker
//!
//! Depth-first, pre-order, left-to-right descent from the top-level
//! elements of the root schema. Every visited particle becomes one
//! [`ElementRecord`]; complex types, extension bases and group references
//! are expanded in place one level deeper.

use tracing::{debug, warn};

use crate::annotations::documentation;
use crate::config::Config;
use crate::documents::Element;
use crate::schema::{
    classify, enumerations, extension_base, members, resolve_base, Ancestor, BaseType, NodeKind,
    Origin, RecursionPath, SchemaDocument, SchemaRegistry,
};

use super::model::{Direction, ElementKind, ElementRecord, FlattenOutput, Nillable, Occurs};

/// Flatten the root schema of `registry`
pub fn flatten(registry: &SchemaRegistry, config: &Config) -> FlattenOutput {
    Walker::new(registry, config).run()
}

/// Traversal context of one branch
#[derive(Debug, Clone)]
pub struct Branch<'a> {
    /// Nesting level of the nodes visited with this branch
    pub depth: usize,
    /// Direction inherited from the parent
    pub direction: Direction,
    /// Types and groups entered above this branch
    pub path: RecursionPath,
    /// Prefix of the imported schema the branch runs in
    pub foreign_prefix: Option<&'a str>,
}

impl<'a> Branch<'a> {
    /// Context of the top-level elements: depth 0, `in`, no ancestors, primary schema
    pub fn root() -> Self {
        Self {
            depth: 0,
            direction: Direction::In,
            path: RecursionPath::new(),
            foreign_prefix: None,
        }
    }

    /// Context of the members of a node visited with this branch
    pub fn descend(&self, direction: Direction, path: RecursionPath) -> Self {
        Self {
            depth: self.depth + 1,
            direction,
            path,
            foreign_prefix: self.foreign_prefix,
        }
    }
}

/// Walk state: the registry being read and the output being written
pub struct Walker<'a> {
    registry: &'a SchemaRegistry,
    config: &'a Config,
    output: FlattenOutput,
    next_sequence: usize,
}

impl<'a> Walker<'a> {
    /// Create a walker over a registry
    pub fn new(registry: &'a SchemaRegistry, config: &'a Config) -> Self {
        Self {
            registry,
            config,
            output: FlattenOutput::new(),
            next_sequence: 0,
        }
    }

    /// Flatten every top-level element of the root schema
    pub fn run(mut self) -> FlattenOutput {
        let root = self.registry.root();
        let nodes = root.top_level_elements();
        self.walk(root, &nodes, &Branch::root());
        self.output
    }

    /// Visit `nodes` of `doc` in order
    pub fn walk(&mut self, doc: &'a SchemaDocument, nodes: &[&'a Element], branch: &Branch<'a>) {
        for node in nodes {
            self.visit(doc, node, branch);
        }
    }

    fn visit(&mut self, doc: &'a SchemaDocument, node: &'a Element, branch: &Branch<'a>) {
        let name = node.get_attribute("name");
        let direction = self.direction_for(name, branch.direction);
        let kind = classify(doc, node);
        let enum_key = enumeration_key(&kind, self.next_sequence);
        let index = self.emit(node, &kind, branch, direction, enum_key.clone());

        match kind {
            NodeKind::Complex { definition, key } => {
                let path = match key {
                    Some(key) => {
                        let ancestor = Ancestor::ComplexType(key);
                        if branch.path.would_cycle(&ancestor) {
                            self.cut_cycle(index, &ancestor, &branch.path);
                            return;
                        }
                        branch.path.with(ancestor)
                    }
                    None => branch.path.clone(),
                };
                self.expand_type(doc, definition, &branch.descend(direction, path));
            }
            NodeKind::Simple { definition, type_name, .. } => {
                let owner = name.unwrap_or(type_name.as_str());
                let key = enum_key.unwrap_or_else(|| type_name.clone());
                self.output
                    .add_enumerations(owner, &type_name, &key, enumerations(definition));
            }
            NodeKind::GroupRef { group: Some(group), key } => {
                let ancestor = Ancestor::Group(key);
                if branch.path.would_cycle(&ancestor) {
                    self.cut_cycle(index, &ancestor, &branch.path);
                    return;
                }
                let path = branch.path.with(ancestor);
                self.walk(doc, &members(group), &branch.descend(direction, path));
            }
            NodeKind::GroupRef { group: None, key } => {
                debug!(group = %key, "group reference without a definition");
            }
            NodeKind::Primitive => {}
        }
    }

    /// Emit the inherited members of a type, then its own members
    ///
    /// `branch` is the context of the members; its path already holds the type.
    fn expand_type(&mut self, doc: &'a SchemaDocument, definition: &'a Element, branch: &Branch<'a>) {
        if let Some(base) = extension_base(definition) {
            match resolve_base(self.registry, doc, base, self.config.imports_enabled) {
                BaseType::Found {
                    document,
                    definition: base_definition,
                    key,
                    origin,
                } => {
                    let ancestor = Ancestor::ComplexType(key);
                    if branch.path.would_cycle(&ancestor) {
                        warn!(base, path = %branch.path, "extension base is already an ancestor");
                    } else {
                        let base_branch = Branch {
                            depth: branch.depth,
                            direction: branch.direction,
                            path: branch.path.with(ancestor),
                            foreign_prefix: match origin {
                                Origin::Current => branch.foreign_prefix,
                                Origin::Primary => None,
                                Origin::Import(prefix) => Some(prefix),
                            },
                        };
                        self.expand_type(document, base_definition, &base_branch);
                    }
                }
                BaseType::Builtin => {}
                BaseType::ImportsDisabled => {
                    debug!(base, "imports disabled, foreign base members omitted");
                }
                BaseType::Unresolved => {
                    warn!(base, "extension base cannot be resolved");
                }
            }
        }

        self.walk(doc, &members(definition), branch);
    }

    fn direction_for(&self, name: Option<&str>, inherited: Direction) -> Direction {
        match name {
            Some(n) if self.config.is_response(n) => Direction::Out,
            _ => inherited,
        }
    }

    fn emit(
        &mut self,
        node: &Element,
        kind: &NodeKind<'_>,
        branch: &Branch<'a>,
        direction: Direction,
        enum_key: Option<String>,
    ) -> usize {
        let kind = match kind {
            NodeKind::Complex { .. } => ElementKind::Complex,
            NodeKind::Simple { .. } => ElementKind::Simple,
            NodeKind::GroupRef { .. } => ElementKind::GroupRef,
            NodeKind::Primitive => ElementKind::Primitive,
        };

        let record = ElementRecord {
            sequence: self.next_sequence,
            name: node.get_attribute("name").map(str::to_string),
            type_name: node.get_attribute("type").map(str::to_string),
            reference: node.get_attribute("ref").map(str::to_string),
            kind,
            occurs: Occurs::from_attributes(
                node.get_attribute("minOccurs"),
                node.get_attribute("maxOccurs"),
            ),
            nillable: Nillable::from_attribute(node.get_attribute("nillable")),
            description: documentation(node),
            depth: branch.depth,
            direction,
            recursive: false,
            foreign_prefix: branch.foreign_prefix.map(str::to_string),
            enum_key,
        };
        self.next_sequence += 1;
        self.output.push_element(record)
    }

    fn cut_cycle(&mut self, index: usize, ancestor: &Ancestor, path: &RecursionPath) {
        debug!(component = ancestor.name(), path = %path, "recursion detected, subtree pruned");
        if let Some(record) = self.output.element_mut(index) {
            record.mark_recursive(ancestor.recursion_notice());
        }
    }
}

/// Key the values of a simple node are stored under
///
/// Inline types have no name of their own, so the sequence number of the
/// record keeps them apart.
fn enumeration_key(kind: &NodeKind<'_>, sequence: usize) -> Option<String> {
    match kind {
        NodeKind::Simple { type_name, key: Some(_), .. } => Some(type_name.clone()),
        NodeKind::Simple { type_name, key: None, .. } => Some(format!("{}#{}", type_name, sequence)),
        _ => None,
    }
}
