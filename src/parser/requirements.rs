//! Ansible requirements file parser
//!
//! Handles the three layouts found in the wild:
//! - a plain list of roles (`requirements.yml`, legacy format)
//! - a mapping with `roles:` / `collections:` keys (collections-era format)
//! - a role's `meta/main.yml`, where dependencies live under `dependencies:`

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{Entry, Role};
use tracing::{debug, warn};

/// Node kinds that decorate a value without being the value itself
const DECORATION_KINDS: &[&str] = &["comment", "anchor", "tag"];

/// Parser for Ansible requirements and role meta files
pub struct RequirementsParser;

impl RequirementsParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RequirementsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for RequirementsParser {
    fn parse(&self, content: &str) -> Result<Vec<Entry>, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_yaml::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set YAML language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ParseError::TreeSitter("parser returned no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ParseError::InvalidSyntax {
                line: first_error_line(root),
            });
        }

        // Only the first document of a stream is considered
        let mut cursor = root.walk();
        let Some(document) = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "document")
        else {
            debug!("Requirements file is empty");
            return Ok(Vec::new());
        };

        let Some(body) = value_of(document) else {
            return Ok(Vec::new());
        };

        match body.kind() {
            "block_sequence" | "flow_sequence" => self.parse_entries(body, content),
            "block_mapping" | "flow_mapping" => self.parse_sections(body, content),
            _ if is_null(body, content) => Ok(Vec::new()),
            kind => Err(unexpected(body, kind)),
        }
    }
}

impl RequirementsParser {
    /// Parse a top-level mapping, collecting roles from `roles:` and `dependencies:`
    ///
    /// ```text
    /// stream
    ///   document
    ///     block_node
    ///       block_mapping
    ///         block_mapping_pair      <- "roles: ..."
    ///           flow_node             <- key: "roles"
    ///           block_node
    ///             block_sequence      <- list of roles
    /// ```
    fn parse_sections(
        &self,
        mapping: tree_sitter::Node,
        content: &str,
    ) -> Result<Vec<Entry>, ParseError> {
        let mut entries = Vec::new();

        for (key, value) in pairs(mapping, content) {
            match key.as_str() {
                // `dependencies` is where a role's meta/main.yml declares other roles
                "roles" | "dependencies" => {
                    let Some(value) = value else { continue };
                    match value.kind() {
                        "block_sequence" | "flow_sequence" => {
                            entries.extend(self.parse_entries(value, content)?)
                        }
                        _ if is_null(value, content) => {}
                        kind => return Err(unexpected(value, kind)),
                    }
                }
                "collections" => debug!("Skipping collections section"),
                // meta/main.yml carries unrelated keys such as galaxy_info
                other => debug!("Ignoring top-level key {}", other),
            }
        }

        Ok(entries)
    }

    /// Parse every item of a block or flow sequence
    fn parse_entries(
        &self,
        sequence: tree_sitter::Node,
        content: &str,
    ) -> Result<Vec<Entry>, ParseError> {
        sequence_items(sequence)
            .into_iter()
            .filter(|item| !is_null(*item, content))
            .map(|item| self.parse_entry(item, content))
            .collect()
    }

    /// Parse a single role entry
    ///
    /// Accepts `- name`, `- src: ...` block mappings and `- { role: ... }` flow mappings.
    fn parse_entry(&self, node: tree_sitter::Node, content: &str) -> Result<Entry, ParseError> {
        match node.kind() {
            "block_mapping" | "flow_mapping" => {}
            kind if is_scalar(kind) => {
                return Ok(Entry::Role(Role {
                    name: scalar_text(node, content),
                    ..Default::default()
                }));
            }
            kind => return Err(unexpected(node, kind)),
        }

        let mut role = Role::default();
        let mut include = String::new();

        for (key, value) in pairs(node, content) {
            let field = match key.as_str() {
                "src" => &mut role.source,
                "scm" => &mut role.scm,
                "version" => &mut role.version,
                "name" | "role" => &mut role.name,
                "include" => &mut include,
                // role variables and tags are passed through to the role, not ours
                _ => continue,
            };

            *field = match value {
                Some(v) if is_scalar(v.kind()) => scalar_text(v, content),
                Some(v) => return Err(unexpected(v, v.kind())),
                None => String::new(),
            };
        }

        if include.is_empty() {
            Ok(Entry::Role(role))
        } else {
            Ok(Entry::Include(include))
        }
    }
}

/// Descend through wrapper nodes (document, block_node, flow_node) to the actual value
fn value_of(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    match node.kind() {
        "document" | "block_node" | "flow_node" | "block_sequence_item" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|n| !DECORATION_KINDS.contains(&n.kind()))?;
            value_of(inner)
        }
        _ => Some(node),
    }
}

/// Key/value pairs of a block or flow mapping, with values already unwrapped
fn pairs<'a>(
    mapping: tree_sitter::Node<'a>,
    content: &str,
) -> Vec<(String, Option<tree_sitter::Node<'a>>)> {
    let mut cursor = mapping.walk();
    mapping
        .named_children(&mut cursor)
        .filter(|n| matches!(n.kind(), "block_mapping_pair" | "flow_pair"))
        .filter_map(|pair| {
            let key = pair.child_by_field_name("key").and_then(value_of)?;
            let value = pair.child_by_field_name("value").and_then(value_of);
            Some((scalar_text(key, content), value))
        })
        .collect()
}

/// Items of a block or flow sequence, with wrappers unwrapped and empty items skipped
fn sequence_items(sequence: tree_sitter::Node) -> Vec<tree_sitter::Node> {
    let mut cursor = sequence.walk();
    sequence
        .named_children(&mut cursor)
        .filter(|n| !DECORATION_KINDS.contains(&n.kind()))
        .filter_map(value_of)
        .collect()
}

fn is_scalar(kind: &str) -> bool {
    matches!(
        kind,
        "plain_scalar" | "double_quote_scalar" | "single_quote_scalar"
    )
}

fn is_null(node: tree_sitter::Node, content: &str) -> bool {
    is_scalar(node.kind()) && matches!(scalar_text(node, content).as_str(), "" | "~" | "null")
}

/// Get text content of a scalar node, removing quotes if present
fn scalar_text(node: tree_sitter::Node, content: &str) -> String {
    let text = content[node.byte_range()].trim();
    match node.kind() {
        "double_quote_scalar" => text.trim_matches('"').to_string(),
        "single_quote_scalar" => text.trim_matches('\'').to_string(),
        _ => text.to_string(),
    }
}

fn unexpected(node: tree_sitter::Node, kind: &str) -> ParseError {
    ParseError::UnexpectedNode {
        line: node.start_position().row + 1,
        kind: kind.to_string(),
    }
}

/// 1-based line of the first syntax error in the tree
fn first_error_line(node: tree_sitter::Node) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_position().row + 1;
    }

    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| child.has_error())
        .map(first_error_line);
    found.unwrap_or(node.start_position().row + 1)
}
