//! Node resolution: collapse an arbitrarily nested syntax node into a
//! printable value.
//!
//! The reduction keeps a cursor on the current node and dispatches on its
//! kind until a terminal arm produces a value. Wrapper kinds (calls,
//! expression statements, subscripts) advance the cursor to the child that
//! matters and loop. The tree is finite and acyclic and every wrapper arm
//! strictly descends, so the loop terminates; the fallback arm guarantees
//! every kind yields *something* printable rather than an error.

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tree_sitter::Node;

/// Kind tag of a descriptor, taken from the node's own variant before any
/// pass-through unwrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Import,
    ImportFrom,
    Assign,
    FunctionDef,
    ClassDef,
    /// Any other variant; carries the raw grammar kind.
    Other(String),
}

impl NodeKind {
    pub fn of(node: Node) -> Self {
        match node.kind() {
            "import_statement" => NodeKind::Import,
            "import_from_statement" => NodeKind::ImportFrom,
            "assignment" => NodeKind::Assign,
            "function_definition" => NodeKind::FunctionDef,
            "class_definition" => NodeKind::ClassDef,
            other => NodeKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Import => "Import",
            NodeKind::ImportFrom => "ImportFrom",
            NodeKind::Assign => "Assign",
            NodeKind::FunctionDef => "FunctionDef",
            NodeKind::ClassDef => "ClassDef",
            NodeKind::Other(kind) => kind,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Resolved value of a node: a scalar string, or an insertion-ordered
/// string-to-string mapping (imports and assignments).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    Map(Vec<(String, String)>),
}

impl Value {
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(text.into())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(String, String)]> {
        match self {
            Value::Scalar(_) => None,
            Value::Map(pairs) => Some(pairs),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{}", s),
            Value::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => serializer.serialize_str(s),
            Value::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// A `(kind tag, value)` pair for one syntax node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    pub kind: NodeKind,
    pub value: Value,
}

/// Reduce a node to its canonical printable value.
pub fn resolve_node(node: Node, source: &[u8]) -> Value {
    let mut cur = node;
    loop {
        match cur.kind() {
            // Terminal: names and literals.
            "identifier" | "dotted_name" => return Value::scalar(node_text(cur, source)),
            "function_definition" | "class_definition" => {
                return match cur.child_by_field_name("name") {
                    Some(name) => Value::scalar(node_text(name, source)),
                    None => Value::scalar(field_dump(cur)),
                };
            }
            // Formal parameters surface only their name; annotations and
            // defaults are deliberately left unresolved.
            "typed_parameter" => {
                return match cur.named_child(0) {
                    Some(name) => Value::scalar(node_text(name, source)),
                    None => Value::scalar(field_dump(cur)),
                };
            }
            "default_parameter" | "typed_default_parameter" => {
                return match cur.child_by_field_name("name") {
                    Some(name) => Value::scalar(node_text(name, source)),
                    None => Value::scalar(field_dump(cur)),
                };
            }
            "string" => return Value::scalar(string_content(cur, source)),

            // Compound: resolve sub-nodes.
            "assignment" => return resolve_assignment(cur, source),
            "attribute" => {
                let object = match cur.child_by_field_name("object") {
                    Some(obj) => resolve_node(obj, source),
                    None => return Value::scalar(field_dump(cur)),
                };
                let attr = cur
                    .child_by_field_name("attribute")
                    .map(|a| node_text(a, source))
                    .unwrap_or("");
                let base = match object {
                    Value::Scalar(s) => s,
                    // An attribute's object never resolves to a mapping in
                    // well-formed code; degrade like any other odd shape.
                    Value::Map(_) => field_dump(cur),
                };
                return Value::scalar(format!("{}.{}", base, attr));
            }
            "import_statement" => return resolve_import(cur, source),
            "import_from_statement" => return resolve_import_from(cur, source),

            // Pass-through: descend and loop.
            "call" => match cur.child_by_field_name("function") {
                Some(callee) => cur = callee,
                None => return Value::scalar(field_dump(cur)),
            },
            "expression_statement" => match cur.named_child(0) {
                Some(inner) => cur = inner,
                None => return Value::scalar(field_dump(cur)),
            },
            "subscript" => match cur.child_by_field_name("value") {
                Some(base) => cur = base,
                None => return Value::scalar(field_dump(cur)),
            },
            "decorated_definition" => match cur.child_by_field_name("definition") {
                Some(def) => cur = def,
                None => return Value::scalar(field_dump(cur)),
            },

            // Fallback: dump the node's field names.
            _ => return Value::scalar(field_dump(cur)),
        }
    }
}

/// `a = b = rhs` and `a, b = rhs` both map every target to the one resolved
/// right-hand value.
fn resolve_assignment(node: Node, source: &[u8]) -> Value {
    let mut targets = Vec::new();
    let mut cur = node;
    let rhs = loop {
        if let Some(left) = cur.child_by_field_name("left") {
            collect_targets(left, &mut targets);
        }
        match cur.child_by_field_name("right") {
            Some(right) if right.kind() == "assignment" => cur = right,
            Some(right) => break right,
            // Annotation-only statement (`x: int`), no value to map.
            None => return Value::scalar(field_dump(node)),
        }
    };

    let value = resolve_node(rhs, source);
    let value_text = match value {
        Value::Scalar(s) => s,
        map @ Value::Map(_) => map.to_string(),
    };

    let pairs = targets
        .into_iter()
        .map(|target| {
            let key = match resolve_node(target, source) {
                Value::Scalar(s) => s,
                map @ Value::Map(_) => map.to_string(),
            };
            (key, value_text.clone())
        })
        .collect();
    Value::Map(pairs)
}

fn collect_targets<'t>(left: Node<'t>, targets: &mut Vec<Node<'t>>) {
    match left.kind() {
        "pattern_list" | "tuple_pattern" => {
            let mut cursor = left.walk();
            for child in left.named_children(&mut cursor) {
                targets.push(child);
            }
        }
        _ => targets.push(left),
    }
}

/// `import a.b as c, d` maps each module to its bound local name.
fn resolve_import(node: Node, source: &[u8]) -> Value {
    let mut pairs = Vec::new();
    let mut cursor = node.walk();
    for child in node.children_by_field_name("name", &mut cursor) {
        match child.kind() {
            "aliased_import" => {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source))
                    .unwrap_or("");
                let alias = child
                    .child_by_field_name("alias")
                    .map(|a| node_text(a, source))
                    .unwrap_or(name);
                pairs.push((name.to_string(), alias.to_string()));
            }
            _ => {
                let name = node_text(child, source);
                pairs.push((name.to_string(), name.to_string()));
            }
        }
    }
    Value::Map(pairs)
}

/// `from m import a as b, c` maps each `m.name` to its bound local name.
fn resolve_import_from(node: Node, source: &[u8]) -> Value {
    let module = node
        .child_by_field_name("module_name")
        .map(|m| node_text(m, source))
        .unwrap_or("");

    let mut pairs = Vec::new();
    let mut cursor = node.walk();
    for child in node.children_by_field_name("name", &mut cursor) {
        match child.kind() {
            "aliased_import" => {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source))
                    .unwrap_or("");
                let alias = child
                    .child_by_field_name("alias")
                    .map(|a| node_text(a, source))
                    .unwrap_or(name);
                pairs.push((format!("{}.{}", module, name), alias.to_string()));
            }
            _ => {
                let name = node_text(child, source);
                pairs.push((format!("{}.{}", module, name), name.to_string()));
            }
        }
    }

    // `from m import *` carries no "name" field.
    if pairs.is_empty() {
        let mut cursor = node.walk();
        if node
            .named_children(&mut cursor)
            .any(|c| c.kind() == "wildcard_import")
        {
            pairs.push((format!("{}.*", module), "*".to_string()));
        }
    }

    Value::Map(pairs)
}

fn node_text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// Literal text of a string node, quotes stripped.
fn string_content(node: Node, source: &[u8]) -> String {
    let mut out = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "string_content" | "escape_sequence") {
            out.push_str(node_text(child, source));
        }
    }
    out
}

/// Fallback rendering: the node's child field names, parenthesized.
fn field_dump(node: Node) -> String {
    let mut fields: Vec<&str> = Vec::new();
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            if let Some(field) = cursor.field_name() {
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    format!("({})", fields.join(", "))
}
