use serde_json::Value;
use tracing::warn;

use crate::error::{I18nError, I18nResult};

/// One node of a locale's content tree.
///
/// Branch children keep their definition order; the order matters when a
/// branch is read as a variant map and no dimension matches.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Branch(Vec<(String, Node)>),
}

impl Node {
    fn child(&self, segment: &str) -> Option<&Node> {
        match self {
            Node::Text(_) => None,
            Node::Branch(children) => children
                .iter()
                .find(|(name, _)| name == segment)
                .map(|(_, node)| node),
        }
    }

    /// Child named `segment`, created if missing. A text node on the path is
    /// replaced by a branch, dropping its text.
    fn child_mut_or_insert(&mut self, segment: &str) -> &mut Node {
        if let Node::Text(text) = self {
            warn!(
                segment,
                dropped = %text,
                "Nested key replaces existing translation text"
            );
            *self = Node::Branch(Vec::new());
        }
        let Node::Branch(children) = self else {
            unreachable!("node was just turned into a branch")
        };
        let index = match children.iter().position(|(name, _)| name == segment) {
            Some(index) => index,
            None => {
                children.push((segment.to_string(), Node::Branch(Vec::new())));
                children.len() - 1
            }
        };
        &mut children[index].1
    }

    fn to_json(&self) -> Value {
        match self {
            Node::Text(text) => Value::String(text.clone()),
            Node::Branch(children) => Value::Object(
                children
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Alternatives of one translation keyed by a dimension value
/// (`one`, `few`, `female`, `formal`, `checkout`, `default`, ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantMap(pub Vec<(String, String)>);

impl VariantMap {
    pub fn new() -> Self {
        VariantMap(Vec::new())
    }

    pub fn with_variant(mut self, key: &str, text: &str) -> Self {
        self.0.push((key.to_owned(), text.to_owned()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, text)| text.as_str())
    }

    /// First variant in definition order.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|(_, text)| text.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for VariantMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let object: serde_json::Map<String, Value> = self
            .0
            .iter()
            .map(|(name, text)| (name.clone(), Value::String(text.clone())))
            .collect();
        write!(f, "{}", Value::Object(object))
    }
}

/// Raw value found at the end of a key path.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationValue {
    Scalar(String),
    Variants(VariantMap),
}

impl TranslationValue {
    fn from_node(node: &Node) -> Self {
        match node {
            Node::Text(text) => TranslationValue::Scalar(text.clone()),
            Node::Branch(children) => TranslationValue::Variants(VariantMap(
                children
                    .iter()
                    .filter_map(|(name, child)| match child {
                        Node::Text(text) => Some((name.clone(), text.clone())),
                        Node::Branch(_) => None,
                    })
                    .collect(),
            )),
        }
    }
}

/// Content tree for one locale.
///
/// Loaded once per locale activation and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationStore {
    root: Node,
}

impl Default for TranslationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationStore {
    pub fn new() -> Self {
        TranslationStore {
            root: Node::Branch(Vec::new()),
        }
    }

    /// Insert a scalar translation at a dotted key.
    pub fn with_text(mut self, key: &str, text: &str) -> Self {
        *self.node_at_mut(key) = Node::Text(text.to_owned());
        self
    }

    /// Insert a variant map at a dotted key.
    pub fn with_variants(mut self, key: &str, variants: VariantMap) -> Self {
        *self.node_at_mut(key) = Node::Branch(
            variants
                .0
                .into_iter()
                .map(|(name, text)| (name, Node::Text(text)))
                .collect(),
        );
        self
    }

    fn node_at_mut(&mut self, key: &str) -> &mut Node {
        key.split('.')
            .fold(&mut self.root, |node, segment| node.child_mut_or_insert(segment))
    }

    /// Build a store from a JSON object.
    ///
    /// Dotted keys are split into segments, so `{"greet.hello": "Hi"}` and
    /// `{"greet": {"hello": "Hi"}}` are equivalent. Keys starting with `@`
    /// are metadata and skipped. Numbers and booleans are kept in their
    /// string form; `null` and arrays are skipped.
    pub fn from_json(json: &Value) -> I18nResult<Self> {
        let object = json.as_object().ok_or_else(|| {
            I18nError::InvalidStore("root must be an object".to_string())
        })?;
        let mut store = TranslationStore::new();
        insert_object(&mut store.root, object);
        Ok(store)
    }

    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }

    /// Walk a dotted key. Returns `None` on the first missing segment.
    pub fn lookup(&self, key: &str) -> Option<TranslationValue> {
        let mut node = &self.root;
        for segment in key.split('.') {
            node = node.child(segment)?;
        }
        Some(TranslationValue::from_node(node))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of text leaves in the tree.
    pub fn len(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Text(_) => 1,
                Node::Branch(children) => children.iter().map(|(_, child)| count(child)).sum(),
            }
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn insert_object(target: &mut Node, object: &serde_json::Map<String, Value>) {
    for (key, value) in object {
        if key.starts_with('@') {
            continue;
        }
        let text = match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Object(_) => None,
            Value::Null | Value::Array(_) => {
                warn!(key = %key, "Skipping translation value that is neither text nor object");
                continue;
            }
        };
        let node = key
            .split('.')
            .fold(&mut *target, |node, segment| node.child_mut_or_insert(segment));
        match (text, value) {
            (Some(text), _) => *node = Node::Text(text),
            (None, Value::Object(children)) => insert_object(node, children),
            (None, _) => {}
        }
    }
}
