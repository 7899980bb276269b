//! Data model: a best-effort view over remote tree nodes, and the chapter/section tree built from them.

use serde_json::Value;

/// Document type tag marking a node whose content is fetched.
pub const LEAF_DOC_TYPE: i64 = 1;

/// Read-only view over one node of the remote table of contents.
///
/// Every accessor degrades: a missing field or one with the wrong JSON type reads as absent.
#[derive(Debug, Clone, Copy)]
pub struct TreeNode<'a>(&'a Value);

impl<'a> TreeNode<'a> {
    pub fn new(value: &'a Value) -> Self {
        TreeNode(value)
    }

    /// Node identifier. Numeric ids are rendered as decimal strings; empty strings count as absent.
    pub fn id(&self) -> Option<String> {
        match self.0.get("Id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `Id` as given, keeping an empty string. Chapters report this one.
    pub fn raw_id(&self) -> Option<String> {
        match self.0.get("Id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Display title, trimmed. Empty when missing.
    pub fn heading(&self) -> String {
        self.0
            .get("Heading")
            .and_then(|h| h.as_str())
            .map(|h| h.trim().to_string())
            .unwrap_or_default()
    }

    /// `Data.DocType` when it is an integer.
    pub fn doc_type(&self) -> Option<i64> {
        let tag = self.0.get("Data")?.get("DocType")?;
        tag.as_i64().or_else(|| {
            tag.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        })
    }

    /// True when this node's content must be fetched.
    pub fn is_leaf(&self) -> bool {
        self.doc_type() == Some(LEAF_DOC_TYPE)
    }

    /// Child nodes in source order. Empty when missing or not an array.
    pub fn children(&self) -> impl Iterator<Item = TreeNode<'a>> {
        self.0
            .get("Children")
            .and_then(|c| c.as_array())
            .map(|c| c.as_slice())
            .unwrap_or_default()
            .iter()
            .map(TreeNode)
    }
}

/// Top-level division of the code. Kept only when it has at least one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// `None` when the remote node carried no id.
    pub id: Option<String>,
    pub title: String,
    /// Empty when `id` is `None` or blank.
    pub url: String,
    pub sections: Vec<Section>,
}

/// Section at any depth below a chapter.
///
/// A built section always has non-empty `text` or at least one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Clean text; empty unless the node was a leaf.
    pub text: String,
    pub children: Vec<Section>,
}

impl Section {
    /// Whether the section carries anything worth keeping.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty() || !self.children.is_empty()
    }
}
