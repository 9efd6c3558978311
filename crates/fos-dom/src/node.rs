//! DOM Node
//!
//! Linked arena node: parent, first/last child and sibling links are
//! `NodeId`s rather than pointers.

use crate::{DOMStringMap, DOMTokenList, FormControl, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
    pub data: NodeData,
}

/// Node payload
#[derive(Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

/// Element payload
#[derive(Debug, Default)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    pub classes: DOMTokenList,
    pub dataset: DOMStringMap,
    /// Explicit `display: none` on this element
    pub display_none: bool,
    /// Present for `input`, `select` and `textarea`
    pub control: Option<FormControl>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    pub fn element(data: ElementData) -> Self {
        Self::with_data(NodeData::Element(data))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}
