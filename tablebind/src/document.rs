//! Default presentation backend.
//!
//! A [`Document`] is an arena of structural elements addressed by
//! [`ElementId`]. It has no styling or layout of its own; [`crate::text`]
//! and [`Document::to_markup`] turn it into something readable.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;

use crate::backend::{Backend, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    #[error("element {child} is not a child of {parent}")]
    NotAChild { parent: ElementId, child: ElementId },

    #[error("element {0} already has a parent")]
    AlreadyAttached(ElementId),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub role: Role,
    pub text: Option<String>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
}

impl Element {
    fn new(id: ElementId, role: Role, text: Option<String>) -> Self {
        Self {
            id,
            role,
            text,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Document {
    elements: HashMap<ElementId, Element>,
    next_id: u64,
    created: usize,
    released: usize,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element.
    pub fn create_element(&mut self, role: Role, text: Option<&str>) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.created += 1;
        self.elements
            .insert(id, Element::new(id, role, text.map(str::to_owned)));
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Children of `id`, empty when the element does not exist.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map(|el| el.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id)?.text.as_deref()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements created over the document's lifetime.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Elements released over the document's lifetime.
    pub fn released(&self) -> usize {
        self.released
    }

    /// First element with `role` under `root` (inclusive), depth first.
    pub fn find_by_role(&self, root: ElementId, role: Role) -> Option<ElementId> {
        let el = self.elements.get(&root)?;
        if el.role == role {
            return Some(root);
        }
        el.children
            .iter()
            .find_map(|&child| self.find_by_role(child, role))
    }

    /// Place `child` before the element at `index` in `parent`, or last when
    /// `index` is past the end.
    pub fn insert_child(
        &mut self,
        parent: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<(), DocumentError> {
        if !self.elements.contains_key(&parent) {
            return Err(DocumentError::UnknownElement(parent));
        }
        let el = self
            .elements
            .get_mut(&child)
            .ok_or(DocumentError::UnknownElement(child))?;
        if el.parent.is_some() {
            return Err(DocumentError::AlreadyAttached(child));
        }
        el.parent = Some(parent);

        if let Some(parent) = self.elements.get_mut(&parent) {
            let index = index.min(parent.children.len());
            parent.children.insert(index, child);
        }
        Ok(())
    }

    /// Unlink `child` from `parent` and release it with its whole subtree.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), DocumentError> {
        let el = self
            .elements
            .get_mut(&parent)
            .ok_or(DocumentError::UnknownElement(parent))?;
        let position = el
            .children
            .iter()
            .position(|&id| id == child)
            .ok_or(DocumentError::NotAChild { parent, child })?;
        el.children.remove(position);

        let mut stack = vec![child];
        while let Some(id) = stack.pop() {
            if let Some(el) = self.elements.remove(&id) {
                self.released += 1;
                stack.extend(el.children);
            }
        }
        log::trace!("[document] released {} under {}", child, parent);
        Ok(())
    }

    /// Write the subtree at `root` as markup, e.g. `<tr><td>1</td></tr>`.
    pub fn to_markup(&self, root: ElementId) -> String {
        let mut out = String::new();
        self.write_markup(root, &mut out);
        out
    }

    fn write_markup(&self, id: ElementId, out: &mut String) {
        let Some(el) = self.elements.get(&id) else {
            return;
        };
        let tag = el.role.tag();
        let _ = write!(out, "<{tag}>");
        if let Some(text) = &el.text {
            escape_into(text, out);
        }
        for &child in &el.children {
            self.write_markup(child, out);
        }
        let _ = write!(out, "</{tag}>");
    }
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

impl Backend for Document {
    type Handle = ElementId;
    type Error = DocumentError;

    fn create(&mut self, role: Role, text: Option<&str>) -> Result<ElementId, DocumentError> {
        Ok(self.create_element(role, text))
    }

    fn insert(
        &mut self,
        parent: &ElementId,
        index: usize,
        child: &ElementId,
    ) -> Result<(), DocumentError> {
        self.insert_child(*parent, index, *child)
    }

    fn remove(&mut self, parent: &ElementId, child: ElementId) -> Result<(), DocumentError> {
        self.remove_child(*parent, child)
    }
}
