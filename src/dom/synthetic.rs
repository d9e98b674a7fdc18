use std::collections::BTreeMap;

use crate::dom::document::Document;
use crate::foundation::core::{ElementId, Rect};
use crate::foundation::error::{PageError, PageResult};

/// Declarative description of an element subtree.
///
/// Used both as the builder for [`SyntheticDocument`] and as the element format of page
/// fixtures (JSON).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementSpec {
    /// Tag name.
    pub tag: String,
    /// `id` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Class list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Other attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    /// Border box `[x, y, width, height]` in document coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<[f64; 4]>,
    /// Child elements in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    /// Element with tag `tag` and nothing else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Sets the `id` attribute.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds one class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Sets attribute `name`.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Sets the border box in document coordinates.
    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Some([x, y, width, height]);
        self
    }

    /// Full-width block starting at `top` with the given height.
    pub fn span(self, top: f64, height: f64) -> Self {
        self.rect(0.0, top, BLOCK_WIDTH, height)
    }

    /// Appends a child subtree.
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// Width given to [`ElementSpec::span`] blocks.
pub const BLOCK_WIDTH: f64 = 960.0;

/// One mutation call recorded by [`SyntheticDocument`].
///
/// Every call is recorded, including calls that did not change anything, so tests can check
/// how often a component touched a marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// `add_class` call.
    ClassAdded {
        /// Target element.
        el: ElementId,
        /// Class name.
        class: String,
    },
    /// `remove_class` call.
    ClassRemoved {
        /// Target element.
        el: ElementId,
        /// Class name.
        class: String,
    },
    /// `set_attribute` call.
    AttributeSet {
        /// Target element.
        el: ElementId,
        /// Attribute name.
        name: String,
        /// New value.
        value: String,
    },
    /// `remove_attribute` call.
    AttributeRemoved {
        /// Target element.
        el: ElementId,
        /// Attribute name.
        name: String,
    },
    /// Child insertion.
    Inserted {
        /// New parent.
        parent: ElementId,
        /// Inserted element.
        child: ElementId,
    },
    /// Element detached from the tree.
    Removed {
        /// Removed element.
        el: ElementId,
    },
}

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    layout: Option<Rect>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            layout: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// In-memory document tree with explicit layout boxes.
///
/// Starts as `html > body`. Elements are never freed; removed elements keep their handle but
/// report `is_connected() == false`.
///
/// Every [`Document::create_element`] call grows the arena for the lifetime of the document,
/// trail nodes and rays included, so a long `simulate --decorations` run keeps every node it
/// ever spawned. The type is a test and simulation double, not a backing store for a
/// long-running host.
#[derive(Clone, Debug)]
pub struct SyntheticDocument {
    nodes: Vec<Node>,
    root: ElementId,
    body: ElementId,
    journal: Vec<Mutation>,
}

impl Default for SyntheticDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticDocument {
    /// Empty `html > body` document.
    pub fn new() -> Self {
        let mut nodes = vec![Node::new("html"), Node::new("body")];
        nodes[0].children.push(ElementId(1));
        nodes[1].parent = Some(ElementId(0));
        Self {
            nodes,
            root: ElementId(0),
            body: ElementId(1),
            journal: Vec::new(),
        }
    }

    /// Builds a document whose body holds `specs` in order.
    pub fn with_body(specs: &[ElementSpec]) -> PageResult<Self> {
        let mut doc = Self::new();
        let body = doc.body;
        for spec in specs {
            doc.insert(body, spec)?;
        }
        doc.journal.clear();
        Ok(doc)
    }

    /// Inserts `spec` (recursively) as last child of `parent`.
    pub fn insert(&mut self, parent: ElementId, spec: &ElementSpec) -> PageResult<ElementId> {
        if spec.tag.trim().is_empty() {
            return Err(PageError::document("element spec without tag"));
        }
        let el = self.create_element(&spec.tag);
        {
            let node = &mut self.nodes[el.0 as usize];
            if let Some(id) = &spec.id {
                node.attrs.insert("id".to_string(), id.clone());
            }
            for class in &spec.classes {
                if !node.classes.contains(class) {
                    node.classes.push(class.clone());
                }
            }
            for (k, v) in &spec.attrs {
                node.attrs.insert(k.to_ascii_lowercase(), v.clone());
            }
            node.layout = spec.rect.map(|[x, y, w, h]| Rect::new(x, y, x + w, y + h));
        }
        self.append_child(parent, el)?;
        for child in &spec.children {
            self.insert(el, child)?;
        }
        Ok(el)
    }

    /// The `html` element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Replaces the layout box of `el`; `None` means not laid out.
    pub fn set_layout(&mut self, el: ElementId, layout: Option<Rect>) -> PageResult<()> {
        let node = self.node_mut(el)?;
        node.layout = layout;
        Ok(())
    }

    /// Children of `el` in order; empty for unknown handles.
    pub fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.node(el)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Recorded mutation calls since construction (fixture building excluded).
    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    /// Forgets recorded mutations.
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// How many times `add_class(el, class)` was called.
    pub fn class_add_calls(&self, el: ElementId, class: &str) -> usize {
        self.journal
            .iter()
            .filter(|m| matches!(m, Mutation::ClassAdded { el: e, class: c } if *e == el && c == class))
            .count()
    }

    /// Number of arena slots, detached elements included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for a constructed document.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.0 as usize)
    }

    fn node_mut(&mut self, el: ElementId) -> PageResult<&mut Node> {
        self.nodes
            .get_mut(el.0 as usize)
            .ok_or_else(|| PageError::document(format!("unknown element {}", el.0)))
    }

    fn detach(&mut self, el: ElementId) -> bool {
        let Some(parent) = self.node(el).and_then(|n| n.parent) else {
            return false;
        };
        self.nodes[parent.0 as usize].children.retain(|&c| c != el);
        self.nodes[el.0 as usize].parent = None;
        true
    }

    fn check_insert(&self, parent: ElementId, child: ElementId) -> PageResult<()> {
        if self.node(parent).is_none() {
            return Err(PageError::document(format!("unknown parent {}", parent.0)));
        }
        if self.node(child).is_none() {
            return Err(PageError::document(format!("unknown child {}", child.0)));
        }
        if child == self.root || self.is_ancestor(child, parent) {
            return Err(PageError::document(format!(
                "inserting {} under {} would create a cycle",
                child.0, parent.0
            )));
        }
        Ok(())
    }

    fn walk(&self, el: ElementId, out: &mut Vec<ElementId>) {
        out.push(el);
        if let Some(node) = self.node(el) {
            for &child in &node.children {
                self.walk(child, out);
            }
        }
    }
}

impl Document for SyntheticDocument {
    fn elements(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.walk(self.root, &mut out);
        out
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn tag_name(&self, el: ElementId) -> Option<&str> {
        self.node(el).map(|n| n.tag.as_str())
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el).and_then(|n| n.parent)
    }

    fn is_connected(&self, el: ElementId) -> bool {
        self.node(el).is_some() && self.is_ancestor(self.root, el)
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        let node = self.node(el)?;
        if name.eq_ignore_ascii_case("class") {
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        node.attrs.get(&name.to_ascii_lowercase()).cloned()
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) -> bool {
        let name = name.to_ascii_lowercase();
        let Ok(node) = self.node_mut(el) else {
            return false;
        };
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            node.attrs.insert(name.clone(), value.to_string());
        }
        self.journal.push(Mutation::AttributeSet {
            el,
            name,
            value: value.to_string(),
        });
        true
    }

    fn remove_attribute(&mut self, el: ElementId, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        let Ok(node) = self.node_mut(el) else {
            return false;
        };
        let existed = if name == "class" {
            let had = !node.classes.is_empty();
            node.classes.clear();
            had
        } else {
            node.attrs.remove(&name).is_some()
        };
        self.journal.push(Mutation::AttributeRemoved { el, name });
        existed
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, el: ElementId, class: &str) -> bool {
        let Ok(node) = self.node_mut(el) else {
            return false;
        };
        let added = if node.classes.iter().any(|c| c == class) {
            false
        } else {
            node.classes.push(class.to_string());
            true
        };
        self.journal.push(Mutation::ClassAdded {
            el,
            class: class.to_string(),
        });
        added
    }

    fn remove_class(&mut self, el: ElementId, class: &str) -> bool {
        let Ok(node) = self.node_mut(el) else {
            return false;
        };
        let before = node.classes.len();
        node.classes.retain(|c| c != class);
        let removed = node.classes.len() != before;
        self.journal.push(Mutation::ClassRemoved {
            el,
            class: class.to_string(),
        });
        removed
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        self.node(el).and_then(|n| n.style.get(property).cloned())
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) -> bool {
        let Ok(node) = self.node_mut(el) else {
            return false;
        };
        node.style.insert(property.to_string(), value.to_string());
        true
    }

    fn layout_box(&self, el: ElementId) -> Option<Rect> {
        self.node(el).and_then(|n| n.layout)
    }

    /// Pushes a new arena slot; slots are never reused.
    fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(Node::new(tag));
        id
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) -> PageResult<()> {
        self.check_insert(parent, child)?;
        self.detach(child);
        self.nodes[parent.0 as usize].children.push(child);
        self.nodes[child.0 as usize].parent = Some(parent);
        self.journal.push(Mutation::Inserted { parent, child });
        Ok(())
    }

    fn prepend_child(&mut self, parent: ElementId, child: ElementId) -> PageResult<()> {
        self.check_insert(parent, child)?;
        self.detach(child);
        self.nodes[parent.0 as usize].children.insert(0, child);
        self.nodes[child.0 as usize].parent = Some(parent);
        self.journal.push(Mutation::Inserted { parent, child });
        Ok(())
    }

    fn remove_element(&mut self, el: ElementId) -> bool {
        if el == self.root || el == self.body {
            return false;
        }
        if !self.detach(el) {
            return false;
        }
        self.journal.push(Mutation::Removed { el });
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dom/synthetic.rs"]
mod tests;
