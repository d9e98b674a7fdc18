use crate::dom::selector::Selector;
use crate::foundation::core::{ElementId, Rect};
use crate::foundation::error::PageResult;

/// Narrow query/mutate interface over the live document tree.
///
/// Every component reads and writes the page only through this trait, so a host can back it
/// with a real DOM binding and tests can back it with [`crate::SyntheticDocument`].
///
/// Geometry is reported in document coordinates (scroll offset already added).
pub trait Document {
    /// Connected elements in document order (pre-order, root first).
    fn elements(&self) -> Vec<ElementId>;

    /// The `body` element.
    fn body(&self) -> ElementId;

    /// Lower-case tag name, `None` for unknown handles.
    fn tag_name(&self, el: ElementId) -> Option<&str>;

    /// Parent element, `None` for the root and for detached elements.
    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// Whether `el` is attached to the document tree.
    fn is_connected(&self, el: ElementId) -> bool;

    /// Attribute value. `class` reports the space-joined class list.
    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;

    /// Returns `false` when `el` is unknown.
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) -> bool;

    /// Returns `true` when the attribute was present.
    fn remove_attribute(&mut self, el: ElementId, name: &str) -> bool;

    /// Whether `el` carries `class`.
    fn has_class(&self, el: ElementId, class: &str) -> bool;

    /// Returns `true` when the class was newly added.
    fn add_class(&mut self, el: ElementId, class: &str) -> bool;

    /// Returns `true` when the class was present.
    fn remove_class(&mut self, el: ElementId, class: &str) -> bool;

    /// Inline style property (custom properties included), `None` when unset.
    fn style(&self, el: ElementId, property: &str) -> Option<String>;

    /// Returns `false` when `el` is unknown.
    fn set_style(&mut self, el: ElementId, property: &str, value: &str) -> bool;

    /// Border box in document coordinates, `None` when the element is not laid out.
    fn layout_box(&self, el: ElementId) -> Option<Rect>;

    /// Creates a detached element.
    fn create_element(&mut self, tag: &str) -> ElementId;

    /// Appends `child` as last child of `parent`, detaching it from any previous parent.
    fn append_child(&mut self, parent: ElementId, child: ElementId) -> PageResult<()>;

    /// Inserts `child` as first child of `parent`, detaching it from any previous parent.
    fn prepend_child(&mut self, parent: ElementId, child: ElementId) -> PageResult<()>;

    /// Detaches `el` from the tree. Returns `false` if it was not attached.
    fn remove_element(&mut self, el: ElementId) -> bool;

    /// Flips `class`, returning whether it is present afterwards.
    fn toggle_class(&mut self, el: ElementId, class: &str) -> bool {
        if self.has_class(el, class) {
            self.remove_class(el, class);
            false
        } else {
            self.add_class(el, class);
            true
        }
    }

    /// Whether `el` carries attribute `name`.
    fn has_attribute(&self, el: ElementId, name: &str) -> bool {
        self.attribute(el, name).is_some()
    }

    /// Non-empty `id` attribute of `el`.
    fn element_id(&self, el: ElementId) -> Option<String> {
        self.attribute(el, "id").filter(|id| !id.is_empty())
    }

    /// Every connected element matching `selector`, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.elements()
            .into_iter()
            .filter(|&el| selector.matches(self, el))
            .collect()
    }

    /// First connected element matching `selector`.
    fn query(&self, selector: &Selector) -> Option<ElementId> {
        self.elements()
            .into_iter()
            .find(|&el| selector.matches(self, el))
    }

    /// First descendant of `root` (excluding `root`) matching `selector`.
    fn query_within(&self, root: ElementId, selector: &Selector) -> Option<ElementId> {
        self.elements()
            .into_iter()
            .filter(|&el| el != root && self.is_ancestor(root, el))
            .find(|&el| selector.matches(self, el))
    }

    /// Element whose `id` is `id`; `None` for an empty id.
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        if id.is_empty() {
            return None;
        }
        self.elements()
            .into_iter()
            .find(|&el| self.attribute(el, "id").as_deref() == Some(id))
    }

    /// `el` itself or its nearest ancestor matching `selector`.
    fn closest(&self, el: ElementId, selector: &Selector) -> Option<ElementId> {
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            if selector.matches(self, current) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Whether `ancestor` is `el` or one of its ancestors.
    fn is_ancestor(&self, ancestor: ElementId, el: ElementId) -> bool {
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Top edge in document coordinates (0 when not laid out).
    fn offset_top(&self, el: ElementId) -> f64 {
        self.layout_box(el).map_or(0.0, |r| r.y0)
    }

    /// Laid-out height (0 when not laid out).
    fn offset_height(&self, el: ElementId) -> f64 {
        self.layout_box(el).map_or(0.0, |r| r.height())
    }
}
