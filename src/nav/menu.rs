use crate::config::model::MenuConfig;
use crate::dom::document::Document;
use crate::dom::selector::Selector;
use crate::foundation::core::ElementId;
use crate::foundation::error::PageResult;
use crate::host::window::{EventKind, ListenerTarget, Listeners, Window};

/// Mobile navigation toggle.
///
/// The open state lives in the link list's class; `aria-expanded` on the toggle mirrors it.
#[derive(Debug)]
pub struct MenuToggle {
    toggle: ElementId,
    links: ElementId,
    open_class: String,
    listeners: Listeners,
}

impl MenuToggle {
    /// Returns `None` unless both the toggle and the link list exist.
    pub fn start(
        doc: &dyn Document,
        window: &mut dyn Window,
        cfg: &MenuConfig,
    ) -> PageResult<Option<Self>> {
        let toggle = doc.query(&Selector::parse(&cfg.toggle_selector)?);
        let links = doc.query(&Selector::parse(&cfg.links_selector)?);
        let (Some(toggle), Some(links)) = (toggle, links) else {
            tracing::debug!("menu toggle inert");
            return Ok(None);
        };
        let mut listeners = Listeners::default();
        listeners.add(window, ListenerTarget::Element(toggle), EventKind::Click);
        listeners.add(window, ListenerTarget::Element(links), EventKind::Click);
        Ok(Some(Self {
            toggle,
            links,
            open_class: cfg.open_class.clone(),
            listeners,
        }))
    }

    /// Returns `true` when the click changed or confirmed the menu state.
    pub fn on_click(&self, doc: &mut dyn Document, target: ElementId) -> bool {
        let on = |el: ElementId| {
            self.listeners
                .listens_on(ListenerTarget::Element(el), EventKind::Click)
        };
        if on(self.toggle) && doc.is_ancestor(self.toggle, target) {
            let open = doc.toggle_class(self.links, &self.open_class);
            doc.set_attribute(self.toggle, "aria-expanded", bool_attr(open));
            tracing::trace!(open, "menu toggled");
            return true;
        }
        if on(self.links) && doc.is_ancestor(self.links, target) && doc.tag_name(target) == Some("a")
        {
            doc.remove_class(self.links, &self.open_class);
            doc.set_attribute(self.toggle, "aria-expanded", "false");
            return true;
        }
        false
    }

    /// Whether the link list carries the open class.
    pub fn is_open(&self, doc: &dyn Document) -> bool {
        doc.has_class(self.links, &self.open_class)
    }

    /// Detaches the click listeners; the menu state is left as is.
    pub fn teardown(&mut self, window: &mut dyn Window) {
        self.listeners.detach_all(window);
    }
}

fn bool_attr(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}

#[cfg(test)]
#[path = "../../tests/unit/nav/menu.rs"]
mod tests;
