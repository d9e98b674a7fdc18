use crate::config::model::AnchorConfig;
use crate::dom::document::Document;
use crate::dom::selector::Selector;
use crate::foundation::core::ElementId;
use crate::foundation::error::PageResult;
use crate::host::window::{
    EventKind, ListenerTarget, Listeners, ScrollBehavior, ScrollRequest, Window,
};

/// Keys the scroll indicator reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// `Enter`.
    Enter,
    /// Space bar.
    Space,
    /// Any other key.
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            _ => Self::Other,
        }
    }

    /// Whether the key activates the scroll indicator.
    pub fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// What the navigator did with a click or key press.
#[derive(Clone, Debug, PartialEq)]
pub enum Activation {
    /// Not aimed at an element the navigator listens on.
    Ignored,
    /// A handled element, but the browser default stays in effect (`#`, unknown fragment).
    PassThrough,
    /// Default prevented without scrolling (indicator key press with no target on the page).
    Suppressed,
    /// Smooth scroll started.
    Scrolled {
        /// Requested scroll offset.
        top: f64,
        /// Fragment appended to history, if any.
        fragment: Option<String>,
    },
}

impl Activation {
    /// Whether the host must suppress the platform default.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Suppressed | Self::Scrolled { .. })
    }
}

/// Smooth in-page navigation that keeps targets clear of the fixed header.
#[derive(Debug)]
pub struct AnchorNavigator {
    anchors: Vec<ElementId>,
    header: Selector,
    extra_gap: f64,
    indicator: Option<ElementId>,
    indicator_target: String,
    indicator_gap: f64,
    listeners: Listeners,
}

impl AnchorNavigator {
    /// Attaches click listeners to every anchor and makes the scroll indicator activatable.
    pub fn start(
        doc: &mut dyn Document,
        window: &mut dyn Window,
        cfg: &AnchorConfig,
    ) -> PageResult<Self> {
        let anchor_sel = Selector::parse(&cfg.anchor_selector)?;
        let indicator_sel = Selector::parse(&cfg.indicator_selector)?;
        let header = Selector::parse(&cfg.header_selector)?;
        let mut listeners = Listeners::default();

        let anchors = doc.query_all(&anchor_sel);
        for &a in &anchors {
            listeners.add(window, ListenerTarget::Element(a), EventKind::Click);
        }

        let indicator = doc.query(&indicator_sel);
        if let Some(ind) = indicator {
            if !doc.has_attribute(ind, "role") {
                doc.set_attribute(ind, "role", "button");
            }
            if !doc.has_attribute(ind, "tabindex") {
                doc.set_attribute(ind, "tabindex", "0");
            }
            listeners.add(window, ListenerTarget::Element(ind), EventKind::Click);
            listeners.add(window, ListenerTarget::Element(ind), EventKind::KeyDown);
        }
        tracing::debug!(
            anchors = anchors.len(),
            indicator = indicator.is_some(),
            "anchor navigator started"
        );

        Ok(Self {
            anchors,
            header,
            extra_gap: cfg.extra_gap,
            indicator,
            indicator_target: cfg.indicator_target.clone(),
            indicator_gap: cfg.indicator_gap,
            listeners,
        })
    }

    /// Height of the fixed header, read at call time.
    pub fn header_height(&self, doc: &dyn Document) -> f64 {
        doc.query(&self.header)
            .map_or(0.0, |nav| doc.offset_height(nav))
    }

    /// Scroll offset that puts `target` just below the header, `gap` pixels lower.
    pub fn scroll_target(&self, doc: &dyn Document, target: ElementId, gap: f64) -> f64 {
        doc.offset_top(target) - self.header_height(doc) - gap
    }

    /// Handles a click on `target` (the innermost clicked element).
    pub fn on_click(
        &self,
        doc: &dyn Document,
        window: &mut dyn Window,
        target: ElementId,
    ) -> Activation {
        if let Some(anchor) = self.anchor_for(doc, target) {
            return self.follow(doc, window, anchor);
        }
        match self.indicator {
            Some(ind)
                if doc.is_ancestor(ind, target)
                    && self
                        .listeners
                        .listens_on(ListenerTarget::Element(ind), EventKind::Click) =>
            {
                self.scroll_to_indicator_target(doc, window)
                    .unwrap_or(Activation::PassThrough)
            }
            _ => Activation::Ignored,
        }
    }

    /// Handles a key press whose event target is `target`.
    pub fn on_key(
        &self,
        doc: &dyn Document,
        window: &mut dyn Window,
        target: ElementId,
        key: Key,
    ) -> Activation {
        let Some(ind) = self.indicator else {
            return Activation::Ignored;
        };
        if !doc.is_ancestor(ind, target)
            || !self
                .listeners
                .listens_on(ListenerTarget::Element(ind), EventKind::KeyDown)
            || !key.activates()
        {
            return Activation::Ignored;
        }
        self.scroll_to_indicator_target(doc, window)
            .unwrap_or(Activation::Suppressed)
    }

    /// Number of anchors with a click listener.
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// The scroll indicator, when the page has one.
    pub fn indicator(&self) -> Option<ElementId> {
        self.indicator
    }

    /// Removes every click and key listener.
    pub fn detach(&mut self, window: &mut dyn Window) {
        self.listeners.detach_all(window);
    }

    fn anchor_for(&self, doc: &dyn Document, target: ElementId) -> Option<ElementId> {
        let mut cursor = Some(target);
        while let Some(el) = cursor {
            if self.anchors.contains(&el)
                && self
                    .listeners
                    .listens_on(ListenerTarget::Element(el), EventKind::Click)
            {
                return Some(el);
            }
            cursor = doc.parent(el);
        }
        None
    }

    fn follow(&self, doc: &dyn Document, window: &mut dyn Window, anchor: ElementId) -> Activation {
        let Some(href) = doc.attribute(anchor, "href") else {
            return Activation::PassThrough;
        };
        let Some(dest) = resolve_fragment(doc, &href) else {
            tracing::trace!(%href, "anchor left to default navigation");
            return Activation::PassThrough;
        };
        let top = self.scroll_target(doc, dest, self.extra_gap);
        window.scroll_to(ScrollRequest {
            top,
            behavior: ScrollBehavior::Smooth,
        });
        window.push_fragment(&href);
        tracing::trace!(%href, top, "anchor scroll");
        Activation::Scrolled {
            top,
            fragment: Some(href),
        }
    }

    fn scroll_to_indicator_target(
        &self,
        doc: &dyn Document,
        window: &mut dyn Window,
    ) -> Option<Activation> {
        let dest = resolve_fragment(doc, &self.indicator_target)?;
        let top = self.scroll_target(doc, dest, self.indicator_gap);
        window.scroll_to(ScrollRequest {
            top,
            behavior: ScrollBehavior::Smooth,
        });
        Some(Activation::Scrolled {
            top,
            fragment: None,
        })
    }
}

/// Element named by `#id`; `None` for a bare `#` or an unknown id.
pub fn resolve_fragment(doc: &dyn Document, href: &str) -> Option<ElementId> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        return None;
    }
    doc.element_by_id(id)
}

#[cfg(test)]
#[path = "../../tests/unit/nav/anchor.rs"]
mod tests;
