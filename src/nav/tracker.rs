use crate::config::model::NavConfig;
use crate::dom::document::Document;
use crate::dom::selector::Selector;
use crate::foundation::core::{ElementId, Viewport};
use crate::foundation::error::PageResult;
use crate::host::frame::{FrameGate, FrameToken};
use crate::host::window::{EventKind, ListenerTarget, Listeners, Window};

/// Which section stays active when the viewport midpoint is not inside any section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Keep the last active section; the first section until one has matched.
    #[default]
    RetainPrevious,
    /// Always fall back to the first section.
    FirstSection,
}

/// Vertical extent of one section, read from the current layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionSpan {
    /// Section `id`.
    pub id: String,
    /// Top edge in document coordinates.
    pub top: f64,
    /// Laid-out height.
    pub height: f64,
}

impl SectionSpan {
    /// Inclusive on both edges.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y <= self.top + self.height
    }
}

/// First span (in document order) containing `midpoint`.
pub fn select_active(spans: &[SectionSpan], midpoint: f64) -> Option<&str> {
    spans
        .iter()
        .find(|s| s.contains(midpoint))
        .map(|s| s.id.as_str())
}

/// Marks the navigation entry of the section under the viewport midpoint.
///
/// Scroll and resize requests are coalesced through a [`FrameGate`]; the recomputation runs when
/// the frame fires and reads geometry at that moment.
#[derive(Debug)]
pub struct ActiveSectionTracker {
    links: Vec<ElementId>,
    sections: Vec<ElementId>,
    active_class: String,
    policy: GapPolicy,
    active: Option<String>,
    gate: FrameGate,
    listeners: Listeners,
}

impl ActiveSectionTracker {
    /// Returns `None` (and registers nothing) when the page has no nav entries or no sections.
    pub fn start(
        doc: &mut dyn Document,
        window: &mut dyn Window,
        cfg: &NavConfig,
    ) -> PageResult<Option<Self>> {
        let link_sel = Selector::parse(&cfg.link_selector)?;
        let section_sel = Selector::parse(&cfg.section_selector)?;
        let links = doc.query_all(&link_sel);
        let sections = doc.query_all(&section_sel);
        if links.is_empty() || sections.is_empty() {
            tracing::debug!(
                links = links.len(),
                sections = sections.len(),
                "active-section tracker inert"
            );
            return Ok(None);
        }

        let mut tracker = Self {
            links,
            sections,
            active_class: cfg.active_class.clone(),
            policy: cfg.gap_policy,
            active: None,
            gate: FrameGate::default(),
            listeners: Listeners::default(),
        };
        tracker.update(doc, window.viewport());
        tracker
            .listeners
            .add(window, ListenerTarget::Window, EventKind::Scroll);
        tracker
            .listeners
            .add(window, ListenerTarget::Window, EventKind::Resize);
        Ok(Some(tracker))
    }

    /// Whether `kind` on the window should schedule an update.
    pub fn handles(&self, kind: EventKind) -> bool {
        self.listeners.listens_on(ListenerTarget::Window, kind)
    }

    /// Schedules a recomputation; returns `true` when a new frame was requested.
    pub fn request_update(&mut self, window: &mut dyn Window) -> bool {
        if self.listeners.is_empty() {
            return false;
        }
        self.gate.request(window)
    }

    /// Runs the pending recomputation if `token` belongs to this tracker.
    pub fn on_frame(
        &mut self,
        token: FrameToken,
        doc: &mut dyn Document,
        window: &dyn Window,
    ) -> bool {
        if !self.gate.fire(token) {
            return false;
        }
        self.update(doc, window.viewport());
        true
    }

    /// Current spans of the tracked sections that have an id and are still attached.
    pub fn spans(&self, doc: &dyn Document) -> Vec<SectionSpan> {
        self.sections
            .iter()
            .filter(|&&el| doc.is_connected(el))
            .filter_map(|&el| {
                Some(SectionSpan {
                    id: doc.element_id(el)?,
                    top: doc.offset_top(el),
                    height: doc.offset_height(el),
                })
            })
            .collect()
    }

    /// Recomputes the active section and rewrites every nav entry.
    pub fn update(&mut self, doc: &mut dyn Document, viewport: Viewport) -> Option<&str> {
        let spans = self.spans(doc);
        let midpoint = viewport.midpoint_y();
        let first = spans.first().map(|s| s.id.clone());
        let next = match select_active(&spans, midpoint) {
            Some(id) => Some(id.to_string()),
            None => match self.policy {
                GapPolicy::RetainPrevious => self
                    .active
                    .take()
                    .filter(|prev| spans.iter().any(|s| &s.id == prev))
                    .or(first),
                GapPolicy::FirstSection => first,
            },
        };
        tracing::trace!(midpoint, active = ?next, "active section recomputed");

        let wanted = next.as_ref().map(|id| format!("#{id}"));
        let mut marked = false;
        for &link in &self.links {
            let is_match = !marked
                && wanted.is_some()
                && doc.attribute(link, "href").as_deref() == wanted.as_deref();
            if is_match {
                marked = true;
                doc.add_class(link, &self.active_class);
                doc.set_attribute(link, "aria-current", "page");
            } else {
                doc.remove_class(link, &self.active_class);
                doc.remove_attribute(link, "aria-current");
            }
        }
        self.active = next;
        self.active.as_deref()
    }

    /// Id of the current section, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Frame scheduled for the next recomputation.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.gate.pending()
    }

    /// Whether the scroll and resize listeners are attached.
    pub fn is_listening(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Detaches scroll/resize listeners and cancels a pending frame.
    pub fn teardown(&mut self, window: &mut dyn Window) {
        self.listeners.detach_all(window);
        self.gate.cancel(window);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nav/tracker.rs"]
mod tests;
