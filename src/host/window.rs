use crate::foundation::core::{ElementId, Viewport};
use crate::host::frame::FrameToken;

/// Media query answering the platform reduced-motion preference.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// How a programmatic scroll reaches its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    /// Jump directly.
    Instant,
    /// Animate towards the destination.
    Smooth,
}

/// A programmatic vertical scroll.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollRequest {
    /// Destination scroll offset in document coordinates.
    pub top: f64,
    /// Animation mode.
    pub behavior: ScrollBehavior,
}

/// Event families a component can listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Viewport scrolled.
    Scroll,
    /// Viewport resized.
    Resize,
    /// Pointer or keyboard activation.
    Click,
    /// Key pressed.
    KeyDown,
    /// Mouse pointer moved.
    PointerMove,
    /// Touch point moved.
    TouchMove,
}

/// Where a listener is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerTarget {
    /// The window (scroll, resize).
    Window,
    /// The document (pointer tracking).
    Document,
    /// One element.
    Element(ElementId),
}

/// Handle returned by [`Window::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct ListenerId(pub u64);

/// Platform services consumed by the enhancement layer.
///
/// Listener registration is bookkeeping only: the host delivers events to
/// [`crate::PageSession::dispatch`], and a component reacts only while it holds a listener for
/// the event's kind.
pub trait Window {
    /// Current scroll offset and viewport size.
    fn viewport(&self) -> Viewport;

    /// Evaluates a media query; `None` when the platform cannot answer it.
    fn media_matches(&self, query: &str) -> Option<bool>;

    /// Scrolls the page vertically.
    fn scroll_to(&mut self, request: ScrollRequest);

    /// Appends `fragment` (for example `#about`) to session history without navigating.
    fn push_fragment(&mut self, fragment: &str);

    /// Monotonic clock in milliseconds.
    fn now_ms(&self) -> f64;

    /// Registers interest in `kind` events on `target`.
    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId;

    /// Returns `false` for unknown or already removed listeners.
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Requests a callback on the next display frame.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancels a pending frame request.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Listeners owned by one component, detached together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listeners {
    held: Vec<(ListenerId, ListenerTarget, EventKind)>,
}

impl Listeners {
    /// Registers a listener with `window` and keeps its handle.
    pub fn add(&mut self, window: &mut dyn Window, target: ListenerTarget, kind: EventKind) {
        let id = window.add_listener(target, kind);
        self.held.push((id, target, kind));
    }

    /// Removes every held listener from `window`.
    pub fn detach_all(&mut self, window: &mut dyn Window) {
        for (id, _, _) in self.held.drain(..) {
            window.remove_listener(id);
        }
    }

    /// Whether a listener for `kind` is held, on any target.
    pub fn listens_to(&self, kind: EventKind) -> bool {
        self.held.iter().any(|&(_, _, k)| k == kind)
    }

    /// Whether a listener for `kind` on `target` is held.
    pub fn listens_on(&self, target: ListenerTarget, kind: EventKind) -> bool {
        self.held.iter().any(|&(_, t, k)| t == target && k == kind)
    }

    /// Number of held listeners.
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/window.rs"]
mod tests;
