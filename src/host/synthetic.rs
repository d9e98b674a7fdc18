use std::collections::BTreeMap;

use crate::animation::tween::ScrollTween;
use crate::foundation::core::Viewport;
use crate::host::frame::FrameToken;
use crate::host::window::{
    EventKind, ListenerId, ListenerTarget, REDUCED_MOTION_QUERY, ScrollBehavior, ScrollRequest,
    Window,
};

/// In-memory [`Window`] with a manual clock.
///
/// Smooth scrolls are animated with a [`ScrollTween`] that advances when the clock does;
/// frame requests queue up until the host drains them with [`SyntheticWindow::take_frames`].
#[derive(Clone, Debug)]
pub struct SyntheticWindow {
    viewport: Viewport,
    reduced_motion: Option<bool>,
    clock_ms: f64,
    history: Vec<String>,
    scroll_requests: Vec<ScrollRequest>,
    listeners: BTreeMap<ListenerId, (ListenerTarget, EventKind)>,
    next_listener: u64,
    frames: Vec<FrameToken>,
    next_frame: u64,
    tween: Option<ScrollTween>,
}

impl SyntheticWindow {
    /// A window that answers the reduced-motion query with "no preference".
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            reduced_motion: Some(false),
            clock_ms: 0.0,
            history: Vec::new(),
            scroll_requests: Vec::new(),
            listeners: BTreeMap::new(),
            next_listener: 1,
            frames: Vec::new(),
            next_frame: 1,
            tween: None,
        }
    }

    /// `None` simulates a platform without media query support.
    pub fn with_reduced_motion(mut self, reduced_motion: Option<bool>) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    /// Jumps to `scroll_y`, cancelling any running smooth scroll.
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.tween = None;
        self.viewport.scroll_y = scroll_y.max(0.0);
    }

    /// Changes the viewport size; negative sizes clamp to zero.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width.max(0.0);
        self.viewport.height = height.max(0.0);
    }

    /// Advances the clock; returns `true` if a smooth scroll moved the viewport.
    pub fn advance(&mut self, ms: f64) -> bool {
        self.clock_ms += ms.max(0.0);
        let Some(tween) = self.tween else {
            return false;
        };
        let before = self.viewport.scroll_y;
        self.viewport.scroll_y = tween.position_at(self.clock_ms);
        if tween.is_finished(self.clock_ms) {
            self.tween = None;
        }
        self.viewport.scroll_y != before
    }

    /// Whether a smooth scroll is still running.
    pub fn is_scrolling(&self) -> bool {
        self.tween.is_some()
    }

    /// Drains pending frame requests in request order.
    pub fn take_frames(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.frames)
    }

    /// Frame requests not yet taken or cancelled.
    pub fn pending_frames(&self) -> &[FrameToken] {
        &self.frames
    }

    /// Total frame requests made so far (cancelled ones included).
    pub fn frames_requested(&self) -> u64 {
        self.next_frame - 1
    }

    /// Fragments pushed through [`Window::push_fragment`].
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Every [`Window::scroll_to`] call in order.
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    /// Listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Attached listeners for `kind`, any target.
    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.listeners.values().filter(|&&(_, k)| k == kind).count()
    }

    /// Whether a listener for `kind` on `target` is attached.
    pub fn has_listener(&self, target: ListenerTarget, kind: EventKind) -> bool {
        self.listeners
            .values()
            .any(|&(t, k)| t == target && k == kind)
    }
}

impl Window for SyntheticWindow {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn media_matches(&self, query: &str) -> Option<bool> {
        if query.trim() == REDUCED_MOTION_QUERY {
            self.reduced_motion
        } else {
            None
        }
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        self.scroll_requests.push(request);
        let top = request.top.max(0.0);
        match request.behavior {
            ScrollBehavior::Instant => self.set_scroll_y(top),
            ScrollBehavior::Smooth => {
                self.tween = Some(ScrollTween::new(
                    self.viewport.scroll_y,
                    top,
                    self.clock_ms,
                ));
            }
        }
    }

    fn push_fragment(&mut self, fragment: &str) {
        self.history.push(fragment.to_string());
    }

    fn now_ms(&self) -> f64 {
        self.clock_ms
    }

    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, (target, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_frame);
        self.next_frame += 1;
        self.frames.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.frames.retain(|&t| t != token);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/synthetic.rs"]
mod tests;
