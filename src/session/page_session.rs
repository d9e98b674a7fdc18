use crate::config::model::EnhanceConfig;
use crate::dom::document::Document;
use crate::effects::cursor_trail::CursorTrail;
use crate::effects::sun_rays::SunRays;
use crate::foundation::core::{ElementId, Point};
use crate::foundation::error::{PageError, PageResult};
use crate::host::frame::FrameToken;
use crate::host::window::{EventKind, Window};
use crate::motion::gate::MotionPreference;
use crate::nav::anchor::{AnchorNavigator, Key};
use crate::nav::menu::MenuToggle;
use crate::nav::tracker::ActiveSectionTracker;
use crate::reveal::engine::RevealEngine;

/// Host event delivered to [`PageSession::dispatch`].
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    /// The window scrolled.
    Scroll,
    /// The window was resized.
    Resize,
    /// A frame requested through [`Window::request_frame`] is due.
    Frame(FrameToken),
    /// Click on an element.
    Click {
        /// Innermost clicked element.
        target: ElementId,
    },
    /// Key press on an element.
    KeyDown {
        /// Focused element.
        target: ElementId,
        /// DOM `KeyboardEvent.key` value.
        key: String,
    },
    /// Pointer moved over the document.
    PointerMove {
        /// Pointer position in page coordinates.
        at: Point,
    },
    /// Touch move over the document.
    TouchMove {
        /// First touch point, if any.
        touch: Option<Point>,
    },
    /// The host clock advanced; time-based cleanup may run.
    Timer,
}

/// What the host must do after a dispatched event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Suppress the platform's default action.
    pub default_prevented: bool,
}

/// One-shot initialization guards of the decorative effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SessionFlags {
    /// Cursor trail start was attempted.
    pub cursor_trail: bool,
    /// Sun rays start was attempted.
    pub sun_rays: bool,
}

/// All enhancement components of one page, started together and torn down together.
#[derive(Debug)]
pub struct PageSession {
    config: EnhanceConfig,
    motion: MotionPreference,
    reveal: RevealEngine,
    tracker: Option<ActiveSectionTracker>,
    anchors: AnchorNavigator,
    menu: Option<MenuToggle>,
    trail: Option<CursorTrail>,
    rays: Option<SunRays>,
    flags: SessionFlags,
    closed: bool,
}

impl PageSession {
    /// Evaluates the motion preference once and starts the core components.
    ///
    /// Decorations are not started here; see [`PageSession::init_decorations`].
    #[tracing::instrument(skip_all)]
    pub fn start(
        doc: &mut dyn Document,
        window: &mut dyn Window,
        config: EnhanceConfig,
    ) -> PageResult<Self> {
        config.validate()?;
        let motion = MotionPreference::detect(window);
        tracing::debug!(?motion, "motion preference");

        let reveal = RevealEngine::start(doc, window, &config.reveal, motion)?;
        let tracker = ActiveSectionTracker::start(doc, window, &config.nav)?;
        let anchors = AnchorNavigator::start(doc, window, &config.anchors)?;
        let menu = MenuToggle::start(doc, window, &config.menu)?;

        Ok(Self {
            config,
            motion,
            reveal,
            tracker,
            anchors,
            menu,
            trail: None,
            rays: None,
            flags: SessionFlags::default(),
            closed: false,
        })
    }

    /// Starts the cursor trail and sun rays once per session.
    ///
    /// Skipped under reduced motion. A failing effect is logged and left disabled; the core
    /// components are unaffected.
    pub fn init_decorations(&mut self, doc: &mut dyn Document, window: &mut dyn Window) {
        if self.closed {
            return;
        }
        if !self.motion.allows_motion() {
            tracing::debug!("decorations skipped: reduced motion");
            return;
        }

        if self.flags.cursor_trail {
            tracing::debug!("cursor trail already initialized");
        } else {
            self.flags.cursor_trail = true;
            let effects = &self.config.effects;
            match CursorTrail::start(window, &effects.trail, effects.seed) {
                Ok(trail) => self.trail = Some(trail),
                Err(err) => tracing::warn!(error = %err, "cursor trail init failed"),
            }
        }

        if self.flags.sun_rays {
            tracing::debug!("sun rays already initialized");
        } else {
            self.flags.sun_rays = true;
            let effects = &self.config.effects;
            match SunRays::start(doc, window, &effects.rays, effects.seed.rotate_left(32)) {
                Ok(rays) => self.rays = Some(rays),
                Err(err) => tracing::warn!(error = %err, "sun rays init failed"),
            }
        }
    }

    /// Routes one host event to every component holding a listener for it.
    pub fn dispatch(
        &mut self,
        doc: &mut dyn Document,
        window: &mut dyn Window,
        event: PageEvent,
    ) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        if self.closed {
            return outcome;
        }
        match event {
            PageEvent::Scroll => self.on_viewport_change(doc, window, EventKind::Scroll),
            PageEvent::Resize => self.on_viewport_change(doc, window, EventKind::Resize),
            PageEvent::Frame(token) => {
                if let Some(tracker) = &mut self.tracker {
                    tracker.on_frame(token, doc, window);
                }
                if let Some(trail) = &mut self.trail {
                    trail.on_frame(token, doc, window.now_ms());
                }
            }
            PageEvent::Click { target } => {
                outcome.default_prevented = self
                    .anchors
                    .on_click(doc, window, target)
                    .prevents_default();
                if let Some(menu) = &self.menu {
                    menu.on_click(doc, target);
                }
            }
            PageEvent::KeyDown { target, key } => {
                outcome.default_prevented = self
                    .anchors
                    .on_key(doc, window, target, Key::from_dom_key(&key))
                    .prevents_default();
            }
            PageEvent::PointerMove { at } => {
                let failed = match &mut self.trail {
                    Some(trail) => trail.on_pointer(doc, window, at).err(),
                    None => None,
                };
                self.check_trail(doc, window, failed);
            }
            PageEvent::TouchMove { touch } => {
                let failed = match &mut self.trail {
                    Some(trail) => trail.on_touch(doc, window, touch).err(),
                    None => None,
                };
                self.check_trail(doc, window, failed);
            }
            PageEvent::Timer => {
                if let Some(trail) = &mut self.trail {
                    trail.expire(doc, window.now_ms());
                }
            }
        }
        outcome
    }

    /// Manually spawns rays into the first element matching `selector`.
    pub fn spawn_rays_for(
        &mut self,
        doc: &mut dyn Document,
        selector: &str,
        count: usize,
    ) -> PageResult<usize> {
        match &mut self.rays {
            Some(rays) => rays.spawn_rays_for(doc, selector, count),
            None => Ok(0),
        }
    }

    /// Detaches every listener and watcher of the session and removes live trail nodes.
    ///
    /// Calling it again is a no-op.
    pub fn cleanup(&mut self, doc: &mut dyn Document, window: &mut dyn Window) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.reveal.disconnect(window);
        if let Some(tracker) = &mut self.tracker {
            tracker.teardown(window);
        }
        self.anchors.detach(window);
        if let Some(menu) = &mut self.menu {
            menu.teardown(window);
        }
        self.disable_trail(doc, window);
        self.disable_rays(window);
        tracing::debug!("page session cleaned up");
    }

    /// Motion preference evaluated at start.
    pub fn motion(&self) -> MotionPreference {
        self.motion
    }

    /// Which decorations were started.
    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    /// Configuration the session was started with.
    pub fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    /// Id of the section whose navigation entry is active.
    pub fn active_section(&self) -> Option<&str> {
        self.tracker.as_ref().and_then(|t| t.active())
    }

    /// Scroll reveal engine.
    pub fn reveal(&self) -> &RevealEngine {
        &self.reveal
    }

    /// `None` when the page has no trackable sections.
    pub fn tracker(&self) -> Option<&ActiveSectionTracker> {
        self.tracker.as_ref()
    }

    /// `None` when the page has no menu toggle.
    pub fn menu(&self) -> Option<&MenuToggle> {
        self.menu.as_ref()
    }

    /// `None` until decorations start, and after the trail failed or was cleaned up.
    pub fn trail(&self) -> Option<&CursorTrail> {
        self.trail.as_ref()
    }

    /// `None` until decorations start, and after the rays failed or were cleaned up.
    pub fn rays(&self) -> Option<&SunRays> {
        self.rays.as_ref()
    }

    /// Whether [`PageSession::cleanup`] ran.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn on_viewport_change(
        &mut self,
        doc: &mut dyn Document,
        window: &mut dyn Window,
        kind: EventKind,
    ) {
        if self.reveal.handles(kind) {
            self.reveal.poll(doc, window);
        }
        if let Some(tracker) = &mut self.tracker
            && tracker.handles(kind)
        {
            tracker.request_update(window);
        }
        let failed = match &mut self.rays {
            Some(rays) if rays.handles(kind) => rays.poll(doc, window).err(),
            _ => None,
        };
        if let Some(err) = failed {
            tracing::warn!(error = %err, "sun rays failed; disabling");
            self.disable_rays(window);
        }
    }

    fn check_trail(
        &mut self,
        doc: &mut dyn Document,
        window: &mut dyn Window,
        failed: Option<PageError>,
    ) {
        if let Some(err) = failed {
            tracing::warn!(error = %err, "cursor trail failed; disabling");
            self.disable_trail(doc, window);
        }
    }

    fn disable_trail(&mut self, doc: &mut dyn Document, window: &mut dyn Window) {
        if let Some(mut trail) = self.trail.take() {
            trail.stop(doc, window);
        }
    }

    fn disable_rays(&mut self, window: &mut dyn Window) {
        if let Some(mut rays) = self.rays.take() {
            rays.stop(window);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/page_session.rs"]
mod tests;
