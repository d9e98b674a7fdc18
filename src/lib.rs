//! Scrollglow is the enhancement layer of a static content page.
//!
//! It reveals marked content as it scrolls into view, keeps the navigation entry of the section
//! under the viewport midpoint marked as current, smooth-scrolls same-page anchors below a fixed
//! header, and layers in optional decorations. Everything honours the platform reduced-motion
//! preference.
//!
//! The page is reached only through two narrow traits:
//!
//! - [`Document`] for the element tree
//! - [`Window`] for viewport, media queries, scrolling, history and frame scheduling
//!
//! A host implements both, starts a [`PageSession`] and forwards its events to
//! [`PageSession::dispatch`]. [`SyntheticDocument`] and [`SyntheticWindow`] are in-memory
//! implementations used by tests and by the `scrollglow` command line tool.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod animation;
pub(crate) mod config;
pub(crate) mod dom;
pub(crate) mod effects;
pub(crate) mod foundation;
pub(crate) mod host;
pub(crate) mod motion;
pub(crate) mod nav;
pub(crate) mod observe;
pub(crate) mod reveal;
pub(crate) mod session;

pub use crate::foundation::core::{ElementId, Point, Rect, RootMargin, Vec2, Viewport};
pub use crate::foundation::error::{PageError, PageResult};
pub use crate::foundation::math::Rng64;

pub use crate::animation::ease::Ease;
pub use crate::animation::tween::{SMOOTH_SCROLL_MS, ScrollTween};
pub use crate::config::model::{
    AnchorConfig, EffectsConfig, EnhanceConfig, MenuConfig, NavConfig, RaysConfig, RevealConfig,
    TrailConfig,
};
pub use crate::dom::document::Document;
pub use crate::dom::selector::Selector;
pub use crate::dom::synthetic::{ElementSpec, Mutation, SyntheticDocument};
pub use crate::effects::cursor_trail::CursorTrail;
pub use crate::effects::sun_rays::{INITED_ATTR, RayStyle, SunRays};
pub use crate::host::fixture::PageFixture;
pub use crate::host::frame::{FrameGate, FrameToken};
pub use crate::host::synthetic::SyntheticWindow;
pub use crate::host::window::{
    EventKind, ListenerId, ListenerTarget, Listeners, REDUCED_MOTION_QUERY, ScrollBehavior,
    ScrollRequest, Window,
};
pub use crate::motion::gate::MotionPreference;
pub use crate::nav::anchor::{Activation, AnchorNavigator, Key, resolve_fragment};
pub use crate::nav::menu::MenuToggle;
pub use crate::nav::tracker::{ActiveSectionTracker, GapPolicy, SectionSpan, select_active};
pub use crate::observe::polling::PollingWatcher;
pub use crate::observe::watcher::{
    IntersectionOptions, VisibilityChange, Watcher, intersection_ratio,
};
pub use crate::reveal::engine::RevealEngine;
pub use crate::session::page_session::{EventOutcome, PageEvent, PageSession, SessionFlags};
