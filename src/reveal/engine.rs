use crate::config::model::RevealConfig;
use crate::dom::document::Document;
use crate::dom::selector::Selector;
use crate::foundation::core::ElementId;
use crate::foundation::error::PageResult;
use crate::host::window::{EventKind, ListenerTarget, Listeners, Window};
use crate::motion::gate::MotionPreference;
use crate::observe::polling::PollingWatcher;
use crate::observe::watcher::{IntersectionOptions, Watcher};

/// One watcher and the marker class it applies.
struct Channel {
    marker: String,
    watcher: Box<dyn Watcher>,
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("marker", &self.marker)
            .field("observed", &self.watcher.observed_count())
            .finish()
    }
}

/// Scroll-triggered reveals for single elements and staggered groups.
///
/// Both channels share one [`IntersectionOptions`] policy. An element is marked at most once and
/// is unobserved as soon as it is marked.
#[derive(Debug)]
pub struct RevealEngine {
    channels: Vec<Channel>,
    listeners: Listeners,
    revealed: Vec<ElementId>,
}

impl RevealEngine {
    /// Starts with the in-crate [`PollingWatcher`].
    pub fn start(
        doc: &mut dyn Document,
        window: &mut dyn Window,
        cfg: &RevealConfig,
        motion: MotionPreference,
    ) -> PageResult<Self> {
        Self::start_with(doc, window, cfg, motion, |opts| {
            Box::new(PollingWatcher::new(opts))
        })
    }

    /// Starts with watchers built by `make_watcher`, one per channel.
    ///
    /// Under reduced motion every eligible element is marked immediately and no watcher is
    /// created.
    pub fn start_with(
        doc: &mut dyn Document,
        window: &mut dyn Window,
        cfg: &RevealConfig,
        motion: MotionPreference,
        mut make_watcher: impl FnMut(IntersectionOptions) -> Box<dyn Watcher>,
    ) -> PageResult<Self> {
        let plan = [
            (
                Selector::parse(&cfg.single_selector)?,
                cfg.single_class.as_str(),
            ),
            (
                Selector::parse(&cfg.stagger_selector)?,
                cfg.stagger_class.as_str(),
            ),
        ];
        let mut engine = Self {
            channels: Vec::new(),
            listeners: Listeners::default(),
            revealed: Vec::new(),
        };

        if !motion.allows_motion() {
            for (selector, marker) in &plan {
                for el in doc.query_all(selector) {
                    if doc.add_class(el, marker) {
                        engine.revealed.push(el);
                    }
                }
            }
            tracing::debug!(
                revealed = engine.revealed.len(),
                "reduced motion: content revealed without watchers"
            );
            return Ok(engine);
        }

        let options = cfg.options()?;
        for (selector, marker) in &plan {
            let mut watcher = make_watcher(options);
            for el in doc.query_all(selector) {
                if !doc.has_class(el, marker) {
                    watcher.observe(el);
                }
            }
            tracing::debug!(
                selector = %selector,
                observed = watcher.observed_count(),
                "reveal watcher started"
            );
            engine.channels.push(Channel {
                marker: marker.to_string(),
                watcher,
            });
        }

        if engine.is_watching() {
            engine
                .listeners
                .add(window, ListenerTarget::Window, EventKind::Scroll);
            engine
                .listeners
                .add(window, ListenerTarget::Window, EventKind::Resize);
            engine.poll(doc, window);
        }
        Ok(engine)
    }

    /// Whether `kind` on the window should trigger [`RevealEngine::poll`].
    pub fn handles(&self, kind: EventKind) -> bool {
        self.listeners.listens_on(ListenerTarget::Window, kind)
    }

    /// Applies pending visibility transitions; returns how many elements were revealed.
    ///
    /// Listeners are released once nothing is left to watch.
    pub fn poll(&mut self, doc: &mut dyn Document, window: &mut dyn Window) -> usize {
        let viewport = window.viewport();
        let mut count = 0;
        for channel in &mut self.channels {
            for change in channel.watcher.poll(&*doc, viewport) {
                if !change.visible {
                    continue;
                }
                doc.add_class(change.target, &channel.marker);
                channel.watcher.unobserve(change.target);
                self.revealed.push(change.target);
                count += 1;
                tracing::trace!(
                    target = change.target.0,
                    ratio = change.ratio,
                    marker = %channel.marker,
                    "revealed"
                );
            }
        }
        if !self.is_watching() && !self.listeners.is_empty() {
            tracing::debug!("all reveal targets shown; releasing listeners");
            self.listeners.detach_all(window);
        }
        count
    }

    /// Whether any element still waits for its reveal.
    pub fn is_watching(&self) -> bool {
        self.pending() > 0
    }

    /// Elements still waiting for their reveal.
    pub fn pending(&self) -> usize {
        self.channels
            .iter()
            .map(|c| c.watcher.observed_count())
            .sum()
    }

    /// Elements marked by this engine, in reveal order.
    pub fn revealed(&self) -> &[ElementId] {
        &self.revealed
    }

    /// Stops every watcher and detaches listeners; revealed markers stay.
    pub fn disconnect(&mut self, window: &mut dyn Window) {
        for channel in &mut self.channels {
            channel.watcher.disconnect();
        }
        self.listeners.detach_all(window);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/engine.rs"]
mod tests;
