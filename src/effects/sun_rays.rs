use crate::config::model::RaysConfig;
use crate::dom::document::Document;
use crate::dom::selector::Selector;
use crate::foundation::core::ElementId;
use crate::foundation::error::{PageError, PageResult};
use crate::foundation::math::{Rng64, lerp};
use crate::host::window::{EventKind, ListenerTarget, Listeners, Window};
use crate::observe::polling::PollingWatcher;
use crate::observe::watcher::Watcher;

/// Marks a wrapper that already received its rays.
pub const INITED_ATTR: &str = "data-inited";

/// Randomized style of one ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayStyle {
    /// Horizontal position, percent.
    pub left: f64,
    /// Width, percent.
    pub width: f64,
    /// Tilt, degrees.
    pub angle: f64,
    /// Horizontal drift, pixels (either direction).
    pub drift: f64,
    /// Opacity at the start of a cycle.
    pub start_opacity: f64,
    /// Opacity at the end of a cycle; never above `start_opacity`.
    pub end_opacity: f64,
    /// Animation cycle, seconds.
    pub duration: f64,
}

impl RayStyle {
    /// Draws one style from `rng`.
    pub fn sample(rng: &mut Rng64) -> Self {
        let left = rng.span(5.0, 90.0);
        let width = 36.0 * rng.span(0.7, 1.0);
        let angle = lerp(-30.0, 30.0, rng.next_f64_01());
        let drift = rng.span(20.0, 120.0);
        let drift = if rng.coin() { -drift } else { drift };
        let duration = rng.span(12.0, 28.0);
        let start_opacity = rng.span(0.04, 0.08);
        let end_opacity = (start_opacity - rng.span(0.01, 0.03)).max(0.01);
        Self {
            left,
            width,
            angle,
            drift,
            start_opacity,
            end_opacity,
            duration,
        }
    }

    fn apply(&self, doc: &mut dyn Document, ray: ElementId) {
        doc.set_style(ray, "left", &format!("{}%", self.left));
        doc.set_style(ray, "width", &format!("{}%", self.width));
        doc.set_style(ray, "--angle", &format!("{}deg", self.angle));
        doc.set_style(ray, "--drift", &format!("{}px", self.drift));
        doc.set_style(ray, "--start-opacity", &self.start_opacity.to_string());
        doc.set_style(ray, "--end-opacity", &self.end_opacity.to_string());
        doc.set_style(ray, "animation-duration", &format!("{}s", self.duration));
        doc.set_style(ray, "opacity", &self.start_opacity.to_string());
    }
}

/// Ambient light rays injected into page sections as they scroll into view.
#[derive(Debug)]
pub struct SunRays {
    cfg: RaysConfig,
    container: Selector,
    wrapper: Selector,
    rng: Rng64,
    watcher: PollingWatcher,
    listeners: Listeners,
}

impl SunRays {
    /// Watches every target except the excluded one and decorates targets already in view.
    pub fn start(
        doc: &mut dyn Document,
        window: &mut dyn Window,
        cfg: &RaysConfig,
        seed: u64,
    ) -> PageResult<Self> {
        let targets_sel = Selector::parse(&cfg.target_selector)?;
        let mut rays = Self {
            cfg: cfg.clone(),
            container: Selector::parse(&cfg.container_selector)?,
            wrapper: Selector::parse(&format!(".{}", cfg.wrapper_class))?,
            rng: Rng64::new(seed),
            watcher: PollingWatcher::new(cfg.options()?),
            listeners: Listeners::default(),
        };

        let targets: Vec<ElementId> = doc
            .query_all(&targets_sel)
            .into_iter()
            .filter(|&t| doc.element_id(t).as_deref() != Some(cfg.exclude_id.as_str()))
            .collect();
        if targets.is_empty() {
            tracing::debug!("sun rays: no targets");
            return Ok(rays);
        }
        // In-view targets are decorated before any listener attaches; an error
        // here leaves the window untouched.
        let view = window.viewport();
        let (top, bottom) = (view.scroll_y, view.scroll_y + view.height);
        for &t in &targets {
            let Some(rect) = doc.layout_box(t) else {
                continue;
            };
            if rect.y0 < bottom && rect.y1 > top {
                let wrapper = rays.ensure_wrapper(doc, t)?;
                rays.create_rays_in(doc, wrapper, rays.cfg.count)?;
            }
        }

        for &t in &targets {
            rays.watcher.observe(t);
        }
        rays.listeners
            .add(window, ListenerTarget::Window, EventKind::Scroll);
        rays.listeners
            .add(window, ListenerTarget::Window, EventKind::Resize);
        tracing::debug!(targets = targets.len(), "sun rays: observing");
        Ok(rays)
    }

    /// Whether `kind` on the window should trigger [`SunRays::poll`].
    pub fn handles(&self, kind: EventKind) -> bool {
        self.listeners.listens_on(ListenerTarget::Window, kind)
    }

    /// Decorates targets that became visible; returns the number of rays created.
    pub fn poll(&mut self, doc: &mut dyn Document, window: &mut dyn Window) -> PageResult<usize> {
        let mut created = 0;
        for change in self.watcher.poll(&*doc, window.viewport()) {
            if !change.visible {
                continue;
            }
            let wrapper = self.ensure_wrapper(doc, change.target)?;
            created += self.create_rays_in(doc, wrapper, self.cfg.count)?;
            self.watcher.unobserve(change.target);
        }
        if self.watcher.observed_count() == 0 {
            self.listeners.detach_all(window);
        }
        Ok(created)
    }

    /// The rays wrapper of `section`, created as first child of its container when missing.
    pub fn ensure_wrapper(
        &self,
        doc: &mut dyn Document,
        section: ElementId,
    ) -> PageResult<ElementId> {
        let container = doc
            .query_within(section, &self.container)
            .unwrap_or(section);
        if let Some(existing) = doc.query_within(container, &self.wrapper) {
            return Ok(existing);
        }
        let wrapper = doc.create_element("div");
        doc.add_class(wrapper, &self.cfg.wrapper_class);
        doc.set_attribute(wrapper, "aria-hidden", "true");
        doc.prepend_child(container, wrapper)?;
        Ok(wrapper)
    }

    /// Appends `count` rays to `wrapper` unless it was already initialized.
    pub fn create_rays_in(
        &mut self,
        doc: &mut dyn Document,
        wrapper: ElementId,
        count: usize,
    ) -> PageResult<usize> {
        if !doc.is_connected(wrapper) {
            return Err(PageError::effect("sun rays: wrapper is not attached"));
        }
        if doc.has_attribute(wrapper, INITED_ATTR) {
            tracing::trace!(wrapper = wrapper.0, "sun rays: wrapper already initialized");
            return Ok(0);
        }
        doc.set_attribute(wrapper, INITED_ATTR, "1");
        for _ in 0..count {
            let ray = doc.create_element("div");
            doc.add_class(ray, &self.cfg.ray_class);
            RayStyle::sample(&mut self.rng).apply(doc, ray);
            doc.append_child(wrapper, ray)?;
        }
        tracing::trace!(wrapper = wrapper.0, count, "sun rays: created");
        Ok(count)
    }

    /// Spawns rays into the wrapper of the first element matching `selector`.
    pub fn spawn_rays_for(
        &mut self,
        doc: &mut dyn Document,
        selector: &str,
        count: usize,
    ) -> PageResult<usize> {
        let sel = Selector::parse(selector)?;
        let Some(el) = doc.query(&sel) else {
            tracing::debug!(selector, "sun rays: selector not found");
            return Ok(0);
        };
        let wrapper = self.ensure_wrapper(doc, el)?;
        self.create_rays_in(doc, wrapper, count)
    }

    /// Targets still waiting for their rays.
    pub fn pending(&self) -> usize {
        self.watcher.observed_count()
    }

    /// Stops watching and detaches listeners; existing rays stay.
    pub fn stop(&mut self, window: &mut dyn Window) {
        self.watcher.disconnect();
        self.listeners.detach_all(window);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/sun_rays.rs"]
mod tests;
