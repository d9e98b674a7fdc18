use crate::config::model::TrailConfig;
use crate::dom::document::Document;
use crate::foundation::core::{ElementId, Point};
use crate::foundation::error::PageResult;
use crate::foundation::math::Rng64;
use crate::host::frame::{FrameGate, FrameToken};
use crate::host::window::{EventKind, ListenerTarget, Listeners, Window};

#[derive(Clone, Copy, Debug)]
struct TrailNode {
    el: ElementId,
    born_ms: f64,
    scale: f64,
    faded: bool,
}

/// Short-lived dots following the pointer.
#[derive(Debug)]
pub struct CursorTrail {
    cfg: TrailConfig,
    rng: Rng64,
    last_spawn_ms: Option<f64>,
    nodes: Vec<TrailNode>,
    gate: FrameGate,
    listeners: Listeners,
}

impl CursorTrail {
    /// Registers the pointer and touch listeners on the document.
    pub fn start(window: &mut dyn Window, cfg: &TrailConfig, seed: u64) -> PageResult<Self> {
        cfg.validate()?;
        let mut listeners = Listeners::default();
        listeners.add(window, ListenerTarget::Document, EventKind::PointerMove);
        listeners.add(window, ListenerTarget::Document, EventKind::TouchMove);
        tracing::debug!(throttle_ms = cfg.throttle_ms, "cursor trail started");
        Ok(Self {
            cfg: cfg.clone(),
            rng: Rng64::new(seed),
            last_spawn_ms: None,
            nodes: Vec::new(),
            gate: FrameGate::default(),
            listeners,
        })
    }

    /// Spawns a node at `at` unless the last one is younger than the throttle interval.
    pub fn on_pointer(
        &mut self,
        doc: &mut dyn Document,
        window: &mut dyn Window,
        at: Point,
    ) -> PageResult<Option<ElementId>> {
        self.spawn_throttled(doc, window, at, EventKind::PointerMove)
    }

    /// Touch moves without a touch point are ignored.
    pub fn on_touch(
        &mut self,
        doc: &mut dyn Document,
        window: &mut dyn Window,
        touch: Option<Point>,
    ) -> PageResult<Option<ElementId>> {
        match touch {
            Some(at) => self.spawn_throttled(doc, window, at, EventKind::TouchMove),
            None => Ok(None),
        }
    }

    /// Removes expired nodes, then starts the fade of nodes spawned since the last frame.
    ///
    /// Returns whether `token` was the trail's pending frame.
    pub fn on_frame(&mut self, token: FrameToken, doc: &mut dyn Document, now_ms: f64) -> bool {
        self.expire(doc, now_ms);
        if !self.gate.fire(token) {
            return false;
        }
        for node in self.nodes.iter_mut().filter(|n| !n.faded) {
            doc.set_style(node.el, "transform", &shrink_transform(node.scale * 0.18));
            doc.set_style(node.el, "opacity", "0");
            node.faded = true;
        }
        true
    }

    /// Removes nodes whose lifetime is over; returns how many were removed.
    pub fn expire(&mut self, doc: &mut dyn Document, now_ms: f64) -> usize {
        let life = self.cfg.life_ms;
        let before = self.nodes.len();
        self.nodes.retain(|n| {
            if now_ms - n.born_ms >= life {
                doc.remove_element(n.el);
                false
            } else {
                true
            }
        });
        before - self.nodes.len()
    }

    /// Nodes not yet expired, oldest first.
    pub fn live_nodes(&self) -> Vec<ElementId> {
        self.nodes.iter().map(|n| n.el).collect()
    }

    /// Whether pointer and touch listeners are still attached.
    pub fn is_listening(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Detaches listeners, cancels the pending fade and removes every live node.
    pub fn stop(&mut self, doc: &mut dyn Document, window: &mut dyn Window) {
        self.listeners.detach_all(window);
        self.gate.cancel(window);
        for node in self.nodes.drain(..) {
            doc.remove_element(node.el);
        }
    }

    fn spawn_throttled(
        &mut self,
        doc: &mut dyn Document,
        window: &mut dyn Window,
        at: Point,
        kind: EventKind,
    ) -> PageResult<Option<ElementId>> {
        if !self.listeners.listens_on(ListenerTarget::Document, kind) {
            return Ok(None);
        }
        let now = window.now_ms();
        self.expire(doc, now);
        if let Some(last) = self.last_spawn_ms
            && now - last < self.cfg.throttle_ms
        {
            return Ok(None);
        }
        self.last_spawn_ms = Some(now);

        let el = doc.create_element("div");
        doc.add_class(el, &self.cfg.class);
        doc.set_style(el, "left", &format!("{}px", at.x));
        doc.set_style(el, "top", &format!("{}px", at.y));
        let scale = self.rng.span(0.7, 0.6);
        doc.set_style(el, "transform", &shrink_transform(scale));
        let body = doc.body();
        doc.append_child(body, el)?;

        self.nodes.push(TrailNode {
            el,
            born_ms: now,
            scale,
            faded: false,
        });
        self.gate.request(window);
        Ok(Some(el))
    }
}

fn shrink_transform(scale: f64) -> String {
    format!("translate(-50%,-50%) scale({scale})")
}

#[cfg(test)]
#[path = "../../tests/unit/effects/cursor_trail.rs"]
mod tests;
