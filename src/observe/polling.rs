use crate::dom::document::Document;
use crate::foundation::core::{ElementId, Viewport};
use crate::observe::watcher::{IntersectionOptions, VisibilityChange, Watcher};

/// [`Watcher`] that re-evaluates layout geometry whenever it is polled.
#[derive(Clone, Debug)]
pub struct PollingWatcher {
    options: IntersectionOptions,
    // Last reported verdict per target; `None` until the first poll.
    targets: Vec<(ElementId, Option<bool>)>,
}

impl PollingWatcher {
    /// Watcher with no targets.
    pub fn new(options: IntersectionOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    /// Options every target is evaluated with.
    pub fn options(&self) -> IntersectionOptions {
        self.options
    }
}

impl Watcher for PollingWatcher {
    fn observe(&mut self, target: ElementId) {
        if !self.is_observing(target) {
            self.targets.push((target, None));
        }
    }

    fn unobserve(&mut self, target: ElementId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|(t, _)| *t != target);
        self.targets.len() != before
    }

    fn disconnect(&mut self) {
        self.targets.clear();
    }

    fn observed_count(&self) -> usize {
        self.targets.len()
    }

    fn is_observing(&self, target: ElementId) -> bool {
        self.targets.iter().any(|(t, _)| *t == target)
    }

    fn poll(&mut self, doc: &dyn Document, viewport: Viewport) -> Vec<VisibilityChange> {
        let mut changes = Vec::new();
        for (target, last) in &mut self.targets {
            let (visible, ratio) = match doc.layout_box(*target) {
                Some(rect) if doc.is_connected(*target) => self.options.evaluate(rect, viewport),
                _ => (false, 0.0),
            };
            if *last != Some(visible) {
                *last = Some(visible);
                changes.push(VisibilityChange {
                    target: *target,
                    visible,
                    ratio,
                });
            }
        }
        changes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/observe/polling.rs"]
mod tests;
