use crate::dom::document::Document;
use crate::foundation::core::{ElementId, Rect, RootMargin, Viewport};
use crate::foundation::error::{PageError, PageResult};

/// When a watched element counts as visible.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IntersectionOptions {
    /// Adjustment applied to the viewport before intersecting.
    #[serde(default)]
    pub root_margin: RootMargin,
    /// Minimum visible fraction of the element's area; `0` means "any overlap, edges included".
    pub threshold: f64,
}

impl IntersectionOptions {
    /// Validated options.
    pub fn new(root_margin: RootMargin, threshold: f64) -> PageResult<Self> {
        let out = Self {
            root_margin,
            threshold,
        };
        out.validate()?;
        Ok(out)
    }

    /// At least 10% visible inside a viewport cut by 10% at the bottom.
    pub fn reveal() -> Self {
        Self {
            root_margin: RootMargin::bottom(-0.1),
            threshold: 0.1,
        }
    }

    /// Threshold within `[0, 1]` and a valid margin.
    pub fn validate(&self) -> PageResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(PageError::config(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        self.root_margin.validate()
    }

    /// The observation root for `viewport`, margin applied.
    pub fn root_for(&self, viewport: Viewport) -> Rect {
        self.root_margin.apply(viewport.document_rect())
    }

    /// Visibility verdict and visible ratio of `target` for the given viewport.
    pub fn evaluate(&self, target: Rect, viewport: Viewport) -> (bool, f64) {
        let root = self.root_for(viewport);
        let Some(ratio) = intersection_ratio(target, root) else {
            return (false, 0.0);
        };
        let visible = if self.threshold <= 0.0 {
            true
        } else {
            ratio >= self.threshold
        };
        (visible, ratio)
    }
}

/// Visible fraction of `target` inside `root`, `None` when they do not touch at all.
///
/// Edge-adjacent rectangles touch with ratio 0; a zero-area target that touches reports 1.
pub fn intersection_ratio(target: Rect, root: Rect) -> Option<f64> {
    let x0 = target.x0.max(root.x0);
    let y0 = target.y0.max(root.y0);
    let x1 = target.x1.min(root.x1);
    let y1 = target.y1.min(root.y1);
    if x1 < x0 || y1 < y0 {
        return None;
    }
    let area = target.area();
    if area <= 0.0 {
        return Some(1.0);
    }
    Some(((x1 - x0) * (y1 - y0) / area).clamp(0.0, 1.0))
}

/// One visibility transition reported by a [`Watcher`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityChange {
    /// Watched element.
    pub target: ElementId,
    /// New verdict.
    pub visible: bool,
    /// Visible fraction at the time of the poll.
    pub ratio: f64,
}

/// Capability to watch elements for visibility transitions.
///
/// Implementations may sit on a native platform observer or re-evaluate geometry on demand
/// (see [`crate::PollingWatcher`]). Every newly observed target reports its first verdict on the
/// next poll, later polls report only transitions.
pub trait Watcher {
    /// Starts watching `target`; observing twice is a no-op.
    fn observe(&mut self, target: ElementId);

    /// Stops watching `target`; returns whether it was watched.
    fn unobserve(&mut self, target: ElementId) -> bool;

    /// Stops watching everything.
    fn disconnect(&mut self);

    /// Number of watched targets.
    fn observed_count(&self) -> usize;

    /// Whether `target` is watched.
    fn is_observing(&self, target: ElementId) -> bool;

    /// Transitions since the last poll, in observation order.
    fn poll(&mut self, doc: &dyn Document, viewport: Viewport) -> Vec<VisibilityChange>;
}

#[cfg(test)]
#[path = "../../tests/unit/observe/watcher.rs"]
mod tests;
