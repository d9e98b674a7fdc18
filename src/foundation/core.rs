use crate::foundation::error::{PageError, PageResult};

pub use kurbo::{Point, Rect, Vec2};

/// Opaque handle to one element of a [`crate::Document`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

/// Scroll position and size of the visible part of the page, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Horizontal scroll offset.
    #[serde(default)]
    pub scroll_x: f64,
    /// Vertical scroll offset.
    #[serde(default)]
    pub scroll_y: f64,
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
}

impl Viewport {
    /// Viewport at scroll offset zero; rejects negative or non-finite sizes.
    pub fn new(width: f64, height: f64) -> PageResult<Self> {
        if !(width.is_finite() && width >= 0.0) {
            return Err(PageError::config("viewport width must be finite and >= 0"));
        }
        if !(height.is_finite() && height >= 0.0) {
            return Err(PageError::config("viewport height must be finite and >= 0"));
        }
        Ok(Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        })
    }

    /// Same viewport scrolled vertically to `scroll_y`.
    pub fn scrolled_to(self, scroll_y: f64) -> Self {
        Self { scroll_y, ..self }
    }

    /// The visible region in document coordinates.
    pub fn document_rect(self) -> Rect {
        Rect::new(
            self.scroll_x,
            self.scroll_y,
            self.scroll_x + self.width,
            self.scroll_y + self.height,
        )
    }

    /// Vertical midpoint of the visible region in document coordinates.
    pub fn midpoint_y(self) -> f64 {
        self.scroll_y + self.height / 2.0
    }
}

/// Margin grown around (positive) or cut from (negative) an observation root.
///
/// Each edge is a fraction of the root's extent on that axis, so `bottom: -0.1` is the
/// `rootMargin: "0px 0px -10% 0px"` form.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RootMargin {
    /// Top edge fraction.
    #[serde(default)]
    pub top: f64,
    /// Right edge fraction.
    #[serde(default)]
    pub right: f64,
    /// Bottom edge fraction.
    #[serde(default)]
    pub bottom: f64,
    /// Left edge fraction.
    #[serde(default)]
    pub left: f64,
}

impl RootMargin {
    /// No margin on any edge.
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Margin on the bottom edge only.
    pub fn bottom(fraction: f64) -> Self {
        Self {
            bottom: fraction,
            ..Self::ZERO
        }
    }

    /// Grows or shrinks `root` by the margin.
    pub fn apply(self, root: Rect) -> Rect {
        let w = root.width();
        let h = root.height();
        let out = Rect::new(
            root.x0 - self.left * w,
            root.y0 - self.top * h,
            root.x1 + self.right * w,
            root.y1 + self.bottom * h,
        );
        // Margins that cross over collapse to an empty root instead of inverting it.
        Rect::new(out.x0, out.y0, out.x1.max(out.x0), out.y1.max(out.y0))
    }

    /// Every edge must be finite and within `[-1, 1]`.
    pub fn validate(self) -> PageResult<()> {
        for (edge, v) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !v.is_finite() || !(-1.0..=1.0).contains(&v) {
                return Err(PageError::config(format!(
                    "root margin {edge} must be within [-1, 1], got {v}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
