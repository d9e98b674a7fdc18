use std::path::Path;

use anyhow::Context as _;

use crate::dom::synthetic::{ElementSpec, SyntheticDocument};
use crate::foundation::core::Viewport;
use crate::foundation::error::{PageError, PageResult};
use crate::host::synthetic::SyntheticWindow;

/// A complete synthetic page: viewport, platform answers and body content.
///
/// This is the JSON input of `scrollglow simulate`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageFixture {
    /// Initial viewport.
    pub viewport: Viewport,
    /// Answer to the reduced-motion query; `null` simulates a platform without support.
    #[serde(default = "default_reduced_motion")]
    pub reduced_motion: Option<bool>,
    /// Children of `body`, in order.
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

fn default_reduced_motion() -> Option<bool> {
    Some(false)
}

impl PageFixture {
    /// Fixture with motion allowed.
    pub fn new(viewport: Viewport, elements: Vec<ElementSpec>) -> Self {
        Self {
            viewport,
            reduced_motion: default_reduced_motion(),
            elements,
        }
    }

    /// Parses a fixture from JSON.
    pub fn from_json_str(s: &str) -> PageResult<Self> {
        serde_json::from_str(s).map_err(|e| PageError::serde(format!("page fixture: {e}")))
    }

    /// Reads a JSON fixture file.
    pub fn from_path(path: impl AsRef<Path>) -> PageResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read page fixture '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Builds the document and window described by this fixture.
    pub fn build(&self) -> PageResult<(SyntheticDocument, SyntheticWindow)> {
        let viewport = Viewport::new(self.viewport.width, self.viewport.height)?;
        let viewport = Viewport {
            scroll_x: self.viewport.scroll_x,
            scroll_y: self.viewport.scroll_y.max(0.0),
            ..viewport
        };
        let doc = SyntheticDocument::with_body(&self.elements)?;
        let window = SyntheticWindow::new(viewport).with_reduced_motion(self.reduced_motion);
        Ok((doc, window))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/fixture.rs"]
mod tests;
