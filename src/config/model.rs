use std::path::Path;

use anyhow::Context as _;

use crate::dom::selector::Selector;
use crate::foundation::core::RootMargin;
use crate::foundation::error::{PageError, PageResult};
use crate::nav::tracker::GapPolicy;
use crate::observe::watcher::IntersectionOptions;

/// Selectors, marker classes and tuning knobs of one page session.
///
/// Every field has a default matching the stock page markup, so `{}` is a complete
/// configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhanceConfig {
    /// Scroll reveal of marked content.
    pub reveal: RevealConfig,
    /// Active navigation entry.
    pub nav: NavConfig,
    /// Same-page anchor scrolling and the scroll indicator.
    pub anchors: AnchorConfig,
    /// Mobile menu toggle.
    pub menu: MenuConfig,
    /// Decorative effects.
    pub effects: EffectsConfig,
}

impl EnhanceConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(s: &str) -> PageResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| PageError::serde(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> PageResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Checks every section; the first failure is returned.
    pub fn validate(&self) -> PageResult<()> {
        self.reveal.validate()?;
        self.nav.validate()?;
        self.anchors.validate()?;
        self.menu.validate()?;
        self.effects.validate()
    }
}

/// Scroll reveal markers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Elements revealed one by one.
    pub single_selector: String,
    /// Class added to a revealed element.
    pub single_class: String,
    /// Containers whose children reveal with a stagger.
    pub stagger_selector: String,
    /// Class added to a revealed stagger container.
    pub stagger_class: String,
    /// Visible fraction that triggers a reveal.
    pub threshold: f64,
    /// Fraction of the viewport height added to (positive) or cut from the bottom edge.
    pub bottom_margin: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            single_selector: ".animate-on-scroll".to_string(),
            single_class: "visible".to_string(),
            stagger_selector: "[data-reveal-stagger]".to_string(),
            stagger_class: "revealed".to_string(),
            threshold: 0.1,
            bottom_margin: -0.1,
        }
    }
}

impl RevealConfig {
    /// Intersection options of the reveal watcher.
    pub fn options(&self) -> PageResult<IntersectionOptions> {
        IntersectionOptions::new(RootMargin::bottom(self.bottom_margin), self.threshold)
    }

    /// Selectors must parse, classes must be single tokens and the threshold within `[0, 1]`.
    pub fn validate(&self) -> PageResult<()> {
        check_selector("reveal.single_selector", &self.single_selector)?;
        check_selector("reveal.stagger_selector", &self.stagger_selector)?;
        check_class("reveal.single_class", &self.single_class)?;
        check_class("reveal.stagger_class", &self.stagger_class)?;
        self.options()?;
        Ok(())
    }
}

/// Navigation links kept in sync with the section under the viewport midpoint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// Navigation links; each `href` names a section fragment.
    pub link_selector: String,
    /// Sections taking part in the active-section computation.
    pub section_selector: String,
    /// Class marking the active link.
    pub active_class: String,
    /// Outcome when the midpoint falls between sections.
    pub gap_policy: GapPolicy,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            link_selector: ".nav-links a".to_string(),
            section_selector: "section[id]".to_string(),
            active_class: "active".to_string(),
            gap_policy: GapPolicy::default(),
        }
    }
}

impl NavConfig {
    /// Selectors must parse and the active class must be a single token.
    pub fn validate(&self) -> PageResult<()> {
        check_selector("nav.link_selector", &self.link_selector)?;
        check_selector("nav.section_selector", &self.section_selector)?;
        check_class("nav.active_class", &self.active_class)
    }
}

/// Same-page anchor links and the hero scroll indicator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorConfig {
    /// Links handled as smooth in-page scrolls.
    pub anchor_selector: String,
    /// Fixed header whose height is subtracted from every scroll target.
    pub header_selector: String,
    /// Extra space kept above anchor targets, in pixels.
    pub extra_gap: f64,
    /// Scroll indicator made keyboard and click activatable.
    pub indicator_selector: String,
    /// Fragment the scroll indicator jumps to.
    pub indicator_target: String,
    /// Space kept above the indicator target, in pixels.
    pub indicator_gap: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            anchor_selector: r##"a[href^="#"]"##.to_string(),
            header_selector: ".nav".to_string(),
            extra_gap: 0.0,
            indicator_selector: ".scroll-indicator".to_string(),
            indicator_target: "#about".to_string(),
            indicator_gap: 16.0,
        }
    }
}

impl AnchorConfig {
    /// The indicator target must be a fragment and gaps finite and non-negative.
    pub fn validate(&self) -> PageResult<()> {
        check_selector("anchors.anchor_selector", &self.anchor_selector)?;
        check_selector("anchors.header_selector", &self.header_selector)?;
        check_selector("anchors.indicator_selector", &self.indicator_selector)?;
        if !self.indicator_target.starts_with('#') || self.indicator_target.len() < 2 {
            return Err(PageError::config(format!(
                "anchors.indicator_target must be a fragment like \"#about\", got {:?}",
                self.indicator_target
            )));
        }
        check_gap("anchors.extra_gap", self.extra_gap)?;
        check_gap("anchors.indicator_gap", self.indicator_gap)
    }
}

/// Mobile menu toggle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    /// Button opening and closing the menu.
    pub toggle_selector: String,
    /// Link list shown while the menu is open.
    pub links_selector: String,
    /// Class marking the open menu.
    pub open_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".nav-toggle".to_string(),
            links_selector: ".nav-links".to_string(),
            open_class: "open".to_string(),
        }
    }
}

impl MenuConfig {
    /// Selectors must parse and the open class must be a single token.
    pub fn validate(&self) -> PageResult<()> {
        check_selector("menu.toggle_selector", &self.toggle_selector)?;
        check_selector("menu.links_selector", &self.links_selector)?;
        check_class("menu.open_class", &self.open_class)
    }
}

/// Decorations started by [`crate::PageSession::init_decorations`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    /// Seed of the decoration jitter generator.
    pub seed: u64,
    /// Cursor trail.
    pub trail: TrailConfig,
    /// Sun rays.
    pub rays: RaysConfig,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_F00D,
            trail: TrailConfig::default(),
            rays: RaysConfig::default(),
        }
    }
}

impl EffectsConfig {
    /// Validates both effects.
    pub fn validate(&self) -> PageResult<()> {
        self.trail.validate()?;
        self.rays.validate()
    }
}

/// Cursor trail nodes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrailConfig {
    /// Class of every trail node.
    pub class: String,
    /// Minimum spacing between two spawned nodes.
    pub throttle_ms: f64,
    /// Lifetime of one node.
    pub life_ms: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            class: "cursor-trail".to_string(),
            throttle_ms: 40.0,
            life_ms: 700.0,
        }
    }
}

impl TrailConfig {
    /// Durations must be finite and positive.
    pub fn validate(&self) -> PageResult<()> {
        check_class("effects.trail.class", &self.class)?;
        for (name, v) in [
            ("effects.trail.throttle_ms", self.throttle_ms),
            ("effects.trail.life_ms", self.life_ms),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PageError::config(format!("{name} must be > 0, got {v}")));
            }
        }
        Ok(())
    }
}

/// Ambient rays injected into sections.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RaysConfig {
    /// Elements that receive rays.
    pub target_selector: String,
    /// Target never decorated (the hero section).
    pub exclude_id: String,
    /// Preferred host of the wrapper inside a target; the target itself otherwise.
    pub container_selector: String,
    /// Class of the rays wrapper.
    pub wrapper_class: String,
    /// Class of one ray.
    pub ray_class: String,
    /// Rays per wrapper.
    pub count: usize,
    /// Visible fraction that triggers decoration.
    pub threshold: f64,
}

impl Default for RaysConfig {
    fn default() -> Self {
        Self {
            target_selector: ".section, .footer".to_string(),
            exclude_id: "hero".to_string(),
            container_selector: ".container".to_string(),
            wrapper_class: "sun-rays".to_string(),
            ray_class: "ray".to_string(),
            count: 7,
            threshold: 0.06,
        }
    }
}

impl RaysConfig {
    /// Intersection options of the rays watcher.
    pub fn options(&self) -> PageResult<IntersectionOptions> {
        IntersectionOptions::new(RootMargin::ZERO, self.threshold)
    }

    /// Same rules as [`RevealConfig::validate`].
    pub fn validate(&self) -> PageResult<()> {
        check_selector("effects.rays.target_selector", &self.target_selector)?;
        check_selector("effects.rays.container_selector", &self.container_selector)?;
        check_class("effects.rays.wrapper_class", &self.wrapper_class)?;
        check_class("effects.rays.ray_class", &self.ray_class)?;
        self.options()?;
        Ok(())
    }
}

fn check_selector(name: &str, src: &str) -> PageResult<()> {
    Selector::parse(src)
        .map(|_| ())
        .map_err(|e| PageError::config(format!("{name}: {e}")))
}

fn check_class(name: &str, class: &str) -> PageResult<()> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(PageError::config(format!(
            "{name} must be a single non-empty class name, got {class:?}"
        )));
    }
    Ok(())
}

fn check_gap(name: &str, v: f64) -> PageResult<()> {
    if !v.is_finite() {
        return Err(PageError::config(format!("{name} must be finite, got {v}")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
