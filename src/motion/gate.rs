use crate::host::window::{REDUCED_MOTION_QUERY, Window};

/// Outcome of the one-time reduced-motion check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPreference {
    /// Animations may run.
    #[default]
    Allow,
    /// The user asked the platform to reduce motion.
    Reduce,
}

impl MotionPreference {
    /// Queries the platform once.
    ///
    /// A platform that cannot answer the query is treated as "motion allowed": a decoration
    /// running when it should not is less harmful than content that never reveals.
    pub fn detect(window: &dyn Window) -> Self {
        match window.media_matches(REDUCED_MOTION_QUERY) {
            Some(true) => Self::Reduce,
            Some(false) => Self::Allow,
            None => {
                tracing::debug!("reduced-motion query unsupported; allowing motion");
                Self::Allow
            }
        }
    }

    /// `false` when the user asked for reduced motion.
    pub fn allows_motion(self) -> bool {
        self == Self::Allow
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/gate.rs"]
mod tests;
