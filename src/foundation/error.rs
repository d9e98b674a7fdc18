/// Convenience result type used across scrollglow.
pub type PageResult<T> = Result<T, PageError>;

/// Top-level error taxonomy.
///
/// Missing page elements are never errors; components go inert instead. Errors are reserved for
/// invalid configuration, malformed selectors, structural document operations on unknown
/// elements, and failures inside decorative effects (which the session swallows).
#[derive(thiserror::Error, Debug)]
pub enum PageError {
    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// A selector string could not be parsed.
    #[error("selector error: {0}")]
    Selector(String),

    /// A structural document operation referenced an unknown or detached element.
    #[error("document error: {0}")]
    Document(String),

    /// A decorative effect failed.
    #[error("effect error: {0}")]
    Effect(String),

    /// Errors when serializing or deserializing configuration or fixtures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PageError {
    /// Build a [`PageError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PageError::Selector`] value.
    pub fn selector(msg: impl Into<String>) -> Self {
        Self::Selector(msg.into())
    }

    /// Build a [`PageError::Document`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Build a [`PageError::Effect`] value.
    pub fn effect(msg: impl Into<String>) -> Self {
        Self::Effect(msg.into())
    }

    /// Build a [`PageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
