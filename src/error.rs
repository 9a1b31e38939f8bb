//! Error type shared by every page feature.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure while installing or running a page feature.
///
/// None of these are fatal to the page: the controller records the error
/// against the feature that produced it and moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// A required element is not present in the markup.
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    /// A DOM call was rejected by the host.
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// The host has no local storage (private mode, sandboxed frame, ...).
    #[error("local storage unavailable")]
    StorageUnavailable,

    /// Reading or writing a stored preference failed.
    #[error("storage access failed: {0}")]
    Storage(String),

    /// Writing to the system clipboard failed.
    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    /// The page configuration could not be parsed or is out of range.
    #[error("invalid page config: {0}")]
    Config(String),

    /// The host does not support a capability the feature needs.
    #[error("unsupported by host: {0}")]
    Unsupported(&'static str),

    /// The feature does not apply to this page as currently laid out.
    #[error("not applicable: {0}")]
    NotApplicable(&'static str),

    /// The page behaviors were already installed; they install once.
    #[error("page behaviors already started")]
    AlreadyStarted,
}

impl PageError {
    /// Whether this error only means "this page does not use the feature",
    /// as opposed to a failure while installing it.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::MissingElement(_) | Self::NotApplicable(_))
    }
}
