use thiserror::Error;

/// Startup-time configuration failures.
///
/// These are surfaced once by [`crate::config::DiagramConfig::validate`]
/// (via [`crate::session::DiagramSession::new`]) before any geometry work
/// begins. Runtime geometry problems are never reported through this type;
/// they are logged and the affected output is omitted for that frame.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("at least {needed} frame anchors are required for a closed boundary, got {got}")]
    TooFewFrameAnchors { needed: usize, got: usize },

    #[error("category list is empty")]
    NoCategories,

    #[error("spoke level list is empty")]
    NoSpokeLevels,
}
