//! Error taxonomy for slug resolution and its consumers

use thiserror::Error;

/// Errors raised while resolving, assembling or validating routes
#[derive(Debug, Error)]
pub enum RouteError {
    /// Two or more files claim the same slug
    #[error("slug {slug} is claimed by {} files: {}", .files.len(), .files.join(", "))]
    ResolutionAmbiguity { slug: String, files: Vec<String> },

    /// File cannot be routed (bare root file, excluded helper, foreign extension)
    #[error("no slug for {path}")]
    MissingSlug { path: String },

    /// External content feed failed or is not configured
    #[error("external content source unavailable: {0}")]
    ExternalSourceUnavailable(String),

    /// External content feed answered with something we could not parse
    #[error("malformed feed response: {0}")]
    MalformedOutput(String),

    /// Route manifest missing or unreadable
    #[error("route manifest unavailable: {0}")]
    Manifest(String),
}

impl RouteError {
    /// Whether the sitemap should degrade to static and file-derived routes
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            RouteError::ExternalSourceUnavailable(_) | RouteError::MalformedOutput(_)
        )
    }
}
