// ============================================================================
// mediabot-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent API for creating CoreConfig instances. Every setter is optional; the
// builder starts from `CoreConfig::default()`.

use std::path::PathBuf;
use std::time::Duration;

use super::{CoreConfig, YoutubeMode};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use mediabot_core::config::CoreConfigBuilder;
/// use std::time::Duration;
///
/// let config = CoreConfigBuilder::new()
///     .scratch_dir("/var/tmp/mediabot")
///     .user_agent("Mozilla/5.0 (compatible; mediabot)")
///     .http_timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(config.http_timeout, Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shared scratch directory.
    #[must_use]
    pub fn scratch_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.scratch_dir = dir.into();
        self
    }

    /// Sets the fixed scratch file prefix.
    #[must_use]
    pub fn scratch_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.scratch_prefix = prefix.into();
        self
    }

    /// Sets the User-Agent header value.
    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Sets an overall request timeout.
    #[must_use]
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = Some(timeout);
        self
    }

    /// Sets the yt-dlp binary path.
    #[must_use]
    pub fn ytdlp_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.ytdlp_path = path.into();
        self
    }

    /// Sets how YouTube links are resolved.
    #[must_use]
    pub fn youtube_mode(mut self, mode: YoutubeMode) -> Self {
        self.config.youtube_mode = mode;
        self
    }

    /// Builds the CoreConfig. Call `validate` on the result before use.
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
