// ============================================================================
// mediabot-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Core Configuration Structures and Constants
//
// This module defines the configuration used by the resolution pipeline: where
// scratch files are staged, which User-Agent the HTTP layer presents, how the
// yt-dlp binary is located and which mode YouTube links resolve to.
//
// USAGE:
// Instances of CoreConfig are created by consumers of the library (like
// mediabot-cli), usually through CoreConfigBuilder, and handed to
// `MediaBot::new`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

pub mod builder;

pub use builder::CoreConfigBuilder;

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Desktop browser User-Agent sent with every HTTP request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:68.0) Gecko/20100101 Firefox/68.0";

/// Fixed prefix of every scratch file name.
pub const DEFAULT_SCRATCH_PREFIX: &str = "reddit";

/// Name of the scratch directory created under the system temp dir.
pub const DEFAULT_SCRATCH_DIR_NAME: &str = "mediabot";

/// Program name used to invoke yt-dlp.
pub const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

// ============================================================================
// YOUTUBE MODE
// ============================================================================

/// Media kind a `youtu.be` link resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YoutubeMode {
    /// Extract the best audio stream and normalise it to mp3.
    #[default]
    Audio,
    /// Download the video and normalise it to mp4.
    Video,
}

impl fmt::Display for YoutubeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YoutubeMode::Audio => write!(f, "audio"),
            YoutubeMode::Video => write!(f, "video"),
        }
    }
}

impl FromStr for YoutubeMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "audio" => Ok(YoutubeMode::Audio),
            "video" => Ok(YoutubeMode::Video),
            other => Err(CoreError::Config(format!(
                "Unknown YouTube mode '{other}' (expected 'audio' or 'video')"
            ))),
        }
    }
}

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Main configuration structure for the mediabot-core library.
///
/// # Examples
///
/// ```rust
/// use mediabot_core::config::{CoreConfigBuilder, YoutubeMode};
///
/// let config = CoreConfigBuilder::new()
///     .scratch_dir("/tmp/mediabot-test")
///     .youtube_mode(YoutubeMode::Video)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Shared scratch directory; created if absent.
    pub scratch_dir: PathBuf,

    /// Fixed prefix of every scratch file name.
    pub scratch_prefix: String,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Optional overall request timeout. `None` leaves deadlines to the host.
    pub http_timeout: Option<Duration>,

    /// Path or program name of the yt-dlp binary.
    pub ytdlp_path: PathBuf,

    /// How `youtu.be` links are resolved.
    pub youtube_mode: YoutubeMode,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join(DEFAULT_SCRATCH_DIR_NAME),
            scratch_prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout: None,
            ytdlp_path: PathBuf::from(DEFAULT_YTDLP_PATH),
            youtube_mode: YoutubeMode::default(),
        }
    }
}

impl CoreConfig {
    /// Checks the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.user_agent.trim().is_empty() {
            return Err(CoreError::Config("User-Agent must not be empty".to_string()));
        }
        if self.scratch_prefix.trim().is_empty() {
            return Err(CoreError::Config(
                "Scratch file prefix must not be empty".to_string(),
            ));
        }
        if self
            .scratch_prefix
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        {
            return Err(CoreError::Config(format!(
                "Scratch file prefix '{}' may only contain ASCII letters, digits, '-' and '_'",
                self.scratch_prefix
            )));
        }
        if self.ytdlp_path.as_os_str().is_empty() {
            return Err(CoreError::Config("yt-dlp path must not be empty".to_string()));
        }
        if self.scratch_dir.as_os_str().is_empty() {
            return Err(CoreError::Config(
                "Scratch directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
