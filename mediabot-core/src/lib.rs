//! Core library for resolving Reddit posts into downloadable media.
//!
//! This crate classifies a post's hosting platform, extracts a direct media
//! locator, downloads the bytes (through yt-dlp where that yields better
//! results, falling back to plain HTTP) and normalizes the container with
//! ffmpeg so videos come out as mp4 and audio as mp3.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediabot_core::{CoreConfigBuilder, MediaBot, YoutubeMode};
//!
//! let config = CoreConfigBuilder::new()
//!     .youtube_mode(YoutubeMode::Video)
//!     .build();
//! let bot = MediaBot::new(config).unwrap();
//!
//! match bot.resolve("https://www.reddit.com/r/pics/comments/abc123/title/").unwrap() {
//!     Some(download) => println!("{:?}", download),
//!     None => println!("no media"),
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod external;
pub mod extractor;
pub mod fetch;
pub mod normalize;
pub mod orchestrator;
pub mod pipeline;
pub mod platforms;
pub mod scratch;

// Re-exports for public API
pub use classifier::{classify, Classified, Platform, RedditPost};
pub use config::{CoreConfig, CoreConfigBuilder, YoutubeMode};
pub use descriptor::{Download, MediaDescriptor, MediaKind};
pub use error::{CoreError, CoreResult};
pub use external::{missing_dependencies, TranscodePreset};
pub use extractor::{ExtractionMode, SpecializedExtractor};
pub use fetch::{HttpFetcher, MediaFetcher};
pub use normalize::normalize;
pub use orchestrator::Toolchain;
pub use pipeline::MediaBot;
pub use scratch::ScratchDir;
