// mediabot-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use mediabot_core::{CoreConfig, CoreConfigBuilder, YoutubeMode};
use std::path::PathBuf;
use std::time::Duration;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Mediabot: resolve a Reddit post into its media file",
    long_about = "Fetches a Reddit post, detects where its media is hosted and downloads it, \
                  using yt-dlp where available and ffmpeg to normalize containers \
                  (video to mp4, audio to mp3)."
)]
pub struct Cli {
    /// Reddit post URL, e.g. https://www.reddit.com/r/pics/comments/abc123/title/
    #[arg(required = true, value_name = "POST_URL")]
    pub post_url: String,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// Shared scratch directory for intermediate files
    #[arg(long, value_name = "DIR", env = "MEDIABOT_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "UA", env = "MEDIABOT_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Whether youtu.be links resolve to an mp3 ("audio") or an mp4 ("video")
    #[arg(
        long,
        value_name = "MODE",
        env = "MEDIABOT_YOUTUBE_MODE",
        default_value = "audio"
    )]
    pub youtube_mode: YoutubeMode,

    /// Path to the yt-dlp binary
    #[arg(long, value_name = "PATH", env = "MEDIABOT_YTDLP")]
    pub ytdlp: Option<PathBuf>,

    /// Overall HTTP request timeout in seconds (default: none)
    #[arg(long, value_name = "SECONDS", env = "MEDIABOT_HTTP_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Write the downloaded payload to FILE
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Builds the core configuration, leaving unset options at their defaults.
    pub fn core_config(&self) -> CoreConfig {
        let mut builder = CoreConfigBuilder::new().youtube_mode(self.youtube_mode);
        if let Some(dir) = &self.scratch_dir {
            builder = builder.scratch_dir(dir.clone());
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        if let Some(ytdlp) = &self.ytdlp {
            builder = builder.ytdlp_path(ytdlp.clone());
        }
        if let Some(secs) = self.timeout {
            builder = builder.http_timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}
