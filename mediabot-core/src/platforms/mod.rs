// ============================================================================
// mediabot-core/src/platforms/mod.rs
// ============================================================================
//
// EXTRACTION ADAPTERS: One MediaDescriptor producer per hosting platform
//
// Each adapter turns a classified post into a descriptor or fails. Adapters
// are unit structs registered against `Platform` in `extractor_for`, so
// adding a host means adding a table row in the classifier and an arm here.

use url::Url;

use crate::classifier::{Classified, Platform, RedditPost};
use crate::config::YoutubeMode;
use crate::descriptor::{MediaDescriptor, MediaKind};
use crate::error::{CoreError, CoreResult};
use crate::fetch::MediaFetcher;

pub mod gfycat;
pub mod giphy;
pub mod imgur;
pub mod reddit;
pub mod youtube;

pub use gfycat::GfycatExtractor;
pub use giphy::GiphyExtractor;
pub use imgur::ImgurExtractor;
pub use reddit::{RedditImageExtractor, RedditVideoExtractor};
pub use youtube::YoutubeExtractor;

/// Request-level data shared by every adapter.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    /// The post URL as given, without `.json`.
    pub web_url: String,
    /// The listing URL the post was read from.
    pub json_url: String,
    pub youtube_mode: YoutubeMode,
}

/// Produces a descriptor for one hosting platform.
pub trait PlatformExtractor {
    fn extract(
        &self,
        post: &RedditPost,
        ctx: &ExtractionContext,
        fetcher: &dyn MediaFetcher,
    ) -> CoreResult<MediaDescriptor>;
}

pub fn extractor_for(platform: Platform) -> &'static dyn PlatformExtractor {
    match platform {
        Platform::RedditImage => &RedditImageExtractor,
        Platform::RedditVideo => &RedditVideoExtractor,
        Platform::Gfycat => &GfycatExtractor,
        Platform::Giphy => &GiphyExtractor,
        Platform::Youtube => &YoutubeExtractor,
        Platform::Imgur => &ImgurExtractor,
    }
}

/// Runs the adapter registered for a classified post.
pub fn extract_descriptor(
    classified: &Classified,
    ctx: &ExtractionContext,
    fetcher: &dyn MediaFetcher,
) -> CoreResult<MediaDescriptor> {
    let descriptor = extractor_for(classified.platform).extract(&classified.post, ctx, fetcher)?;
    log::debug!("Extracted descriptor: {:?}", descriptor);
    Ok(descriptor)
}

// ---- Helpers shared by the adapters ----

/// Attaches the post-level metadata every descriptor carries.
fn annotate(descriptor: MediaDescriptor, post: &RedditPost, ctx: &ExtractionContext) -> MediaDescriptor {
    descriptor
        .with_title(post.title.clone())
        .with_caption(post.caption())
        .with_origin_json_url(Some(ctx.json_url.clone()))
}

fn parse_url(raw: &str) -> CoreResult<Url> {
    Url::parse(raw).map_err(|e| CoreError::InvalidPayload(format!("bad media URL '{raw}': {e}")))
}

/// Lower-cased extension of the last path segment, if it has one.
fn url_extension(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let (_, ext) = segment.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// Media kind implied by a direct link's extension.
fn kind_for_extension(ext: &str) -> MediaKind {
    match ext {
        "gif" | "gifv" | "mp4" | "webm" | "mov" | "mkv" => MediaKind::Video,
        "mp3" | "m4a" | "ogg" | "opus" | "wav" => MediaKind::Audio,
        _ => MediaKind::Image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_extension() {
        let url = Url::parse("https://i.redd.it/abc123.JPG?width=640").unwrap();
        assert_eq!(url_extension(&url).as_deref(), Some("jpg"));

        let url = Url::parse("https://imgur.com/abc123").unwrap();
        assert_eq!(url_extension(&url), None);

        let url = Url::parse("https://example.com/trailing.").unwrap();
        assert_eq!(url_extension(&url), None);
    }

    #[test]
    fn test_kind_for_extension() {
        assert_eq!(kind_for_extension("gif"), MediaKind::Video);
        assert_eq!(kind_for_extension("png"), MediaKind::Image);
        assert_eq!(kind_for_extension("opus"), MediaKind::Audio);
    }

    #[test]
    fn test_every_platform_has_an_adapter() {
        use crate::classifier::DOMAIN_TABLE;
        use crate::external::mocks::MockFetcher;

        let ctx = ExtractionContext {
            web_url: "https://www.reddit.com/r/x/comments/1/t/".into(),
            json_url: "https://www.reddit.com/r/x/comments/1/t/.json".into(),
            youtube_mode: YoutubeMode::Audio,
        };
        let fetcher = MockFetcher::new();
        fetcher.add_response(
            "https://api.gfycat.com/v1/gfycats/HappyCat",
            br#"{"gfyItem":{"mp4Url":"https://giant.gfycat.com/HappyCat.mp4"}}"#.to_vec(),
        );

        for (domain, platform) in DOMAIN_TABLE {
            let url = match platform {
                Platform::RedditImage => "https://i.redd.it/abc.png",
                Platform::RedditVideo => "https://v.redd.it/abc",
                Platform::Gfycat => "https://gfycat.com/HappyCat",
                Platform::Giphy => "https://media.giphy.com/media/xyz/giphy.gif",
                Platform::Youtube => "https://youtu.be/dQw4w9WgXcQ",
                Platform::Imgur => "https://i.imgur.com/abc.gifv",
            };
            let mut post = RedditPost {
                title: Some("t".into()),
                domain: domain.to_string(),
                url: url.to_string(),
                ..Default::default()
            };
            if *platform == Platform::RedditVideo {
                post.media = serde_json::from_value(serde_json::json!({
                    "reddit_video": { "fallback_url": "https://v.redd.it/abc/DASH_480.mp4" }
                }))
                .unwrap();
            }

            let classified = Classified { platform: *platform, post };
            let descriptor = extract_descriptor(&classified, &ctx, &fetcher).unwrap();
            assert_eq!(descriptor.origin_json_url(), Some(ctx.json_url.as_str()));
            assert_eq!(descriptor.title(), Some("t"));
        }
    }
}
