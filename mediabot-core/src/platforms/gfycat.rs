// mediabot-core/src/platforms/gfycat.rs
//
// gfycat.com: the page URL names a gfy; the public API resolves it to an mp4.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{annotate, parse_url, ExtractionContext, PlatformExtractor};
use crate::classifier::RedditPost;
use crate::descriptor::{MediaDescriptor, MediaKind};
use crate::error::{CoreError, CoreResult};
use crate::fetch::MediaFetcher;

pub const GFYCAT_API: &str = "https://api.gfycat.com/v1/gfycats";

// Gfy names are CamelCase words; anything after a dash is a slug.
static PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/(?:gifs/detail/)?(?P<id>[A-Za-z]+)").unwrap());

#[derive(Debug, Deserialize)]
struct GfyResponse {
    #[serde(rename = "gfyItem")]
    gfy_item: GfyItem,
}

#[derive(Debug, Deserialize)]
struct GfyItem {
    #[serde(rename = "mp4Url")]
    mp4_url: String,
}

pub struct GfycatExtractor;

impl PlatformExtractor for GfycatExtractor {
    fn extract(
        &self,
        post: &RedditPost,
        ctx: &ExtractionContext,
        fetcher: &dyn MediaFetcher,
    ) -> CoreResult<MediaDescriptor> {
        let url = parse_url(&post.url)?;
        let id = PATH_RE
            .captures(url.path())
            .and_then(|cap| cap.name("id"))
            .map(|id| id.as_str())
            .ok_or_else(|| CoreError::InvalidPayload(format!("no gfy id in {}", post.url)))?;

        let api_url = format!("{GFYCAT_API}/{id}");
        log::debug!("Resolving gfy {} via {}", id, api_url);
        let response: GfyResponse = serde_json::from_value(fetcher.fetch_json(&api_url)?)?;

        let descriptor = MediaDescriptor::new(response.gfy_item.mp4_url, MediaKind::Video, "mp4")?;
        Ok(annotate(descriptor, post, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YoutubeMode;
    use crate::external::mocks::MockFetcher;

    fn ctx() -> ExtractionContext {
        ExtractionContext {
            web_url: "https://www.reddit.com/r/gifs/comments/abc/t/".into(),
            json_url: "https://www.reddit.com/r/gifs/comments/abc/t/.json".into(),
            youtube_mode: YoutubeMode::default(),
        }
    }

    fn post(url: &str) -> RedditPost {
        RedditPost {
            domain: "gfycat.com".into(),
            url: url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolves_mp4_through_api() {
        let fetcher = MockFetcher::new();
        fetcher.add_response(
            "https://api.gfycat.com/v1/gfycats/SomeHappyCat",
            br#"{"gfyItem":{"gfyName":"SomeHappyCat","mp4Url":"https://giant.gfycat.com/SomeHappyCat.mp4"}}"#.to_vec(),
        );

        let d = GfycatExtractor
            .extract(&post("https://gfycat.com/SomeHappyCat-funny-cat"), &ctx(), &fetcher)
            .unwrap();

        assert_eq!(d.source_url(), "https://giant.gfycat.com/SomeHappyCat.mp4");
        assert_eq!(d.kind(), MediaKind::Video);
        assert_eq!(d.extension(), "mp4");
        assert_eq!(
            fetcher.requested_urls(),
            vec!["https://api.gfycat.com/v1/gfycats/SomeHappyCat".to_string()]
        );
    }

    #[test]
    fn test_detail_path() {
        let fetcher = MockFetcher::new();
        fetcher.add_response(
            "https://api.gfycat.com/v1/gfycats/Zippy",
            br#"{"gfyItem":{"mp4Url":"https://giant.gfycat.com/Zippy.mp4"}}"#.to_vec(),
        );
        let d = GfycatExtractor
            .extract(&post("https://gfycat.com/gifs/detail/Zippy"), &ctx(), &fetcher)
            .unwrap();
        assert_eq!(d.source_url(), "https://giant.gfycat.com/Zippy.mp4");
    }

    #[test]
    fn test_api_failure_propagates() {
        let result = GfycatExtractor.extract(&post("https://gfycat.com/Gone"), &ctx(), &MockFetcher::new());
        assert!(matches!(result, Err(CoreError::HttpStatus { status: 404, .. })));
    }

    #[test]
    fn test_unexpected_api_shape() {
        let fetcher = MockFetcher::new();
        fetcher.add_response("https://api.gfycat.com/v1/gfycats/Odd", br#"{"errorMessage":"x"}"#.to_vec());
        let result = GfycatExtractor.extract(&post("https://gfycat.com/Odd"), &ctx(), &fetcher);
        assert!(matches!(result, Err(CoreError::Json(_))));
    }
}
