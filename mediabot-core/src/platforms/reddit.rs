// mediabot-core/src/platforms/reddit.rs
//
// Reddit-hosted media: i.redd.it images (and gifs) and v.redd.it videos.

use super::{annotate, kind_for_extension, parse_url, url_extension, ExtractionContext, PlatformExtractor};
use crate::classifier::RedditPost;
use crate::descriptor::{MediaDescriptor, MediaKind};
use crate::error::{CoreError, CoreResult};
use crate::fetch::MediaFetcher;

/// `i.redd.it`: the post URL is the media itself.
pub struct RedditImageExtractor;

impl PlatformExtractor for RedditImageExtractor {
    fn extract(
        &self,
        post: &RedditPost,
        ctx: &ExtractionContext,
        _fetcher: &dyn MediaFetcher,
    ) -> CoreResult<MediaDescriptor> {
        let url = parse_url(&post.url)?;
        let ext = url_extension(&url).ok_or_else(|| {
            CoreError::InvalidPayload(format!("i.redd.it link without extension: {}", post.url))
        })?;
        let kind = match kind_for_extension(&ext) {
            MediaKind::Audio => MediaKind::Image,
            kind => kind,
        };

        let descriptor = MediaDescriptor::new(post.url.clone(), kind, ext)?;
        Ok(annotate(descriptor, post, ctx))
    }
}

/// `v.redd.it`: the fallback stream is video-only, so the specialized
/// extractor is tried first on the post's web URL to get the muxed audio.
pub struct RedditVideoExtractor;

impl PlatformExtractor for RedditVideoExtractor {
    fn extract(
        &self,
        post: &RedditPost,
        ctx: &ExtractionContext,
        _fetcher: &dyn MediaFetcher,
    ) -> CoreResult<MediaDescriptor> {
        let fallback = post.fallback_url().ok_or_else(|| {
            CoreError::InvalidPayload("v.redd.it post without media.reddit_video.fallback_url".into())
        })?;

        let descriptor = MediaDescriptor::new(fallback, MediaKind::Video, "mp4")?
            .with_specialized_extractor(ctx.web_url.clone())?;
        Ok(annotate(descriptor, post, ctx))
    }
}
