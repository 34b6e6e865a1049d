// mediabot-core/src/platforms/imgur.rs
//
// imgur.com / i.imgur.com: animated links (gifv, gif, mp4 or bare ids) are
// served as mp4 from i.imgur.com; still images are fetched as linked.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{annotate, parse_url, ExtractionContext, PlatformExtractor};
use crate::classifier::RedditPost;
use crate::descriptor::{MediaDescriptor, MediaKind};
use crate::error::{CoreError, CoreResult};
use crate::fetch::MediaFetcher;

// Single-image links only; albums (/a/..) and galleries don't match.
static PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(?P<id>[A-Za-z0-9]+)(?:\.(?P<ext>[A-Za-z0-9]+))?/?$").unwrap()
});

pub struct ImgurExtractor;

impl PlatformExtractor for ImgurExtractor {
    fn extract(
        &self,
        post: &RedditPost,
        ctx: &ExtractionContext,
        _fetcher: &dyn MediaFetcher,
    ) -> CoreResult<MediaDescriptor> {
        let url = parse_url(&post.url)?;
        let cap = PATH_RE
            .captures(url.path())
            .ok_or_else(|| CoreError::InvalidPayload(format!("unsupported imgur link: {}", post.url)))?;
        let id = &cap["id"];
        let ext = cap.name("ext").map(|e| e.as_str().to_ascii_lowercase());

        let descriptor = match ext.as_deref() {
            None | Some("gifv") | Some("gif") | Some("mp4") => MediaDescriptor::new(
                format!("https://i.imgur.com/{id}.mp4"),
                MediaKind::Video,
                "mp4",
            )?,
            Some(image_ext) => MediaDescriptor::new(post.url.clone(), MediaKind::Image, image_ext)?,
        };
        Ok(annotate(descriptor, post, ctx))
    }
}
