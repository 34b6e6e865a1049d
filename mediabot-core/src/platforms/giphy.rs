// mediabot-core/src/platforms/giphy.rs
//
// media.giphy.com: gif links carry a media id that has an mp4 rendition.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{annotate, kind_for_extension, parse_url, url_extension, ExtractionContext, PlatformExtractor};
use crate::classifier::RedditPost;
use crate::descriptor::{MediaDescriptor, MediaKind};
use crate::error::{CoreError, CoreResult};
use crate::fetch::MediaFetcher;

static PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/media/(?P<id>\w+)/").unwrap());

pub struct GiphyExtractor;

impl PlatformExtractor for GiphyExtractor {
    fn extract(
        &self,
        post: &RedditPost,
        ctx: &ExtractionContext,
        _fetcher: &dyn MediaFetcher,
    ) -> CoreResult<MediaDescriptor> {
        let url = parse_url(&post.url)?;

        let descriptor = match PATH_RE.captures(url.path()).and_then(|cap| cap.name("id")) {
            Some(id) => MediaDescriptor::new(
                format!("https://i.giphy.com/media/{}/giphy.mp4", id.as_str()),
                MediaKind::Video,
                "mp4",
            )?,
            None => {
                let ext = url_extension(&url).ok_or_else(|| {
                    CoreError::InvalidPayload(format!("unrecognised giphy link: {}", post.url))
                })?;
                MediaDescriptor::new(post.url.clone(), kind_for_extension(&ext), ext)?
            }
        };
        Ok(annotate(descriptor, post, ctx))
    }
}
