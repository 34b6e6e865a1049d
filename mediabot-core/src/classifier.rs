// ============================================================================
// mediabot-core/src/classifier.rs
// ============================================================================
//
// PLATFORM CLASSIFIER: Reddit listing model and domain dispatch
//
// The listing returned by `<post>.json` is a top-level array whose first
// element holds `data.children[0].data`, the post itself. A cross-post is
// unwrapped to its parent exactly once before the hosting domain is read.
//
// KEY COMPONENTS:
// - RedditPost: the fields of a post the adapters consume
// - Platform: closed set of supported hosts, resolved through DOMAIN_TABLE
// - classify: listing JSON → Option<Classified>

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

// ---- Listing model ----

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RedditPost,
}

/// A Reddit post as it appears in a listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditPost {
    #[serde(default)]
    pub title: Option<String>,
    pub domain: String,
    pub url: String,
    #[serde(default)]
    pub media: Option<PostMedia>,
    #[serde(default)]
    pub subreddit_name_prefixed: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub crosspost_parent_list: Vec<RedditPost>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMedia {
    #[serde(default)]
    pub reddit_video: Option<RedditVideo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditVideo {
    pub fallback_url: String,
}

impl RedditPost {
    /// Returns the cross-posted parent if there is one, otherwise `self`.
    ///
    /// Only one level is unwrapped.
    pub fn unwrap_crosspost(mut self) -> RedditPost {
        if self.crosspost_parent_list.is_empty() {
            return self;
        }
        let parent = self.crosspost_parent_list.swap_remove(0);
        log::debug!("Unwrapping cross-post to parent on {}", parent.domain);
        parent
    }

    /// `r/<sub> · u/<author>`, or whichever half is known.
    pub fn caption(&self) -> Option<String> {
        let subreddit = self.subreddit_name_prefixed.as_deref();
        let author = self.author.as_deref().map(|a| format!("u/{a}"));
        match (subreddit, author) {
            (Some(sub), Some(author)) => Some(format!("{sub} · {author}")),
            (Some(sub), None) => Some(sub.to_string()),
            (None, Some(author)) => Some(author),
            (None, None) => None,
        }
    }

    pub fn fallback_url(&self) -> Option<&str> {
        self.media
            .as_ref()
            .and_then(|m| m.reddit_video.as_ref())
            .map(|v| v.fallback_url.as_str())
    }
}

// ---- Domain table ----

/// Hosting platforms with an extraction adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    RedditImage,
    RedditVideo,
    Gfycat,
    Giphy,
    Youtube,
    Imgur,
}

/// Exact hosting-domain matches. Anything else is unsupported.
pub const DOMAIN_TABLE: &[(&str, Platform)] = &[
    ("i.redd.it", Platform::RedditImage),
    ("v.redd.it", Platform::RedditVideo),
    ("gfycat.com", Platform::Gfycat),
    ("media.giphy.com", Platform::Giphy),
    ("youtu.be", Platform::Youtube),
    ("i.imgur.com", Platform::Imgur),
    ("imgur.com", Platform::Imgur),
];

impl Platform {
    pub fn from_domain(domain: &str) -> Option<Platform> {
        let domain = domain.trim();
        DOMAIN_TABLE
            .iter()
            .find(|(d, _)| d.eq_ignore_ascii_case(domain))
            .map(|(_, platform)| *platform)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::RedditImage => "reddit-image",
            Platform::RedditVideo => "reddit-video",
            Platform::Gfycat => "gfycat",
            Platform::Giphy => "giphy",
            Platform::Youtube => "youtube",
            Platform::Imgur => "imgur",
        };
        f.write_str(name)
    }
}

// ---- Classification ----

/// A post paired with the platform that hosts its media.
#[derive(Debug, Clone)]
pub struct Classified {
    pub platform: Platform,
    pub post: RedditPost,
}

/// Reads the post out of a listing payload.
pub fn parse_post(payload: &Value) -> CoreResult<RedditPost> {
    let first = payload
        .as_array()
        .and_then(|listings| listings.first())
        .ok_or_else(|| CoreError::InvalidPayload("expected a non-empty listing array".into()))?;

    let listing = Listing::deserialize(first)?;
    listing
        .data
        .children
        .into_iter()
        .next()
        .map(|child| child.data)
        .ok_or_else(|| CoreError::InvalidPayload("listing has no children".into()))
}

/// Classifies a listing payload.
///
/// Returns `Ok(None)` when the hosting domain is not supported. Errors are
/// reserved for payloads that are not a Reddit listing at all.
pub fn classify(payload: &Value) -> CoreResult<Option<Classified>> {
    let post = parse_post(payload)?.unwrap_crosspost();

    match Platform::from_domain(&post.domain) {
        Some(platform) => {
            log::info!("Classified {} as {}", post.domain, platform);
            Ok(Some(Classified { platform, post }))
        }
        None => {
            log::info!("Unsupported hosting domain: {}", post.domain);
            Ok(None)
        }
    }
}
