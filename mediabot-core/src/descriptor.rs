// ============================================================================
// mediabot-core/src/descriptor.rs
// ============================================================================
//
// MEDIA DESCRIPTOR: The record describing a resolved piece of media
//
// A MediaDescriptor is created exactly once by an extraction adapter and then
// moved through the orchestrator and normalizer. It is immutable from the
// outside: pipeline stages that change the container produce a new value via
// `with_extension`.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Which orchestration branch a descriptor runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl MediaKind {
    /// The container every payload of this kind ends up in, if any.
    /// Images are never normalised.
    pub fn canonical_extension(self) -> Option<&'static str> {
        match self {
            MediaKind::Video => Some("mp4"),
            MediaKind::Audio => Some("mp3"),
            MediaKind::Image => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Image => write!(f, "image"),
        }
    }
}

/// Resolved media and everything needed to fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    source_url: String,
    kind: MediaKind,
    extension: String,
    title: Option<String>,
    caption: Option<String>,
    specialized_url: Option<String>,
    origin_json_url: Option<String>,
}

impl MediaDescriptor {
    /// Creates a descriptor for a direct media locator.
    ///
    /// The extension is stored lower-case without a leading dot.
    pub fn new(
        source_url: impl Into<String>,
        kind: MediaKind,
        extension: impl AsRef<str>,
    ) -> CoreResult<Self> {
        let source_url = source_url.into();
        if source_url.trim().is_empty() {
            return Err(CoreError::InvalidDescriptor(
                "source URL must not be empty".to_string(),
            ));
        }
        let extension = normalize_extension(extension.as_ref())?;

        Ok(Self {
            source_url,
            kind,
            extension,
            title: None,
            caption: None,
            specialized_url: None,
            origin_json_url: None,
        })
    }

    /// Enables the specialized extractor for this descriptor.
    ///
    /// Fails on an empty URL so that `uses_specialized_extractor()` always
    /// implies a usable locator.
    pub fn with_specialized_extractor(mut self, url: impl Into<String>) -> CoreResult<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(CoreError::InvalidDescriptor(
                "specialized extractor URL must not be empty".to_string(),
            ));
        }
        self.specialized_url = Some(url);
        Ok(self)
    }

    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption.filter(|c| !c.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_origin_json_url(mut self, url: Option<String>) -> Self {
        self.origin_json_url = url;
        self
    }

    /// Returns a copy of this descriptor advertising a different container.
    pub(crate) fn with_extension(self, extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
            ..self
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn uses_specialized_extractor(&self) -> bool {
        self.specialized_url.is_some()
    }

    pub fn specialized_url(&self) -> Option<&str> {
        self.specialized_url.as_deref()
    }

    pub fn origin_json_url(&self) -> Option<&str> {
        self.origin_json_url.as_deref()
    }
}

fn normalize_extension(extension: &str) -> CoreResult<String> {
    let extension = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::InvalidDescriptor(format!(
            "invalid container extension '{extension}'"
        )));
    }
    Ok(extension)
}

/// Final result of a resolution: the descriptor and the bytes it describes.
#[derive(Clone, PartialEq, Eq)]
pub struct Download {
    pub descriptor: MediaDescriptor,
    pub payload: Vec<u8>,
}

impl Download {
    pub fn new(descriptor: MediaDescriptor, payload: Vec<u8>) -> Self {
        Self {
            descriptor,
            payload,
        }
    }
}

impl fmt::Debug for Download {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Download")
            .field("descriptor", &self.descriptor)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
