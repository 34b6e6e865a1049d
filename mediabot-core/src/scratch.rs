//! Scratch file management.
//!
//! All intermediate files of the pipeline live in one shared scratch directory.
//! Every name combines the configured prefix, a random token and (optionally)
//! the sanitised post title, so concurrent invocations never collide. Files are
//! handed out as scoped handles from the tempfile crate, or as a [`ScratchStem`]
//! guard when an external tool picks the final name, so cleanup happens on drop
//! on every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tempfile::{Builder as TempFileBuilder, NamedTempFile, TempPath};

use crate::config::CoreConfig;
use crate::error::CoreResult;

/// Longest title fragment embedded into a scratch file name.
const MAX_TITLE_LEN: usize = 64;

/// Handle to the shared scratch directory.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
    prefix: String,
}

impl ScratchDir {
    /// Opens the scratch directory described by the config, creating it if absent.
    pub fn new(config: &CoreConfig) -> CoreResult<Self> {
        Self::open(&config.scratch_dir, &config.scratch_prefix)
    }

    pub fn open(root: &Path, prefix: &str) -> CoreResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            prefix: prefix.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Builds a fresh, unique name stem: `<prefix>_<token>[_<title>]`.
    pub fn new_stem(&self, title: Option<&str>) -> String {
        let token = random_token();
        match title.and_then(sanitize_title) {
            Some(title) => format!("{}_{}_{}", self.prefix, token, title),
            None => format!("{}_{}", self.prefix, token),
        }
    }

    /// Creates an empty scratch file. Deleted when the handle is dropped.
    pub fn create_file(&self, title: Option<&str>, extension: &str) -> CoreResult<NamedTempFile> {
        fs::create_dir_all(&self.root)?;
        let file = TempFileBuilder::new()
            .prefix(&format!("{}_", self.new_stem(title)))
            .suffix(&format!(".{extension}"))
            .tempfile_in(&self.root)?;
        Ok(file)
    }

    /// Reserves a unique scratch path without creating the file, for tools
    /// that write their own output. Whatever ends up at the path is removed
    /// when the handle is dropped.
    pub fn reserve_path(&self, title: Option<&str>, extension: &str) -> TempPath {
        let path = self
            .root
            .join(format!("{}.{}", self.new_stem(title), extension));
        TempPath::from_path(path)
    }

    /// Reserves a name stem. Every file in the scratch directory whose name
    /// starts with the stem is removed when the guard is dropped.
    pub fn reserve_stem(&self) -> ScratchStem {
        ScratchStem {
            dir: self.root.clone(),
            stem: self.new_stem(None),
        }
    }
}

/// Guard over all scratch files sharing one name stem.
#[derive(Debug)]
pub struct ScratchStem {
    dir: PathBuf,
    stem: String,
}

impl ScratchStem {
    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True if `path` lies in the scratch directory and carries this stem.
    pub fn owns(&self, path: &Path) -> bool {
        path.parent() == Some(self.dir.as_path())
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&self.stem))
    }

    fn sweep(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not scan scratch dir {}: {}", self.dir.display(), e);
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if self.owns(&path) && path.is_file() {
                match fs::remove_file(&path) {
                    Ok(()) => log::debug!("Removed scratch file {}", path.display()),
                    Err(e) => log::warn!("Failed to remove scratch file {}: {}", path.display(), e),
                }
            }
        }
    }
}

impl Drop for ScratchStem {
    fn drop(&mut self) {
        self.sweep();
    }
}

/// 16 hex characters from 8 random bytes.
pub fn random_token() -> String {
    let bytes: [u8; 8] = rand::thread_rng().r#gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Reduces a title to characters safe in any file system path.
///
/// ASCII letters, digits and `-` are kept, every other run of characters
/// collapses into a single `_`. Returns `None` if nothing usable is left.
pub fn sanitize_title(title: &str) -> Option<String> {
    let mut out = String::with_capacity(title.len().min(MAX_TITLE_LEN));
    let mut pending_separator = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
        if out.len() >= MAX_TITLE_LEN {
            break;
        }
    }

    out.truncate(MAX_TITLE_LEN);
    let out = out.trim_matches('_').to_string();
    (!out.is_empty()).then_some(out)
}
