//! Emoji pack metadata: parsing and image target planning.
//!
//! A pack is a display name plus a list of `(name, hash)` emoji references.
//! Each reference maps to one image URL and one file under
//! `<out_dir>/<pack name>/<emoji name>.png`.

mod parse;
mod sanitize;

pub use sanitize::sanitize_component;

use sanitize::{truncate_bytes, NAME_MAX};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::template;

/// Directory name used when a pack name sanitizes to nothing.
const UNNAMED_PACK: &str = "unnamed";

/// File stem used when both the emoji name and its hash sanitize to nothing.
const UNNAMED_EMOJI: &str = "emoji";

/// Cap on the hash part of a disambiguating suffix.
const SUFFIX_HASH_MAX: usize = 64;

/// Why a metadata file could not be turned into a `Pack`.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("no JSON object in metadata file")]
    NoJsonObject,
    #[error("invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("metadata has no pack name (data.baseInfo[0].name)")]
    MissingPackName,
}

/// One emoji reference from `data.md5Info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiRef {
    pub name: String,
    /// Content hash; also the CDN key.
    pub hash: String,
}

#[derive(Debug, Clone)]
pub struct Pack {
    pub name: String,
    pub emojis: Vec<EmojiRef>,
}

/// A planned image download.
#[derive(Debug, Clone)]
pub struct ImageJob {
    pub url: String,
    pub path: PathBuf,
    pub emoji: EmojiRef,
}

/// Emoji entries that could not be planned (e.g. hash too short).
#[derive(Debug)]
pub struct InvalidEmoji {
    pub emoji: EmojiRef,
    pub reason: String,
}

/// Parse metadata text (JS-wrapped JSON) into a `Pack`.
pub fn parse_pack(text: &str) -> Result<Pack, PackError> {
    parse::parse_pack(text)
}

/// Read and parse a metadata file.
pub fn load_pack(path: &Path) -> Result<Pack> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let pack = parse_pack(&text).with_context(|| format!("parse {}", path.display()))?;
    Ok(pack)
}

/// Async wrapper: runs `load_pack` on the blocking pool.
pub async fn load_pack_async(path: PathBuf) -> Result<Pack> {
    tokio::task::spawn_blocking(move || load_pack(&path))
        .await
        .context("pack load task join")?
}

/// `base` with `suffix` appended, shortening `base` so the result fits `NAME_MAX`.
fn with_suffix(base: &str, suffix: &str) -> String {
    let room = NAME_MAX.saturating_sub(suffix.len());
    format!("{}{}", truncate_bytes(base, room), suffix)
}

/// First of `base`, `base_<hash>`, `base_<hash>_2`, ... not yet in `used`; records it.
fn unique_stem(used: &mut HashSet<String>, base: &str, hash: &str) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    let hash = truncate_bytes(hash, SUFFIX_HASH_MAX);
    let mut n = 1u32;
    loop {
        let suffix = if n == 1 {
            format!("_{}", hash)
        } else {
            format!("_{}_{}", hash, n)
        };
        let candidate = with_suffix(base, &suffix);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

impl Pack {
    /// Directory component for this pack.
    pub fn dir_name(&self) -> String {
        let s = sanitize_component(&self.name);
        if s.is_empty() {
            UNNAMED_PACK.to_string()
        } else {
            s
        }
    }

    /// Plan one download per emoji. Names that sanitize to nothing fall back to
    /// the hash. Every job gets a distinct path: a taken name gets `_<hash>`,
    /// then `_<hash>_<n>`, appended, with the name shortened to stay under `NAME_MAX`.
    pub fn image_jobs(&self, out_dir: &Path, url_template: &str) -> (Vec<ImageJob>, Vec<InvalidEmoji>) {
        let pack_dir = out_dir.join(self.dir_name());
        let mut jobs = Vec::with_capacity(self.emojis.len());
        let mut invalid = Vec::new();
        let mut used: HashSet<String> = HashSet::new();

        for emoji in &self.emojis {
            let url = match template::image_url(url_template, &emoji.hash) {
                Ok(u) => u,
                Err(e) => {
                    invalid.push(InvalidEmoji {
                        emoji: emoji.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let hash = sanitize_component(&emoji.hash);
            let mut base = sanitize_component(&emoji.name);
            if base.is_empty() {
                base = if hash.is_empty() {
                    UNNAMED_EMOJI.to_string()
                } else {
                    hash.clone()
                };
            }
            let stem = unique_stem(&mut used, &base, &hash);

            jobs.push(ImageJob {
                url,
                path: pack_dir.join(format!("{}.png", stem)),
                emoji: emoji.clone(),
            });
        }

        (jobs, invalid)
    }
}
