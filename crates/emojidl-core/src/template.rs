//! URL templates for the metadata endpoint and the image CDN.
//!
//! Placeholders: `{id}` (metadata), `{hash}` and `{prefix}` (image). The
//! prefix is the first two characters of the hash, which the CDN uses as a
//! directory shard.

use anyhow::{Context, Result};
use url::Url;

/// Render the metadata URL for `id`.
pub fn metadata_url(template: &str, id: u64) -> String {
    template.replace("{id}", &id.to_string())
}

/// Render the image URL for a content hash. Fails if the hash is too short
/// to produce the two-character shard prefix.
pub fn image_url(template: &str, hash: &str) -> Result<String> {
    let prefix = hash
        .get(..2)
        .with_context(|| format!("hash too short for shard prefix: {:?}", hash))?;
    Ok(template.replace("{prefix}", prefix).replace("{hash}", hash))
}

/// Render both templates with sample values and make sure they parse as URLs.
pub fn check_templates(metadata_template: &str, image_template: &str) -> Result<()> {
    let meta = metadata_url(metadata_template, 1);
    Url::parse(&meta).with_context(|| format!("invalid metadata URL template: {}", meta))?;
    let image = image_url(image_template, "00000000000000000000000000000000")?;
    Url::parse(&image).with_context(|| format!("invalid image URL template: {}", image))?;
    Ok(())
}
