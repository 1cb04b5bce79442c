//! Decode a metadata file into a `Pack`.
//!
//! Files are a JavaScript assignment around a JSON object, e.g.
//! `var xydata = {"data": {...}};`. Only the outermost object is read.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{EmojiRef, Pack, PackError};

#[derive(Debug, Deserialize)]
struct MetadataFile {
    data: MetadataBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataBody {
    #[serde(default)]
    base_info: Vec<BaseInfo>,
    #[serde(default, deserialize_with = "null_as_empty")]
    md5_info: Vec<RawEmoji>,
}

#[derive(Debug, Deserialize)]
struct BaseInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawEmoji {
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    md5: String,
}

/// Strings as-is, numbers and bools stringified, null/missing as empty.
fn lenient_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

/// Slice from the first `{` to the last `}` inclusive.
pub(crate) fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

pub(crate) fn parse_pack(text: &str) -> Result<Pack, PackError> {
    let json = json_object_span(text).ok_or(PackError::NoJsonObject)?;
    let file: MetadataFile = serde_json::from_str(json)?;

    let name = file
        .data
        .base_info
        .into_iter()
        .next()
        .map(|b| b.name)
        .filter(|n| !n.trim().is_empty())
        .ok_or(PackError::MissingPackName)?;

    let emojis = file
        .data
        .md5_info
        .into_iter()
        .map(|e| EmojiRef {
            name: e.name,
            hash: e.md5,
        })
        .collect();

    Ok(Pack { name, emojis })
}
