use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::http::HttpOptions;
use crate::template;

/// Endpoint serving one pack's metadata file per id.
pub const DEFAULT_METADATA_URL_TEMPLATE: &str =
    "https://gxh.vip.qq.com/qqshow/admindata/comdata/vipEmoji_item_{id}/xydata.js";

/// CDN path for a single emoji image, keyed by content hash.
pub const DEFAULT_IMAGE_URL_TEMPLATE: &str =
    "https://i.gtimg.cn/club/item/parcel/item/{prefix}/{hash}/300x300.png";

/// HTTP timeouts and client identity (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 60,
            user_agent: None,
        }
    }
}

impl From<&HttpConfig> for HttpOptions {
    fn from(c: &HttpConfig) -> Self {
        HttpOptions {
            connect_timeout: std::time::Duration::from_secs(c.connect_timeout_secs),
            timeout: std::time::Duration::from_secs(c.timeout_secs),
            user_agent: c.user_agent.clone(),
        }
    }
}

/// Global configuration loaded from `~/.config/emojidl/config.toml`.
///
/// Every field is a default for a CLI flag; flags win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojidlConfig {
    /// Metadata URL with an `{id}` placeholder.
    pub metadata_url_template: String,
    /// Image URL with `{hash}` and optional `{prefix}` (first two hash chars) placeholders.
    pub image_url_template: String,
    /// First id the sweep requests.
    pub start_id: u64,
    /// Parallel requests during the id sweep.
    pub sweep_concurrency: usize,
    /// Parallel requests while fetching images.
    pub image_concurrency: usize,
    /// Consecutive 404 ids (in id order) after which the sweep stops. 0 = never stop.
    pub stop_after_misses: u64,
    /// Where sweep writes `<id>.js` metadata files.
    pub data_dir: PathBuf,
    /// Root of the per-pack image directories.
    pub output_dir: PathBuf,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

impl Default for EmojidlConfig {
    fn default() -> Self {
        Self {
            metadata_url_template: DEFAULT_METADATA_URL_TEMPLATE.to_string(),
            image_url_template: DEFAULT_IMAGE_URL_TEMPLATE.to_string(),
            start_id: 213_443,
            sweep_concurrency: 25,
            image_concurrency: 20,
            stop_after_misses: 50,
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("downloaded"),
            http: None,
        }
    }
}

impl EmojidlConfig {
    /// HTTP options from the `[http]` section, or built-in defaults.
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions::from(&self.http.clone().unwrap_or_default())
    }

    /// Rejects templates that miss their placeholders or don't render to URLs, and zero-sized pools.
    pub fn validate(&self) -> Result<()> {
        if !self.metadata_url_template.contains("{id}") {
            anyhow::bail!(
                "metadata_url_template must contain {{id}}: {}",
                self.metadata_url_template
            );
        }
        if !self.image_url_template.contains("{hash}") {
            anyhow::bail!(
                "image_url_template must contain {{hash}}: {}",
                self.image_url_template
            );
        }
        if self.sweep_concurrency == 0 || self.image_concurrency == 0 {
            anyhow::bail!("concurrency values must be at least 1");
        }
        template::check_templates(&self.metadata_url_template, &self.image_url_template)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("emojidl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<EmojidlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = EmojidlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: EmojidlConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}
