//! Plain HTTP GET of a whole body.
//!
//! Uses the curl crate (libcurl) with one Easy handle per request. Blocking;
//! call from `spawn_blocking` if used from async code.

mod error;

pub use error::FetchError;

use std::time::Duration;

/// Per-request client settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
            user_agent: None,
        }
    }
}

/// GET `url` and return the body. Follows redirects.
///
/// 404 maps to `FetchError::NotFound`, other non-2xx codes to
/// `FetchError::Status`; the body of a failed response is discarded.
pub fn get(url: &str, opts: &HttpOptions) -> Result<Vec<u8>, FetchError> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    if let Some(ua) = &opts.user_agent {
        easy.useragent(ua)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    error::check_status(code)?;
    tracing::trace!(url, bytes = body.len(), "GET ok");
    Ok(body)
}

/// Runs `get` on the blocking pool.
pub async fn get_blocking(url: String, opts: HttpOptions) -> Result<Vec<u8>, FetchError> {
    tokio::task::spawn_blocking(move || get(&url, &opts)).await?
}
