use reqwest::{header::HeaderValue, Client, Url};
use tracing::{debug, trace};

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Single GET, no retry. Non-success statuses are errors.
pub async fn fetch_text(url: Url) -> reqwest::Result<String> {
    debug!("GET {url}");

    let response_text = Client::new()
        .get(url)
        .header(reqwest::header::USER_AGENT, HeaderValue::from_static(USER_AGENT))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    trace!(%response_text);

    Ok(response_text)
}

/// `Some(url)` when `source` is an absolute http(s) URL, `None` for anything to be read from disk.
pub fn remote_url(source: &str) -> Option<Url> {
    Url::parse(source)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}
