//! Reading timetables from disk or from a calendar feed URL.

use anyhow::{Context, Result};
use chills_core::constants::MAX_ICS_BYTES;
use tracing::debug;
use url::Url;

/// Whether a source looks like a URL rather than a file path.
pub fn is_url(source: &str) -> bool {
    source.trim().contains("://")
}

/// Parse a feed address, rewriting `webcal://` to `https://`.
/// Only http and https feeds are fetched.
pub fn feed_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let rewritten = match raw.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("webcal") => format!("https://{rest}"),
        _ => raw.to_string(),
    };

    let url = Url::parse(&rewritten).with_context(|| format!("Invalid timetable URL '{raw}'"))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!(
            "Unsupported URL scheme '{other}': use a webcal, https or http link"
        ),
    }
}

fn check_size(len: usize) -> Result<()> {
    if len > MAX_ICS_BYTES {
        anyhow::bail!(
            "Timetable is too large ({len} bytes, limit is {MAX_ICS_BYTES})"
        );
    }
    Ok(())
}

pub async fn fetch(url: &Url) -> Result<String> {
    debug!(%url, "fetching timetable");

    let response = reqwest::get(url.clone())
        .await
        .with_context(|| format!("Failed to fetch {url}"))?
        .error_for_status()
        .with_context(|| format!("Feed at {url} returned an error"))?;

    if let Some(len) = response.content_length() {
        check_size(usize::try_from(len).unwrap_or(usize::MAX))?;
    }

    let bytes = response
        .bytes()
        .await
        .context("Failed to read timetable body")?;
    check_size(bytes.len())?;

    String::from_utf8(bytes.to_vec()).context("Timetable is not valid UTF-8")
}

/// Read a timetable from a path or URL.
pub async fn read_source(source: &str) -> Result<String> {
    if is_url(source) {
        return fetch(&feed_url(source)?).await;
    }

    let content = tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("Could not read {source}"))?;
    check_size(content.len())?;
    Ok(content)
}
