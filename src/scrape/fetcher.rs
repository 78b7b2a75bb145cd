//! HTTP page retrieval with strict HTML-only acceptance.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

/// Outcome of one page fetch. Failures never propagate; they carry a reason
/// so callers and tests can distinguish causes.
#[derive(Debug)]
pub enum FetchOutcome {
    Html(String),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Anything other than a 200 response.
    HttpStatus(u16),
    /// 200, but the Content-Type did not declare `text/html`.
    NotHtml,
    /// Connection error, timeout, or a body that failed to read.
    Transport,
}

impl FetchOutcome {
    pub fn html(self) -> Option<String> {
        match self {
            FetchOutcome::Html(body) => Some(body),
            FetchOutcome::Skipped(_) => None,
        }
    }
}

/// GETs `url` and returns the body only for a 200 response whose
/// Content-Type declares `text/html`.
pub(crate) async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(target: "page_fetch", "GET {} failed: {}", url, e);
            return FetchOutcome::Skipped(SkipReason::Transport);
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!(target: "page_fetch", "GET {} returned status {}", url, status);
        return FetchOutcome::Skipped(SkipReason::HttpStatus(status.as_u16()));
    }

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains("text/html"));
    if !is_html {
        tracing::debug!(target: "page_fetch", "GET {} returned non-HTML content", url);
        return FetchOutcome::Skipped(SkipReason::NotHtml);
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Html(body),
        Err(e) => {
            tracing::debug!(target: "page_fetch", "GET {} body read failed: {}", url, e);
            FetchOutcome::Skipped(SkipReason::Transport)
        }
    }
}
