//! HTTP transport used by the DataMall client.
//!
//! Everything goes through the [`HttpClient`] trait so auth decorators such as
//! [`ApiKey`] can be stacked on top of [`BasicClient`], and tests can swap in
//! a canned transport.

mod basic;
mod client;
pub mod auth;

pub use auth::ApiKey;
pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};
use reqwest::header::{ACCEPT, HeaderValue};

/// Issues a GET for `url` and returns the body bytes.
///
/// Any non-2xx status is turned into an error carrying the status and body.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: reqwest::Url) -> Result<Vec<u8>> {
    let mut req = reqwest::Request::new(reqwest::Method::GET, url.clone());
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("request to {url} failed"))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("{url} returned status {status}: {body}");
    }

    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("failed to read body from {url}"))?;
    Ok(bytes.to_vec())
}


#[cfg(test)]
mod tests {
    use super::testing::CannedClient;
    use super::*;

    #[tokio::test]
    async fn test_fetch_bytes_sends_accept_header() {
        let client = CannedClient::default().with("https://example.test/feed", 200, "{}");
        let url = reqwest::Url::parse("https://example.test/feed").unwrap();

        let bytes = fetch_bytes(&client, url).await.unwrap();

        assert_eq!(bytes, b"{}");
        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].headers()[ACCEPT], "application/json");
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_error_status() {
        let client =
            CannedClient::default().with("https://example.test/feed", 401, "bad AccountKey");
        let url = reqwest::Url::parse("https://example.test/feed").unwrap();

        let err = fetch_bytes(&client, url).await.unwrap_err().to_string();

        assert!(err.contains("401"));
        assert!(err.contains("bad AccountKey"));
    }
}
