//! Conditional GET against the upstream
//!
//! Sends `If-Modified-Since` when a prior entry carries a validator and
//! interprets the reply:
//! - 304: keep the prior entry, take the new `Expires`/`Last-Modified`
//! - 2xx: decode the body, take the new `Expires`/`Last-Modified`
//! - anything else: `Error::UpstreamStatus`

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, EXPIRES, IF_MODIFIED_SINCE, LAST_MODIFIED, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::cache::meta::{CacheMeta, Cached};
use crate::core::error::{Error, Result};
use crate::core::util::{format_http_date, parse_http_date};
use crate::upstream::Source;

/// HTTP fetcher honoring the conditional-revalidation contract
#[derive(Debug, Clone)]
pub struct ConditionalFetcher {
    client: Client,
    client_id: HeaderValue,
}

impl ConditionalFetcher {
    /// Build a fetcher identifying itself with `client_id` (sent as `User-Agent`).
    pub fn new(client_id: &str, timeout: Duration) -> Result<Self> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(Error::MissingClientId);
        }
        let header = HeaderValue::from_str(client_id)
            .map_err(|_| Error::InvalidClientId(client_id.to_string()))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            client_id: header,
        })
    }

    pub fn client_id(&self) -> &str {
        self.client_id.to_str().unwrap_or_default()
    }
}

impl<T> Source<T> for ConditionalFetcher
where
    T: DeserializeOwned + Send,
{
    fn fetch(&self, url: &str, prior: Option<Cached<T>>) -> Result<Cached<T>> {
        let mut request = self.client.get(url).header(USER_AGENT, self.client_id.clone());

        if let Some(prior) = prior.as_ref().filter(|p| p.meta.has_validator()) {
            let since = format_http_date(&prior.meta.last_modified);
            tracing::debug!(url, if_modified_since = %since, "conditional request");
            request = request.header(IF_MODIFIED_SINCE, since);
        } else {
            tracing::debug!(url, "unconditional request");
        }

        let response = request.send()?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            let meta = freshness(response.headers())?;
            let prior = prior.ok_or(Error::UnexpectedNotModified)?;
            tracing::debug!(url, "not modified");
            return Ok(Cached::new(prior.entry, meta));
        }

        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        let meta = freshness(response.headers())?;
        let body = response.bytes()?;
        let entry = serde_json::from_slice(&body).map_err(Error::Decode)?;
        tracing::debug!(url, bytes = body.len(), "downloaded new document");

        Ok(Cached::new(entry, meta))
    }
}

/// Both headers are mandatory; no expiry is ever guessed.
fn freshness(headers: &HeaderMap) -> Result<CacheMeta> {
    Ok(CacheMeta::new(
        header_date(headers, EXPIRES.as_str(), "Expires")?,
        header_date(headers, LAST_MODIFIED.as_str(), "Last-Modified")?,
    ))
}

fn header_date(headers: &HeaderMap, name: &str, label: &'static str) -> Result<DateTime<Utc>> {
    let value = headers.get(name).ok_or(Error::MissingHeader(label))?;
    let text = String::from_utf8_lossy(value.as_bytes());
    parse_http_date(&text).map_err(|source| Error::InvalidHeader {
        header: label,
        value: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorCategory;
    use chrono::TimeZone;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_new_rejects_empty_client_id() {
        let err = ConditionalFetcher::new("  ", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::MissingClientId));
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_new_rejects_invalid_header_value() {
        let err = ConditionalFetcher::new("bad\nid", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidClientId(_)));
    }

    #[test]
    fn test_client_id_is_trimmed() {
        let fetcher = ConditionalFetcher::new(" example.com/app ", Duration::from_secs(1)).unwrap();
        assert_eq!(fetcher.client_id(), "example.com/app");
    }

    #[test]
    fn test_freshness_parses_both_headers() {
        let map = headers(&[
            ("expires", "Wed, 01 May 2024 11:00:00 GMT"),
            ("last-modified", "Wed, 01 May 2024 10:00:00 GMT"),
        ]);
        let meta = freshness(&map).unwrap();
        assert_eq!(meta.expires, Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap());
        assert_eq!(meta.last_modified, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_freshness_requires_expires() {
        let map = headers(&[("last-modified", "Wed, 01 May 2024 10:00:00 GMT")]);
        assert!(matches!(freshness(&map), Err(Error::MissingHeader("Expires"))));
    }

    #[test]
    fn test_freshness_requires_last_modified() {
        let map = headers(&[("expires", "Wed, 01 May 2024 11:00:00 GMT")]);
        assert!(matches!(freshness(&map), Err(Error::MissingHeader("Last-Modified"))));
    }

    #[test]
    fn test_freshness_rejects_malformed_date() {
        let map = headers(&[
            ("expires", "0"),
            ("last-modified", "Wed, 01 May 2024 10:00:00 GMT"),
        ]);
        let err = freshness(&map).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { header: "Expires", .. }));
        assert_eq!(err.category(), ErrorCategory::Protocol);
    }
}
