use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

use super::PageFetcher;
use crate::config::FetchConfig;
use crate::error::DishError;

/// Plain HTTP GET fetcher with a browser-like User-Agent.
///
/// Every request waits `delay` first to keep the load on the target site
/// low. There is no retry: a failed fetch is returned to the caller as is.
pub struct RequestFetcher {
    client: Client,
    delay: Duration,
}

impl RequestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, DishError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            delay: config.delay(),
        })
    }
}

#[async_trait]
impl PageFetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DishError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("Fetched {} - Status: {}", url, status);

        if !status.is_success() {
            return Err(DishError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn no_delay() -> FetchConfig {
        FetchConfig {
            delay_ms: 0,
            ..FetchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let config = no_delay();
        let _m = server
            .mock("GET", "/page")
            .match_header("user-agent", config.user_agent.as_str())
            .with_status(200)
            .with_body("<html><body>ok</body></html>")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(&config).unwrap();
        let body = fetcher
            .fetch(&format!("{}/page", server.url()))
            .await
            .unwrap();

        assert!(body.contains("ok"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(&no_delay()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.url())).await;

        match result {
            Err(DishError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected HttpStatus error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/slow")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(b"<html>late</html>")
            })
            .create_async()
            .await;

        let config = FetchConfig {
            timeout_secs: 1,
            ..no_delay()
        };
        let fetcher = RequestFetcher::new(&config).unwrap();
        let result = fetcher.fetch(&format!("{}/slow", server.url())).await;

        match result {
            Err(DishError::Fetch(e)) => assert!(e.is_timeout(), "not a timeout: {e}"),
            other => panic!("expected Fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_waits_for_delay() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let config = FetchConfig {
            delay_ms: 200,
            ..FetchConfig::default()
        };
        let fetcher = RequestFetcher::new(&config).unwrap();
        let started = Instant::now();
        fetcher
            .fetch(&format!("{}/page", server.url()))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = FetchConfig {
            user_agent: "bad\nagent".to_string(),
            ..no_delay()
        };
        assert!(matches!(
            RequestFetcher::new(&config),
            Err(DishError::HeaderError(_))
        ));
    }
}
