use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::cache::RateTable;
use crate::core::currency::CurrencyCode;
use crate::core::error::FetchError;
use crate::core::rates::RateSource;

/// Rate source backed by the public exchangerate-api.com `latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateTable, FetchError> {
        let url = format!("{}/{}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxconv/1.0")
            .build()
            .map_err(|e| FetchError::Connect(e.to_string()))?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Connect(format!("{e} for base currency: {base}")))?;

        debug!(status = %response.status(), "Received rates response");

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Connect(e.to_string()))?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::Malformed(format!("failed to parse JSON for {base}: {e}")))?;

        let rates = data
            .rates
            .ok_or_else(|| FetchError::Malformed(format!("no rates field for {base}")))?;
        if rates.is_empty() {
            return Err(FetchError::Malformed(format!("empty rates for {base}")));
        }

        Ok(rates
            .into_iter()
            .filter_map(|(code, rate)| CurrencyCode::parse(&code).map(|code| (code, rate)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    async fn create_mock_server(base: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/{base}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "base": "USD",
            "date": "2024-01-01",
            "time_last_updated": 1704067200,
            "rates": {
                "USD": 1,
                "EUR": 0.85,
                "GBP": 0.75,
                "JPY": 141.5
            }
        }"#;
        let mock_server = create_mock_server("USD", 200, mock_response).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri());
        let rates = provider.fetch_rates(&usd()).await.unwrap();

        assert_eq!(rates.len(), 4);
        assert_eq!(rates.get(&CurrencyCode::parse("EUR").unwrap()), Some(&0.85));
        assert_eq!(rates.get(&usd()), Some(&1.0));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server = create_mock_server("USD", 200, r#"{"rates": {"EUR": 0.9}}"#).await;

        let provider = ExchangeRateApiProvider::new(&format!("{}/", mock_server.uri()));
        let rates = provider.fetch_rates(&usd()).await.unwrap();
        assert_eq!(rates.len(), 1);
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server("USD", 500, "").await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri());
        let result = provider.fetch_rates(&usd()).await;
        assert_eq!(result, Err(FetchError::Status(500)));
    }

    #[tokio::test]
    async fn test_missing_rates_field() {
        let mock_server =
            create_mock_server("USD", 200, r#"{"result": "error", "error-type": "x"}"#).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri());
        let result = provider.fetch_rates(&usd()).await;
        assert_eq!(
            result,
            Err(FetchError::Malformed("no rates field for USD".to_string()))
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = create_mock_server("USD", 200, "<html>oops</html>").await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri());
        let result = provider.fetch_rates(&usd()).await;
        match result {
            Err(FetchError::Malformed(msg)) => {
                assert!(msg.contains("failed to parse JSON for USD"))
            }
            other => panic!("Expected malformed response error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_rates() {
        let mock_server = create_mock_server("USD", 200, r#"{"rates": {}}"#).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri());
        let result = provider.fetch_rates(&usd()).await;
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_connection_failure() {
        // Nothing listens on the discard port
        let provider = ExchangeRateApiProvider::new("http://127.0.0.1:9");
        let result = provider.fetch_rates(&usd()).await;
        assert!(matches!(result, Err(FetchError::Connect(_))));
    }
}
