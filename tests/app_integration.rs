use fxconv::core::config::{AppConfig, ProviderConfig};
use fxconv::core::controller::{InteractionController, Renderer, Selection};
use fxconv::core::{ConversionResult, ConvertError, CurrencyCode, FetchError};
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USD_RATES: &str = r#"{
    "base": "USD",
    "date": "2024-01-01",
    "rates": {
        "USD": 1,
        "EUR": 0.85,
        "GBP": 0.75,
        "JPY": 141.5
    }
}"#;

mod test_utils {
    use super::*;

    pub async fn create_mock_server(base: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/{base}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn config_for(mock_server: &MockServer) -> AppConfig {
        AppConfig {
            provider: ProviderConfig {
                base_url: mock_server.uri(),
            },
            ..AppConfig::default()
        }
    }

    pub fn write_config(mock_server: &MockServer) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            provider:
              base_url: {}
            default_from: "USD"
            default_to: "EUR"
        "#,
            mock_server.uri()
        );
        fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock() {
    let mock_server = test_utils::create_mock_server("USD", 200, USD_RATES).await;
    let config_file = test_utils::write_config(&mock_server);

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "100".to_string(),
            from: None,
            to: vec!["EUR".to_string(), "gbp".to_string()],
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );

    // Both targets share the USD table
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_convert_command_reports_missing_rate() {
    let mock_server = test_utils::create_mock_server("USD", 200, USD_RATES).await;
    let config_file = test_utils::write_config(&mock_server);

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "50".to_string(),
            from: Some("USD".to_string()),
            to: vec!["XYZ".to_string()],
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let error = result.expect_err("Expected a missing rate error");
    assert_eq!(error.to_string(), "Exchange rate not available for XYZ");
}

#[test_log::test(tokio::test)]
async fn test_convert_command_rejects_zero_without_fetching() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(USD_RATES))
        .expect(0)
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server);

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "0".to_string(),
            from: None,
            to: vec![],
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let error = result.expect_err("Expected an invalid amount error");
    assert_eq!(error.to_string(), "Amount must be greater than 0");
}

#[test_log::test(tokio::test)]
async fn test_engine_caches_rates_per_base() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(USD_RATES))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = fxconv::build_engine(&test_utils::config_for(&mock_server));

    let eur = engine.convert(Some(100.0), "USD", "EUR").await.unwrap();
    info!(?eur, "First conversion");
    assert!((eur.converted_amount - 85.0).abs() < 1e-9);
    assert_eq!(eur.rate_text, "1 USD = 0.8500 EUR");
    assert_eq!(eur.display_text, "€85.00");

    let jpy = engine.convert(Some(2.0), "usd", "jpy").await.unwrap();
    assert_eq!(jpy.display_text, "¥283.00");
}

#[test_log::test(tokio::test)]
async fn test_server_error_leaves_cache_untouched() {
    let mock_server = test_utils::create_mock_server("USD", 500, "").await;
    let engine = fxconv::build_engine(&test_utils::config_for(&mock_server));

    let result = engine.convert(Some(10.0), "USD", "EUR").await;
    assert_eq!(result, Err(ConvertError::Network(FetchError::Status(500))));

    let usd = CurrencyCode::parse("USD").unwrap();
    assert!(engine.provider().snapshot(&usd).await.is_none());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let result = fxconv::run_command(
        fxconv::AppCommand::Currencies,
        Some("/nonexistent/fxconv/config.yaml"),
    )
    .await;
    assert!(result.is_err());
}

#[derive(Default)]
struct RecordingRenderer {
    results: Mutex<Vec<Result<String, String>>>,
}

impl Renderer for RecordingRenderer {
    fn loading(&self, _active: bool) {}

    fn success(&self, result: &ConversionResult) {
        self.results
            .lock()
            .unwrap()
            .push(Ok(result.display_text.clone()));
    }

    fn error(&self, error: &ConvertError) {
        self.results.lock().unwrap().push(Err(error.to_string()));
    }
}

#[test_log::test(tokio::test)]
async fn test_interactive_session_against_mock_api() {
    let mock_server = test_utils::create_mock_server("USD", 200, USD_RATES).await;
    let eur_rates = r#"{"rates": {"USD": 1.2, "EUR": 1}}"#;
    Mock::given(method("GET"))
        .and(path("/EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_string(eur_rates))
        .mount(&mock_server)
        .await;

    let renderer = Arc::new(RecordingRenderer::default());
    let mut controller = InteractionController::new(
        fxconv::build_engine(&test_utils::config_for(&mock_server)),
        renderer.clone(),
        Selection::new(CurrencyCode::parse("USD"), CurrencyCode::parse("EUR")),
        // Long enough that typed amounts never fire during the test
        Duration::from_secs(60),
    );

    controller.amount_changed("10");
    controller.submit().await;
    controller.swap().await;
    controller.amount_changed("abc");
    controller.submit().await;

    let results = renderer.results.lock().unwrap().clone();
    assert_eq!(
        results,
        vec![
            Ok("€8.50".to_string()),
            Ok("$12.00".to_string()),
            Err("Amount must be greater than 0".to_string()),
        ]
    );
}
