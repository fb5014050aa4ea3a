//! VirusTotal v3 API client.

use super::{LookupError, RawResponse, ReputationApi};
use crate::config::Config;
use crate::entry::EntryKind;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Authenticated client for the VirusTotal IP and domain endpoints.
pub struct VirusTotalClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl VirusTotalClient {
    /// Create a new client.
    pub fn new(config: &Config, api_key: String) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Lookup URL for an entry.
    pub fn url_for(&self, kind: EntryKind, entry: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.endpoint(), entry)
    }
}

#[async_trait]
impl ReputationApi for VirusTotalClient {
    async fn fetch(&self, kind: EntryKind, entry: &str) -> Result<RawResponse, LookupError> {
        let url = self.url_for(kind, entry);

        debug!(entry = %entry, kind = %kind, "Querying VirusTotal");

        let response = self
            .client
            .get(&url)
            .header("x-apikey", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(entry = %entry, status = status, bytes = body.len(), "VirusTotal responded");

        Ok(RawResponse { status, body })
    }

    fn name(&self) -> &str {
        "virustotal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config(base_url: &str) -> Config {
        Config {
            base_url: base_url.to_string(),
            request_timeout_seconds: 5,
            ..Config::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = create_test_config("https://www.virustotal.com/api/v3/");
        let client = VirusTotalClient::new(&config, "test-key".to_string()).unwrap();

        assert_eq!(
            client.url_for(EntryKind::Ip, "8.8.8.8"),
            "https://www.virustotal.com/api/v3/ip_addresses/8.8.8.8"
        );
        assert_eq!(
            client.url_for(EntryKind::Domain, "example.com"),
            "https://www.virustotal.com/api/v3/domains/example.com"
        );
        assert_eq!(client.name(), "virustotal");
    }

    #[tokio::test]
    async fn test_fetch_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/domains/example.com"))
            .and(header("x-apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{}}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            VirusTotalClient::new(&create_test_config(&server.uri()), "test-key".to_string())
                .unwrap();
        let response = client.fetch(EntryKind::Domain, "example.com").await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"data":{}}"#);
    }

    #[tokio::test]
    async fn test_fetch_passes_status_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ip_addresses/8.8.8.8"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client =
            VirusTotalClient::new(&create_test_config(&server.uri()), "test-key".to_string())
                .unwrap();
        let response = client.fetch(EntryKind::Ip, "8.8.8.8").await.unwrap();

        assert!(response.is_rate_limited());
    }

    #[tokio::test]
    async fn test_fetch_connection_error() {
        // Nothing listens on port 1.
        let client = VirusTotalClient::new(
            &create_test_config("http://127.0.0.1:1"),
            "test-key".to_string(),
        )
        .unwrap();

        let result = client.fetch(EntryKind::Ip, "8.8.8.8").await;
        assert!(matches!(
            result,
            Err(LookupError::Http(_)) | Err(LookupError::Timeout)
        ));
    }
}
