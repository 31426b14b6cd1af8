//! Third-party video host client.
//!
//! Every course owns a project (folder) on the video host that its lecture
//! videos are uploaded into. Without an API token the client is disabled and
//! courses are created without a folder.

use async_trait::async_trait;
use rehla_config::VideoConfig;
use rehla_core::{Interface, RehlaError, RehlaResult};
use serde::Deserialize;
use shaku::Component;
use tracing::{debug, info, warn};

/// Video host operations used by the dashboard.
#[async_trait]
pub trait VideoHost: Interface + Send + Sync {
    /// Creates a project named `name` and returns its id.
    ///
    /// Returns `None` when the host is disabled.
    async fn create_folder(&self, name: &str) -> RehlaResult<Option<String>>;

    /// Deletes a video by its hashed id.
    async fn delete_video(&self, hashed_id: &str) -> RehlaResult<()>;

    /// Returns true when API calls are made.
    fn is_enabled(&self) -> bool;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    hashed_id: String,
}

/// Wistia API client.
#[derive(Component)]
#[shaku(interface = VideoHost)]
pub struct WistiaVideoHost {
    client: Option<reqwest::Client>,
    api_base_url: String,
    api_token: Option<String>,
}

impl WistiaVideoHost {
    /// Creates a client from configuration. A missing token disables it.
    pub fn new(config: &VideoConfig) -> RehlaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RehlaError::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client: Some(client),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    /// Creates a client that never calls the API.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            client: None,
            api_base_url: String::new(),
            api_token: None,
        }
    }

    fn credentials(&self) -> Option<(&reqwest::Client, &str)> {
        match (&self.client, &self.api_token) {
            (Some(client), Some(token)) => Some((client, token.as_str())),
            _ => None,
        }
    }

    fn external_error(message: impl std::fmt::Display) -> RehlaError {
        RehlaError::ExternalService {
            service: "video".to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl VideoHost for WistiaVideoHost {
    async fn create_folder(&self, name: &str) -> RehlaResult<Option<String>> {
        let Some((client, token)) = self.credentials() else {
            debug!("Video host disabled, skipping folder for '{}'", name);
            return Ok(None);
        };

        let response = client
            .post(format!("{}/projects.json", self.api_base_url))
            .bearer_auth(token)
            .json(&serde_json::json!({ "name": name, "public": true }))
            .send()
            .await
            .map_err(Self::external_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Video host rejected project '{}': {} {}", name, status, body);
            return Err(Self::external_error(format!("unexpected status {}", status)));
        }

        let project: ProjectResponse = response.json().await.map_err(Self::external_error)?;
        info!("Created video folder {} for '{}'", project.hashed_id, name);
        Ok(Some(project.hashed_id))
    }

    async fn delete_video(&self, hashed_id: &str) -> RehlaResult<()> {
        let Some((client, token)) = self.credentials() else {
            return Ok(());
        };
        if hashed_id.trim().is_empty() {
            return Ok(());
        }

        let response = client
            .delete(format!("{}/medias/{}.json", self.api_base_url, hashed_id))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(Self::external_error)?;

        if !response.status().is_success() {
            return Err(Self::external_error(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        info!("Deleted video {}", hashed_id);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.credentials().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_host_is_a_no_op() {
        let host = WistiaVideoHost::disabled();
        assert!(!host.is_enabled());
        assert_eq!(host.create_folder("Algebra I").await.unwrap(), None);
        assert!(host.delete_video("abc").await.is_ok());
    }

    #[test]
    fn test_blank_token_disables_client() {
        let config = VideoConfig {
            api_token: Some("  ".to_string()),
            ..VideoConfig::default()
        };
        let host = WistiaVideoHost::new(&config).unwrap();
        assert!(!host.is_enabled());
    }

    #[test]
    fn test_project_response_parsing() {
        let project: ProjectResponse =
            serde_json::from_str(r#"{"id": 1, "hashedId": "abc123", "name": "Algebra"}"#).unwrap();
        assert_eq!(project.hashed_id, "abc123");
    }
}
