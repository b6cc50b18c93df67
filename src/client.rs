use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::models::{ActivityDirectory, ErrorResponse, MutationResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Backend responded with status {0}")]
    Status(StatusCode),
    #[error("Backend rejected the request with status {status}")]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
}

impl ClientError {
    /// The backend-provided reason for a rejected mutation, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Client for the activities API.
#[derive(Clone)]
pub struct ActivitiesClient {
    client: reqwest::Client,
    base_url: Arc<Url>,
}

impl ActivitiesClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
        }
    }

    fn activities_url(&self) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}/activities", self.base()))?)
    }

    /// `{base}/activities/{name}/signup?email={email}` with both values
    /// percent-encoded exactly as given.
    pub fn signup_url(&self, activity: &str, email: &str) -> Result<Url, ClientError> {
        let url = format!(
            "{}/activities/{}/signup?email={}",
            self.base(),
            urlencoding::encode(activity),
            urlencoding::encode(email)
        );
        Ok(Url::parse(&url)?)
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub async fn fetch_activities(&self) -> Result<ActivityDirectory, ClientError> {
        let url = self.activities_url()?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(response.json::<ActivityDirectory>().await?)
    }

    pub async fn signup(&self, activity: &str, email: &str) -> Result<String, ClientError> {
        let url = self.signup_url(activity, email)?;
        let response = self.client.post(url).send().await?;
        Self::mutation_result(response).await
    }

    pub async fn unregister(&self, activity: &str, email: &str) -> Result<String, ClientError> {
        let url = self.signup_url(activity, email)?;
        let response = self.client.delete(url).send().await?;
        Self::mutation_result(response).await
    }

    async fn mutation_result(response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        if status.is_success() {
            let body = response.json::<MutationResponse>().await?;
            return Ok(body.message);
        }

        let body = response
            .json::<ErrorResponse>()
            .await
            .map_err(|err| tracing::debug!(error = %err, "error body is not structured"))
            .unwrap_or_default();
        Err(ClientError::Rejected {
            status,
            detail: body.detail,
        })
    }
}
