//! Notebook backend HTTP client.
//!
//! [`NotebookClient`] is the `reqwest` implementation of [`NotebookApi`].
//! Workflows depend on the trait so tests can substitute a mock.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::ServerConfig;

use super::error::{ApiError, Result};
use super::types::{ErrorBody, Notebook, RenameRequest};

/// Backend operations used by the client.
///
/// Source names appearing in URL paths are percent-encoded by the
/// implementation; callers pass plain names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotebookApi: Send + Sync {
    /// `GET /api/notebooks`
    async fn list_notebooks(&self) -> Result<Vec<Notebook>>;

    /// `POST /api/notebooks` - returns the created notebook echoed back.
    async fn create_notebook(&self, notebook: &Notebook) -> Result<Notebook>;

    /// `GET /api/notebooks/{id}`
    async fn get_notebook(&self, id: i64) -> Result<Notebook>;

    /// `DELETE /api/notebooks/{id}`
    async fn delete_notebook(&self, id: i64) -> Result<()>;

    /// `POST /api/notebooks/{id}/sources` - multipart upload, field `file`.
    async fn upload_source(&self, notebook_id: i64, file_name: &str, bytes: Vec<u8>)
        -> Result<()>;

    /// `DELETE /api/notebooks/{id}/sources/{name}`
    async fn delete_source(&self, notebook_id: i64, name: &str) -> Result<()>;

    /// `PUT /api/notebooks/{id}/sources/{name}` with `{"newName": ...}`
    async fn rename_source(&self, notebook_id: i64, name: &str, new_name: &str) -> Result<()>;
}

/// `reqwest`-backed client for the notebook backend.
pub struct NotebookClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl NotebookClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notebook_url(&self, id: i64) -> String {
        format!("{}/api/notebooks/{id}", self.base_url)
    }

    fn source_url(&self, notebook_id: i64, name: &str) -> String {
        format!(
            "{}/api/notebooks/{notebook_id}/sources/{}",
            self.base_url,
            urlencoding::encode(name)
        )
    }

    /// Translate a non-2xx response into an [`ApiError`].
    ///
    /// The backend is inconsistent about error bodies: some endpoints
    /// return JSON `{"detail": ...}`, others plain text. Prefer the
    /// structured field, fall back to the raw body.
    async fn error_from_response(response: reqwest::Response, what: &str) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.detail,
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => format!("Request failed with status {}", status.as_u16()),
        };

        if status == reqwest::StatusCode::NOT_FOUND {
            ApiError::NotFound(format!("{what}: {detail}"))
        } else {
            ApiError::server(status.as_u16(), detail)
        }
    }
}

#[async_trait]
impl NotebookApi for NotebookClient {
    async fn list_notebooks(&self) -> Result<Vec<Notebook>> {
        let url = format!("{}/api/notebooks", self.base_url);
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "notebooks").await);
        }
        Ok(response.json().await?)
    }

    async fn create_notebook(&self, notebook: &Notebook) -> Result<Notebook> {
        let url = format!("{}/api/notebooks", self.base_url);
        let response = self.http_client.post(&url).json(notebook).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "notebook").await);
        }
        let created: Notebook = response.json().await?;
        log::info!("Created notebook {} ({})", created.id, created.title);
        Ok(created)
    }

    async fn get_notebook(&self, id: i64) -> Result<Notebook> {
        let response = self.http_client.get(self.notebook_url(id)).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, &format!("notebook {id}")).await);
        }
        Ok(response.json().await?)
    }

    async fn delete_notebook(&self, id: i64) -> Result<()> {
        let response = self
            .http_client
            .delete(self.notebook_url(id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, &format!("notebook {id}")).await);
        }
        log::info!("Deleted notebook {id}");
        Ok(())
    }

    async fn upload_source(
        &self,
        notebook_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<()> {
        let url = format!("{}/api/notebooks/{notebook_id}/sources", self.base_url);
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self.http_client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, &format!("notebook {notebook_id}")).await);
        }
        log::info!("Uploaded {file_name} to notebook {notebook_id}");
        Ok(())
    }

    async fn delete_source(&self, notebook_id: i64, name: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.source_url(notebook_id, name))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, &format!("source {name}")).await);
        }
        log::info!("Deleted source {name} from notebook {notebook_id}");
        Ok(())
    }

    async fn rename_source(&self, notebook_id: i64, name: &str, new_name: &str) -> Result<()> {
        let response = self
            .http_client
            .put(self.source_url(notebook_id, name))
            .json(&RenameRequest { new_name })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, &format!("source {name}")).await);
        }
        log::info!("Renamed source {name} -> {new_name} in notebook {notebook_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = NotebookClient::new("http://localhost:8000/", Duration::from_secs(5));
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_source_url_percent_encodes_name() {
        let client = NotebookClient::new("http://localhost:8000", Duration::from_secs(5));
        assert_eq!(
            client.source_url(7, "course plan.pdf"),
            "http://localhost:8000/api/notebooks/7/sources/course%20plan.pdf"
        );
    }
}
