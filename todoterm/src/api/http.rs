//! `reqwest`-backed [`TodoApi`] implementation.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use todoterm_proto::routes;
use todoterm_proto::{Task, TaskFields, TaskId, UserId};

use super::{ApiError, TodoApi};

/// HTTP client for a `/todos` server.
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTodoApi {
    /// Creates a client for the server rooted at `base_url`.
    ///
    /// A trailing `/` is trimmed, so `http://host/api/` and `http://host/api`
    /// are equivalent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` is blank or does
    /// not parse as an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Full URL for a resource path such as `/todos/3`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Request {
            message: e.to_string(),
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(format_http_error(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(|e| ApiError::Request {
            message: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }
}

impl TodoApi for HttpTodoApi {
    async fn list_tasks(&self, user_id: UserId) -> Result<Vec<Task>, ApiError> {
        let url = self.endpoint(&routes::list_path(user_id));
        tracing::debug!(%url, "GET");
        self.send_json(self.http.get(url)).await
    }

    async fn create_task(&self, fields: &TaskFields) -> Result<Task, ApiError> {
        let url = self.endpoint(routes::TODOS);
        tracing::debug!(%url, "POST");
        self.send_json(self.http.post(url).json(fields)).await
    }

    async fn update_task(&self, task: &Task) -> Result<Task, ApiError> {
        let url = self.endpoint(&routes::item_path(task.id));
        tracing::debug!(%url, "PATCH");
        self.send_json(self.http.patch(url).json(&task.fields())).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let url = self.endpoint(&routes::item_path(id));
        tracing::debug!(%url, "DELETE");
        self.send(self.http.delete(url)).await.map(drop)
    }
}

/// Builds an [`ApiError::Http`] from a status and raw body.
#[must_use]
pub fn format_http_error(status: StatusCode, body: &[u8]) -> ApiError {
    let body = String::from_utf8_lossy(body).trim().to_string();
    let body = if body.is_empty() {
        "<empty>".to_string()
    } else {
        body
    };
    ApiError::Http { status, body }
}

fn normalize_base_url(base_url: &str) -> Result<String, ApiError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
    }
    url::Url::parse(trimmed).map_err(|e| ApiError::InvalidBaseUrl(format!("{trimmed}: {e}")))?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_path() {
        let api = HttpTodoApi::new("http://localhost:3000/api/").unwrap();
        assert_eq!(
            api.endpoint(&routes::list_path(UserId::new(5))),
            "http://localhost:3000/api/todos?userId=5"
        );
        assert_eq!(
            api.endpoint(&routes::item_path(TaskId::new(9))),
            "http://localhost:3000/api/todos/9"
        );
    }

    #[test]
    fn blank_base_url_is_rejected() {
        assert!(matches!(
            HttpTodoApi::new("   "),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn relative_base_url_is_rejected() {
        assert!(matches!(
            HttpTodoApi::new("localhost/todos"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn http_error_keeps_status_and_trims_body() {
        let error = format_http_error(StatusCode::BAD_GATEWAY, b" upstream down ");
        assert_eq!(error.to_string(), "http 502 Bad Gateway: upstream down");

        let empty = format_http_error(StatusCode::NOT_FOUND, b"");
        assert_eq!(empty.to_string(), "http 404 Not Found: <empty>");
    }
}
