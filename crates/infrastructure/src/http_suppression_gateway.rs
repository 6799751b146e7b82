use async_trait::async_trait;
use reqwest::header::{self, HeaderMap};
use serde::{Deserialize, Serialize};
use suppressor_application::SuppressionGateway;
use suppressor_core::{ApiBaseUrl, AppError, AppResult, SecretString, SessionToken};
use suppressor_domain::Suppression;
use tracing::{debug, error, info};

const AUTH_HEADER: &str = "x-redlock-auth";
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Prisma-style REST implementation of the suppression gateway.
///
/// Every call is a single request; there is no retry and no pagination.
pub struct HttpSuppressionGateway {
    http_client: reqwest::Client,
    api_url: ApiBaseUrl,
}

impl HttpSuppressionGateway {
    /// Creates a gateway for the given API root.
    #[must_use]
    pub fn new(http_client: reqwest::Client, api_url: ApiBaseUrl) -> Self {
        Self {
            http_client,
            api_url,
        }
    }

    fn authenticated_headers(token: &SessionToken) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(JSON_CONTENT_TYPE),
        );
        let mut token_value = header::HeaderValue::from_str(token.as_str()).map_err(|error| {
            AppError::Unauthorized(format!("session token is not a valid header value: {error}"))
        })?;
        token_value.set_sensitive(true);
        headers.insert(AUTH_HEADER, token_value);
        Ok(headers)
    }
}

#[async_trait]
impl SuppressionGateway for HttpSuppressionGateway {
    async fn login(&self, access_key: &str, secret_key: &SecretString) -> AppResult<SessionToken> {
        let endpoint = self.api_url.endpoint(&["login"])?;
        let response = self
            .http_client
            .post(endpoint)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(&LoginRequest {
                username: access_key,
                password: secret_key.expose(),
            })
            .send()
            .await
            .map_err(|error| {
                AppError::Unauthorized(format!("failed to call login endpoint: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response_body(response).await;
            return Err(AppError::Unauthorized(format!(
                "login endpoint returned status {}: {body}",
                status.as_u16()
            )));
        }

        let login_response = response.json::<LoginResponse>().await.map_err(|error| {
            AppError::Unauthorized(format!("failed to parse login response body: {error}"))
        })?;

        let token = login_response.token.ok_or_else(|| {
            AppError::Unauthorized("login response did not contain a token".to_owned())
        })?;

        SessionToken::new(token)
    }

    async fn list_suppressions(&self, token: &SessionToken) -> AppResult<Vec<Suppression>> {
        let endpoint = self
            .api_url
            .endpoint(&["code", "api", "v1", "suppressions"])?;
        let response = self
            .http_client
            .get(endpoint)
            .headers(Self::authenticated_headers(token)?)
            .send()
            .await
            .map_err(|error| {
                AppError::Upstream(format!("failed to call list suppressions endpoint: {error}"))
            })?;

        let status = response.status();
        debug!(status = %status, headers = ?response.headers(), "list suppressions response");
        if !status.is_success() {
            let body = response_body(response).await;
            error!(status = status.as_u16(), body = %body, "failed to list suppressions");
            return Err(AppError::Upstream(format!(
                "list suppressions endpoint returned status {}: {body}",
                status.as_u16()
            )));
        }

        response.json::<Vec<Suppression>>().await.map_err(|error| {
            AppError::Upstream(format!(
                "failed to parse list suppressions response body: {error}"
            ))
        })
    }

    async fn delete_suppression(
        &self,
        token: &SessionToken,
        policy_id: &str,
        suppression_id: &str,
    ) -> AppResult<()> {
        let endpoint = self.api_url.endpoint(&[
            "code",
            "api",
            "v1",
            "suppressions",
            policy_id,
            "justifications",
            suppression_id,
        ])?;
        let response = self
            .http_client
            .delete(endpoint)
            .headers(Self::authenticated_headers(token)?)
            .send()
            .await
            .map_err(|error| {
                error!(
                    policy_id = %policy_id,
                    suppression_id = %suppression_id,
                    error = %error,
                    "failed to call delete suppression endpoint"
                );
                AppError::Upstream(format!(
                    "failed to call delete suppression endpoint: {error}"
                ))
            })?;

        let status = response.status();
        debug!(status = %status, headers = ?response.headers(), "delete suppression response");
        if !status.is_success() {
            let body = response_body(response).await;
            error!(
                policy_id = %policy_id,
                suppression_id = %suppression_id,
                status = status.as_u16(),
                body = %body,
                "failed to delete suppression"
            );
            return Err(AppError::Upstream(format!(
                "delete suppression endpoint returned status {}: {body}",
                status.as_u16()
            )));
        }

        info!(
            policy_id = %policy_id,
            suppression_id = %suppression_id,
            "suppression deleted"
        );
        Ok(())
    }
}

async fn response_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_owned())
}
