use async_trait::async_trait;

use suppressor_core::{AppResult, SecretString, SessionToken};
use suppressor_domain::Suppression;

/// Port for the platform API holding the suppressions.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait SuppressionGateway: Send + Sync {
    /// Exchanges an access key pair for a session token.
    async fn login(&self, access_key: &str, secret_key: &SecretString) -> AppResult<SessionToken>;

    /// Lists every suppression visible to the session, in server order.
    async fn list_suppressions(&self, token: &SessionToken) -> AppResult<Vec<Suppression>>;

    /// Deletes one suppression of one policy.
    async fn delete_suppression(
        &self,
        token: &SessionToken,
        policy_id: &str,
        suppression_id: &str,
    ) -> AppResult<()>;
}
