use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use suppressor_core::NonEmptyString;

/// Stored justification suppressing the findings of one policy.
///
/// Only the identifiers are interpreted; every other server-defined field is
/// kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suppression {
    id: NonEmptyString,
    policy_id: NonEmptyString,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Suppression {
    /// Creates a suppression without additional fields.
    #[must_use]
    pub fn new(id: NonEmptyString, policy_id: NonEmptyString) -> Self {
        Self {
            id,
            policy_id,
            extra: Map::new(),
        }
    }

    /// Returns the suppression (justification) identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the identifier of the policy the suppression applies to.
    #[must_use]
    pub fn policy_id(&self) -> &str {
        self.policy_id.as_str()
    }

    /// Returns a server-defined field that is not modelled explicitly.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}
