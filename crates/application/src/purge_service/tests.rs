use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use suppressor_core::{AppError, AppResult, Credentials, NonEmptyString, SecretString, SessionToken};
use suppressor_domain::{DeletionLimit, Suppression};

use super::{DeletionStatus, PurgeRequest, PurgeService};
use crate::SuppressionGateway;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Login,
    List,
    Delete(String, String),
}

#[derive(Default)]
struct FakeGateway {
    reject_login: bool,
    listings: Mutex<VecDeque<AppResult<Vec<Suppression>>>>,
    failing_deletions: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    fn with_listings(listings: Vec<AppResult<Vec<Suppression>>>) -> Self {
        Self {
            listings: Mutex::new(listings.into()),
            ..Self::default()
        }
    }

    fn record(&self, call: Call) -> AppResult<()> {
        self.calls
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock call log: {error}")))?
            .push(call);
        Ok(())
    }

    fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn delete_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(policy_id, suppression_id) => Some((policy_id, suppression_id)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SuppressionGateway for FakeGateway {
    async fn login(
        &self,
        _access_key: &str,
        _secret_key: &SecretString,
    ) -> AppResult<SessionToken> {
        self.record(Call::Login)?;
        if self.reject_login {
            return Err(AppError::Unauthorized(
                "login returned status 401".to_owned(),
            ));
        }

        SessionToken::new("token-1")
    }

    async fn list_suppressions(&self, _token: &SessionToken) -> AppResult<Vec<Suppression>> {
        self.record(Call::List)?;
        self.listings
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock listings: {error}")))?
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn delete_suppression(
        &self,
        _token: &SessionToken,
        policy_id: &str,
        suppression_id: &str,
    ) -> AppResult<()> {
        self.record(Call::Delete(
            policy_id.to_owned(),
            suppression_id.to_owned(),
        ))?;
        if self
            .failing_deletions
            .iter()
            .any(|failing| failing == suppression_id)
        {
            return Err(AppError::Upstream(
                "delete returned status 500".to_owned(),
            ));
        }

        Ok(())
    }
}

fn credentials() -> Credentials {
    let access_key = NonEmptyString::new("access");
    let secret_key = SecretString::new("secret");
    match (access_key, secret_key) {
        (Ok(access_key), Ok(secret_key)) => Credentials::new(access_key, secret_key),
        _ => panic!("test credentials should be valid"),
    }
}

fn suppressions(count: usize) -> Vec<Suppression> {
    (0..count)
        .filter_map(|index| {
            let id = NonEmptyString::new(format!("sup-{index}")).ok()?;
            let policy_id = NonEmptyString::new(format!("policy-{}", index % 2)).ok()?;
            Some(Suppression::new(id, policy_id))
        })
        .collect()
}

fn request(limit: usize) -> PurgeRequest {
    PurgeRequest::with_limit(credentials(), DeletionLimit::from_count(limit))
}

#[tokio::test]
async fn limit_two_deletes_first_two_in_order() {
    let gateway = Arc::new(FakeGateway::with_listings(vec![
        Ok(suppressions(5)),
        Ok(suppressions(3)),
    ]));
    let service = PurgeService::new(gateway.clone());

    let result = service.run(&request(2)).await;

    assert!(result.is_ok());
    let Ok(report) = result else {
        return;
    };
    assert_eq!(report.count_before, 5);
    assert_eq!(report.count_after, 3);
    assert_eq!(report.deleted_count(), 2);
    assert_eq!(
        gateway.delete_calls(),
        vec![
            ("policy-0".to_owned(), "sup-0".to_owned()),
            ("policy-1".to_owned(), "sup-1".to_owned()),
        ]
    );
}

#[tokio::test]
async fn zero_limit_deletes_everything() {
    let gateway = Arc::new(FakeGateway::with_listings(vec![
        Ok(suppressions(5)),
        Ok(Vec::new()),
    ]));
    let service = PurgeService::new(gateway.clone());

    let result = service.run(&request(0)).await;

    assert!(matches!(
        result,
        Ok(ref report) if report.count_before == 5 && report.count_after == 0
    ));
    assert_eq!(gateway.delete_calls().len(), 5);
}

#[tokio::test]
async fn limit_above_list_length_deletes_whole_list() {
    let gateway = Arc::new(FakeGateway::with_listings(vec![
        Ok(suppressions(3)),
        Ok(Vec::new()),
    ]));
    let service = PurgeService::new(gateway.clone());

    let result = service.run(&request(10)).await;

    assert!(result.is_ok());
    assert_eq!(gateway.delete_calls().len(), 3);
}

#[tokio::test]
async fn failed_deletion_does_not_stop_the_batch() {
    let gateway = Arc::new(FakeGateway {
        listings: Mutex::new(vec![Ok(suppressions(3)), Ok(suppressions(1))].into()),
        failing_deletions: vec!["sup-1".to_owned()],
        ..FakeGateway::default()
    });
    let service = PurgeService::new(gateway.clone());

    let result = service.run(&request(0)).await;

    assert!(result.is_ok());
    let Ok(report) = result else {
        return;
    };
    assert_eq!(gateway.delete_calls().len(), 3);
    assert_eq!(report.deleted_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.count_after, 1);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].suppression_id, "sup-1");
    assert!(matches!(
        failures[0].status,
        DeletionStatus::Failed { ref reason } if reason.contains("500")
    ));
    assert_eq!(gateway.calls().last(), Some(&Call::List));
}

#[tokio::test]
async fn rejected_login_issues_no_further_calls() {
    let gateway = Arc::new(FakeGateway {
        reject_login: true,
        ..FakeGateway::with_listings(vec![Ok(suppressions(5))])
    });
    let service = PurgeService::new(gateway.clone());

    let result = service.run(&request(0)).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    assert_eq!(gateway.calls(), vec![Call::Login]);
}

#[tokio::test]
async fn failed_initial_listing_aborts_before_deleting() {
    let gateway = Arc::new(FakeGateway::with_listings(vec![Err(AppError::Upstream(
        "list returned status 503".to_owned(),
    ))]));
    let service = PurgeService::new(gateway.clone());

    let result = service.run(&request(0)).await;

    assert!(matches!(result, Err(AppError::Upstream(_))));
    assert_eq!(gateway.calls(), vec![Call::Login, Call::List]);
}

#[tokio::test]
async fn failed_final_listing_reports_deletion_tally() {
    let gateway = Arc::new(FakeGateway::with_listings(vec![
        Ok(suppressions(2)),
        Err(AppError::Upstream("list returned status 502".to_owned())),
    ]));
    let service = PurgeService::new(gateway.clone());

    let result = service.run(&request(0)).await;

    assert_eq!(gateway.delete_calls().len(), 2);
    assert!(matches!(
        result,
        Err(AppError::Upstream(ref message))
            if message.contains("deleting 2 of 2 (0 failed, 2 before deletion)")
    ));
}

#[tokio::test]
async fn before_count_is_known_ahead_of_failed_final_listing() {
    let gateway = Arc::new(FakeGateway::with_listings(vec![
        Ok(suppressions(5)),
        Err(AppError::Upstream("list returned status 502".to_owned())),
    ]));
    let service = PurgeService::new(gateway.clone());

    let prepared = service.prepare(&request(2)).await;

    assert!(matches!(
        prepared,
        Ok(ref plan) if plan.count_before() == 5 && plan.selected().len() == 2
    ));
    assert!(gateway.delete_calls().is_empty());
    let Ok(plan) = prepared else {
        return;
    };

    let result = service.execute(plan).await;

    assert_eq!(gateway.delete_calls().len(), 2);
    assert!(matches!(
        result,
        Err(AppError::Upstream(ref message))
            if message.contains("deleting 2 of 2 (0 failed, 5 before deletion)")
    ));
}

#[test]
fn malformed_limit_is_rejected_when_building_the_request() {
    let result = PurgeRequest::new(credentials(), "abc");
    assert!(matches!(result, Err(AppError::Validation(_))));

    let parsed = PurgeRequest::new(credentials(), "4");
    assert!(matches!(parsed, Ok(ref request) if request.limit() == DeletionLimit::from_count(4)));
}
