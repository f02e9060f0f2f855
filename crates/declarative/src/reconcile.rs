//! Set reconciler for membership relationships
//!
//! The API has no batch or transaction endpoints for memberships: each
//! edge is its own POST or DELETE. Reconciling a membership list is
//! therefore a diff followed by one call per changed edge, with an
//! optional provisioning call per related entity afterwards.
//!
//! Provisioning on the server touches every sibling of the related
//! entity, so all edge calls for a relationship kind run under one lock
//! taken from the shared [`LockRegistry`].

use crate::client::ResourceClient;
use crate::diff::partition;
use crate::error::{Error, Result};
use crate::lock::LockRegistry;
use crate::types::Tristate;
use serde::de::IgnoredAny;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, PoisonError};

/// One membership edge between an owning resource and a related entity.
///
/// `PartialEq` must ignore the owner id: records are compared before the
/// owner is injected into both snapshots.
pub trait Relationship: Clone + PartialEq + Send + Sync + fmt::Debug {
    /// Lock scope shared by every edge of this kind.
    const SCOPE: &'static str;

    /// Identity of the related entity.
    type Key: Clone + Eq + Hash + fmt::Display;

    fn key(&self) -> Self::Key;
    fn owner(&self) -> Option<i64>;
    fn set_owner(&mut self, owner: i64);

    /// Endpoint receiving the POST that adds this edge.
    fn create_path(&self) -> String;

    /// JSON body of the add request.
    fn create_body(&self) -> serde_json::Value;

    /// Endpoint receiving the DELETE that removes this edge.
    fn delete_path(&self) -> String;

    /// Provisioning endpoint for a related entity, if this kind needs one.
    fn provision_path(_key: &Self::Key) -> Option<String> {
        None
    }

    /// Short description used in diagnostics.
    fn label(&self) -> String;
}

/// Applies membership diffs for any [`Relationship`] kind.
#[derive(Debug, Clone, Default)]
pub struct SetReconciler {
    locks: Arc<LockRegistry>,
}

impl SetReconciler {
    pub fn new(locks: Arc<LockRegistry>) -> Self {
        Self { locks }
    }

    /// Bring the remote memberships of `owner` from `current` to `desired`.
    ///
    /// Returns the new membership list: unchanged records followed by the
    /// added ones, all carrying `owner`. A null or unknown `desired` means
    /// the list is not managed; nothing is sent and `current` comes back.
    /// A null `current` counts as empty.
    ///
    /// # Errors
    ///
    /// The first failed call stops the run with [`Error::Reconcile`].
    /// Edges applied before it stay applied.
    pub fn reconcile<R: Relationship>(
        &self,
        client: &ResourceClient<'_>,
        owner: i64,
        desired: &Tristate<Vec<R>>,
        current: &Tristate<Vec<R>>,
    ) -> Result<Tristate<Vec<R>>> {
        let Some(desired) = desired.as_known() else {
            log::debug!("{}: memberships of {owner} not managed", R::SCOPE);
            return Ok(current.clone());
        };
        let current: &[R] = current.as_known().map_or(&[][..], Vec::as_slice);

        let desired = with_owner(desired, owner);
        let current = with_owner(current, owner);
        let diff = partition(&desired, &current);

        log::info!(
            "{}: owner {owner}: {} to add, {} to remove, {} unchanged",
            R::SCOPE,
            diff.to_add.len(),
            diff.to_remove.len(),
            diff.unchanged.len()
        );

        if !diff.has_changes() {
            return Ok(Tristate::Known(diff.unchanged));
        }

        let lock = self.locks.lock_for(R::SCOPE);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        for record in &diff.to_remove {
            let path = record.delete_path();
            log::debug!("{}: removing {} via {path}", R::SCOPE, record.label());
            client
                .delete_path(&path)
                .map_err(|e| Error::reconcile(owner, record.label(), e))?;
        }

        for record in &diff.to_add {
            let path = record.create_path();
            log::debug!("{}: adding {} via {path}", R::SCOPE, record.label());
            client
                .post_path::<_, IgnoredAny>(&path, &record.create_body())
                .map_err(|e| Error::reconcile(owner, record.label(), e))?;
        }

        let mut provisioned: Vec<R::Key> = Vec::new();
        for record in diff.to_remove.iter().chain(&diff.to_add) {
            let key = record.key();
            if provisioned.contains(&key) {
                continue;
            }
            if let Some(path) = R::provision_path(&key) {
                log::debug!("{}: provisioning {key} via {path}", R::SCOPE);
                client
                    .post_empty(&path)
                    .map_err(|e| Error::reconcile(owner, format!("provision {key}"), e))?;
            }
            provisioned.push(key);
        }

        let mut members = diff.unchanged;
        members.extend(diff.to_add);
        Ok(Tristate::Known(members))
    }
}

fn with_owner<R: Relationship>(records: &[R], owner: i64) -> Vec<R> {
    records
        .iter()
        .cloned()
        .map(|mut r| {
            r.set_owner(owner);
            r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use serde_json::json;
    use srakit::{Method, MockTransport, Transport};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    struct PolicyEdge {
        owner: Option<i64>,
        group_policy_id: String,
        role: String,
    }

    impl PartialEq for PolicyEdge {
        fn eq(&self, other: &Self) -> bool {
            self.group_policy_id == other.group_policy_id && self.role == other.role
        }
    }

    impl Relationship for PolicyEdge {
        const SCOPE: &'static str = "group_policy";
        type Key = String;

        fn key(&self) -> String {
            self.group_policy_id.clone()
        }

        fn owner(&self) -> Option<i64> {
            self.owner
        }

        fn set_owner(&mut self, owner: i64) {
            self.owner = Some(owner);
        }

        fn create_path(&self) -> String {
            format!("/group-policy/{}/vault-account-group", self.group_policy_id)
        }

        fn create_body(&self) -> serde_json::Value {
            json!({"vault_account_group_id": self.owner, "role": self.role})
        }

        fn delete_path(&self) -> String {
            format!(
                "/group-policy/{}/vault-account-group/{}",
                self.group_policy_id,
                self.owner.unwrap_or_default()
            )
        }

        fn provision_path(key: &String) -> Option<String> {
            Some(format!("/group-policy/{key}/provision"))
        }

        fn label(&self) -> String {
            format!("group policy {} ({})", self.group_policy_id, self.role)
        }
    }

    fn edge(gp: &str, role: &str) -> PolicyEdge {
        PolicyEdge {
            owner: None,
            group_policy_id: gp.to_string(),
            role: role.to_string(),
        }
    }

    fn calls(mock: &MockTransport) -> Vec<(Method, String)> {
        mock.requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect()
    }

    #[test]
    fn test_removals_then_additions_then_provision() {
        let mock = MockTransport::new();
        let client = ResourceClient::new(&mock);
        let reconciler = SetReconciler::default();

        let desired = Tristate::Known(vec![edge("1", "inject"), edge("3", "inject")]);
        let current = Tristate::Known(vec![edge("2", "inject"), edge("3", "inject")]);

        let result = reconciler
            .reconcile(&client, 12, &desired, &current)
            .unwrap();

        assert_eq!(
            calls(&mock),
            vec![
                (
                    Method::Delete,
                    "/group-policy/2/vault-account-group/12".to_string()
                ),
                (Method::Post, "/group-policy/1/vault-account-group".to_string()),
                (Method::Post, "/group-policy/2/provision".to_string()),
                (Method::Post, "/group-policy/1/provision".to_string()),
            ]
        );

        let add = &mock.requests_for(Method::Post)[0];
        assert_eq!(
            add.body,
            Some(json!({"vault_account_group_id": 12, "role": "inject"}))
        );

        let members = result.as_known().unwrap();
        let gps: Vec<_> = members.iter().map(|e| e.group_policy_id.as_str()).collect();
        assert_eq!(gps, ["3", "1"]);
        assert!(members.iter().all(|e| e.owner() == Some(12)));
    }

    #[test]
    fn test_provision_once_per_key() {
        let mock = MockTransport::new();
        let client = ResourceClient::new(&mock);
        let reconciler = SetReconciler::default();

        // role change on gp 4 is a remove and an add on the same key
        let desired = Tristate::Known(vec![edge("4", "checkout")]);
        let current = Tristate::Known(vec![edge("4", "inject")]);
        reconciler
            .reconcile(&client, 1, &desired, &current)
            .unwrap();

        let provisions: Vec<_> = calls(&mock)
            .into_iter()
            .filter(|(_, path)| path.ends_with("/provision"))
            .collect();
        assert_eq!(provisions.len(), 1);
    }

    #[test]
    fn test_no_changes_no_calls() {
        let mock = MockTransport::new();
        let client = ResourceClient::new(&mock);
        let reconciler = SetReconciler::default();

        let list = Tristate::Known(vec![edge("3", "inject")]);
        let result = reconciler.reconcile(&client, 5, &list, &list).unwrap();

        assert!(mock.requests().is_empty());
        assert_eq!(result.as_known().unwrap()[0].owner(), Some(5));
    }

    #[test]
    fn test_unmanaged_desired_is_noop() {
        let mock = MockTransport::new();
        let client = ResourceClient::new(&mock);
        let reconciler = SetReconciler::default();
        let current = Tristate::Known(vec![edge("3", "inject")]);

        let result = reconciler
            .reconcile(&client, 5, &Tristate::Null, &current)
            .unwrap();
        assert_eq!(result, current);

        let result = reconciler
            .reconcile::<PolicyEdge>(&client, 5, &Tristate::Unknown, &Tristate::Null)
            .unwrap();
        assert!(result.is_null());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_null_current_counts_as_empty() {
        let mock = MockTransport::new();
        let client = ResourceClient::new(&mock);
        let reconciler = SetReconciler::default();

        let desired = Tristate::Known(vec![edge("1", "inject")]);
        let result = reconciler
            .reconcile(&client, 5, &desired, &Tristate::Null)
            .unwrap();

        assert_eq!(mock.requests_for(Method::Delete).len(), 0);
        assert_eq!(result.as_known().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_desired_removes_everything() {
        let mock = MockTransport::new();
        let client = ResourceClient::new(&mock);
        let reconciler = SetReconciler::default();

        let current = Tristate::Known(vec![edge("1", "inject"), edge("2", "inject")]);
        let result = reconciler
            .reconcile(&client, 5, &Tristate::Known(Vec::new()), &current)
            .unwrap();

        assert_eq!(mock.requests_for(Method::Delete).len(), 2);
        assert_eq!(result, Tristate::Known(Vec::new()));
    }

    #[test]
    fn test_first_failure_aborts() {
        let mock = MockTransport::new();
        mock.fail(
            Method::Post,
            "/group-policy/1/vault-account-group",
            409,
            "already a member",
        );
        let client = ResourceClient::new(&mock);
        let reconciler = SetReconciler::default();

        let desired = Tristate::Known(vec![edge("1", "inject"), edge("3", "inject")]);
        let current = Tristate::Known(vec![edge("2", "inject")]);

        let err = reconciler
            .reconcile(&client, 12, &desired, &current)
            .unwrap_err();

        // the removal went through, the second add and provisioning did not
        assert_eq!(
            calls(&mock),
            vec![
                (
                    Method::Delete,
                    "/group-policy/2/vault-account-group/12".to_string()
                ),
                (Method::Post, "/group-policy/1/vault-account-group".to_string()),
            ]
        );

        let diagnostic = err.diagnostic();
        assert_eq!(diagnostic.category, ErrorCategory::Reconcile);
        assert!(diagnostic.summary.contains("12"));
        assert!(diagnostic.detail.contains("group policy 1 (inject)"));
        assert!(diagnostic.detail.contains("409"));
    }

    #[test]
    fn test_provision_failure_names_key() {
        let mock = MockTransport::new();
        mock.fail(Method::Post, "/group-policy/1/provision", 500, "boom");
        let client = ResourceClient::new(&mock);
        let reconciler = SetReconciler::default();

        let desired = Tristate::Known(vec![edge("1", "inject")]);
        let err = reconciler
            .reconcile(&client, 3, &desired, &Tristate::Null)
            .unwrap_err();
        assert!(matches!(err, Error::Reconcile { ref edge, .. } if edge == "provision 1"));
    }

    /// Transport that tracks how many requests are in flight at once.
    #[derive(Default)]
    struct OverlapTransport {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl Transport for OverlapTransport {
        fn do_request(
            &self,
            _method: Method,
            _path: &str,
            _query: &[(String, String)],
            _body: Option<&[u8]>,
        ) -> srakit::Result<Option<Vec<u8>>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[test]
    fn test_same_scope_is_serialized() {
        let transport = OverlapTransport::default();
        let reconciler = SetReconciler::new(Arc::new(LockRegistry::new()));

        thread::scope(|s| {
            for owner in 0..4 {
                let reconciler = reconciler.clone();
                let transport = &transport;
                s.spawn(move || {
                    let client = ResourceClient::new(transport);
                    let desired = Tristate::Known(vec![edge("1", "inject"), edge("2", "inject")]);
                    reconciler
                        .reconcile(&client, owner, &desired, &Tristate::Null)
                        .unwrap();
                });
            }
        });

        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 1);
    }
}
