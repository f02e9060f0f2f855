//! Vault account group resource and its group policy memberships
//!
//! Membership edges live under the group policy, not the account group:
//! adding one is a POST to `/group-policy/{id}/vault-account-group` and
//! every change needs the policy provisioned afterwards.

use declarative::{
    Lifecycle, Relationship, ResourceType, Result, Tristate, Variant, config_model, wire_model,
};
use serde::{Deserialize, Serialize};

/// One group policy granting access to a vault account group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupPolicyMembership {
    #[serde(skip)]
    pub account_group_id: Option<i64>,
    pub group_policy_id: String,
    pub role: String,
}

impl GroupPolicyMembership {
    pub fn new(group_policy_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            account_group_id: None,
            group_policy_id: group_policy_id.into(),
            role: role.into(),
        }
    }
}

impl PartialEq for GroupPolicyMembership {
    fn eq(&self, other: &Self) -> bool {
        self.group_policy_id == other.group_policy_id && self.role == other.role
    }
}

impl Relationship for GroupPolicyMembership {
    const SCOPE: &'static str = "group_policy";
    type Key = String;

    fn key(&self) -> String {
        self.group_policy_id.clone()
    }

    fn owner(&self) -> Option<i64> {
        self.account_group_id
    }

    fn set_owner(&mut self, owner: i64) {
        self.account_group_id = Some(owner);
    }

    fn create_path(&self) -> String {
        format!("/group-policy/{}/vault-account-group", self.group_policy_id)
    }

    fn create_body(&self) -> serde_json::Value {
        serde_json::json!({
            "account_group_id": self.account_group_id,
            "role": self.role,
        })
    }

    fn delete_path(&self) -> String {
        format!(
            "/group-policy/{}/vault-account-group/{}",
            self.group_policy_id,
            self.account_group_id.unwrap_or_default()
        )
    }

    fn provision_path(key: &String) -> Option<String> {
        Some(format!("/group-policy/{key}/provision"))
    }

    fn label(&self) -> String {
        format!("group policy {} ({})", self.group_policy_id, self.role)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VaultAccountGroupModel {
    pub id: Tristate<String>,
    pub name: Tristate<String>,
    pub description: Tristate<String>,
    pub account_policy: Tristate<String>,
    pub group_policy_memberships: Tristate<Vec<GroupPolicyMembership>>,
}

config_model!(VaultAccountGroupModel {
    name,
    description,
    account_policy,
} skip { group_policy_memberships });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultAccountGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_policy: Option<String>,
}

wire_model!(VaultAccountGroup => "/vault/account-group" {
    name,
    description,
    account_policy,
});

#[derive(Debug, Deserialize)]
struct PolicyRef {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct AccountGroupRef {
    account_group_id: i64,
    role: String,
}

pub struct VaultAccountGroupResource;

impl ResourceType for VaultAccountGroupResource {
    type Config = VaultAccountGroupModel;
    type Wire = VaultAccountGroup;
    const NAME: &'static str = "vault_account_group";
    const VARIANT: Option<Variant> = Some(Variant::Pra);

    fn sync_members(
        lifecycle: &Lifecycle<'_>,
        owner: i64,
        plan: &Self::Config,
        state: Option<&Self::Config>,
        out: &mut Self::Config,
    ) -> Result<()> {
        let current = state
            .map(|s| s.group_policy_memberships.clone())
            .unwrap_or_default();
        out.group_policy_memberships =
            lifecycle.reconcile(owner, &plan.group_policy_memberships, &current)?;
        Ok(())
    }

    fn read_members(
        lifecycle: &Lifecycle<'_>,
        owner: i64,
        config: &mut Self::Config,
    ) -> Result<()> {
        let client = lifecycle.client();
        let policies: Vec<PolicyRef> = client.get_path("/group-policy")?.unwrap_or_default();

        let mut memberships = Vec::new();
        for policy in policies {
            let path = format!("/group-policy/{}/vault-account-group", policy.id);
            let groups: Vec<AccountGroupRef> = client.get_path(&path)?.unwrap_or_default();
            memberships.extend(
                groups
                    .into_iter()
                    .filter(|g| g.account_group_id == owner)
                    .map(|g| GroupPolicyMembership {
                        account_group_id: Some(owner),
                        group_policy_id: policy.id.to_string(),
                        role: g.role,
                    }),
            );
        }

        config.group_policy_memberships = Tristate::Known(memberships);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{LockRegistry, VariantContext};
    use serde_json::json;
    use srakit::{Method, MockTransport};
    use std::sync::Arc;

    fn lifecycle(mock: &MockTransport) -> Lifecycle<'_> {
        Lifecycle::new(
            mock,
            VariantContext::new(Variant::Pra),
            Arc::new(LockRegistry::new()),
        )
    }

    #[test]
    fn test_create_adds_memberships() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            "/vault/account-group",
            &json!({"id": 21, "name": "dba"}),
        );
        let lc = lifecycle(&mock);

        let plan = VaultAccountGroupModel {
            id: Tristate::Unknown,
            name: "dba".into(),
            group_policy_memberships: Tristate::Known(vec![GroupPolicyMembership::new(
                "4",
                "inject_and_checkout",
            )]),
            ..VaultAccountGroupModel::default()
        };
        let state = lc
            .create::<VaultAccountGroupResource>(&plan)
            .unwrap()
            .into_result()
            .unwrap();

        let paths: Vec<_> = mock.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            [
                "/vault/account-group",
                "/group-policy/4/vault-account-group",
                "/group-policy/4/provision"
            ]
        );
        assert_eq!(
            mock.requests()[1].body,
            Some(json!({"account_group_id": 21, "role": "inject_and_checkout"}))
        );
        let members = state.group_policy_memberships.as_known().unwrap();
        assert_eq!(members[0].owner(), Some(21));
    }

    #[test]
    fn test_read_collects_memberships() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/vault/account-group/21", &json!({"id": 21, "name": "dba"}));
        mock.respond(Method::Get, "/group-policy", &json!([{"id": 4}, {"id": 5}]));
        mock.respond(
            Method::Get,
            "/group-policy/4/vault-account-group",
            &json!([{"account_group_id": 21, "role": "inject"}]),
        );
        mock.respond(
            Method::Get,
            "/group-policy/5/vault-account-group",
            &json!([{"account_group_id": 22, "role": "inject"}]),
        );
        let lc = lifecycle(&mock);

        let imported = lc.import::<VaultAccountGroupResource>("21").unwrap();
        let read = lc
            .read::<VaultAccountGroupResource>(&imported)
            .unwrap()
            .unwrap();
        assert_eq!(
            read.group_policy_memberships,
            Tristate::Known(vec![GroupPolicyMembership::new("4", "inject")])
        );
        assert!(read.description.is_null());
    }
}
