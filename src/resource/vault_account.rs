//! Vault username/password account resource
//!
//! The server never returns the password, so it is write-only.

use declarative::{ResourceType, Tristate, Variant, config_model, wire_model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VaultAccountModel {
    pub id: Tristate<String>,
    #[serde(rename = "type")]
    pub account_type: Tristate<String>,
    pub name: Tristate<String>,
    pub description: Tristate<String>,
    pub personal: Tristate<bool>,
    pub username: Tristate<String>,
    #[serde(skip_serializing)]
    pub password: Tristate<String>,
    pub account_group_id: Tristate<i64>,
    pub account_policy: Tristate<String>,
    pub last_checkout_timestamp: Tristate<String>,
}

config_model!(VaultAccountModel {
    account_type,
    name,
    description,
    personal,
    username,
    password: [persist_only()],
    account_group_id,
    account_policy,
    last_checkout_timestamp,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub account_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub personal: bool,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_policy: Option<String>,
    // read-only on the server
    #[serde(skip_serializing)]
    pub last_checkout_timestamp: Option<String>,
}

wire_model!(VaultAccount => "/vault/account" {
    account_type,
    name,
    description,
    personal,
    username,
    password,
    account_group_id,
    account_policy,
    last_checkout_timestamp,
});

pub struct VaultAccountResource;

impl ResourceType for VaultAccountResource {
    type Config = VaultAccountModel;
    type Wire = VaultAccount;
    const NAME: &'static str = "vault_account";
    const VARIANT: Option<Variant> = Some(Variant::Pra);
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Error, LockRegistry, Lifecycle, VariantContext};
    use serde_json::json;
    use srakit::{Method, MockTransport};
    use std::sync::Arc;

    fn plan() -> VaultAccountModel {
        VaultAccountModel {
            id: Tristate::Unknown,
            account_type: "username_password".into(),
            name: "root@db".into(),
            personal: Tristate::Known(false),
            username: "root".into(),
            password: "s3cret".into(),
            ..VaultAccountModel::default()
        }
    }

    #[test]
    fn test_password_sent_and_kept() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            "/vault/account",
            &json!({
                "id": 30,
                "type": "username_password",
                "name": "root@db",
                "personal": false,
                "username": "root",
                "last_checkout_timestamp": "2026-01-02T03:04:05Z"
            }),
        );
        let lc = Lifecycle::new(
            &mock,
            VariantContext::new(Variant::Pra),
            Arc::new(LockRegistry::new()),
        );

        let state = lc.create::<VaultAccountResource>(&plan()).unwrap().config;
        assert_eq!(state.password, Tristate::Known("s3cret".into()));
        assert_eq!(
            state.last_checkout_timestamp,
            Tristate::Known("2026-01-02T03:04:05Z".into())
        );

        let body = mock.requests()[0].body.clone().unwrap();
        assert_eq!(body["password"], "s3cret");
        assert_eq!(body["type"], "username_password");
        assert!(body.get("last_checkout_timestamp").is_none());
    }

    #[test]
    fn test_password_not_printed() {
        let json = serde_json::to_value(plan()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["type"], "username_password");
    }

    #[test]
    fn test_rejected_on_rs() {
        let mock = MockTransport::new();
        let lc = Lifecycle::new(
            &mock,
            VariantContext::new(Variant::Rs),
            Arc::new(LockRegistry::new()),
        );
        let err = lc.create::<VaultAccountResource>(&plan()).unwrap_err();
        assert!(matches!(err, Error::VariantMismatch { .. }));
        assert!(mock.requests().is_empty());
    }
}
