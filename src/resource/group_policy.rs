//! Group policy resource

use declarative::{ResourceType, Tristate, config_model, wire_model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupPolicyModel {
    pub id: Tristate<String>,
    pub name: Tristate<String>,
    pub perm_access_allowed: Tristate<bool>,
    pub access_perm_status: Tristate<String>,
    pub perm_share_other_team: Tristate<bool>,
    pub perm_invite_external_user: Tristate<bool>,
    pub perm_session_idle_timeout: Tristate<i64>,
}

config_model!(GroupPolicyModel {
    name,
    perm_access_allowed,
    access_perm_status,
    perm_share_other_team,
    perm_invite_external_user,
    perm_session_idle_timeout,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm_access_allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_perm_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm_share_other_team: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm_invite_external_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm_session_idle_timeout: Option<i64>,
}

wire_model!(GroupPolicy => "/group-policy" {
    name,
    perm_access_allowed,
    access_perm_status,
    perm_share_other_team,
    perm_invite_external_user,
    perm_session_idle_timeout,
});

pub struct GroupPolicyResource;

impl ResourceType for GroupPolicyResource {
    type Config = GroupPolicyModel;
    type Wire = GroupPolicy;
    const NAME: &'static str = "group_policy";
}
