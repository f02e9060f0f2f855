//! Shell jump item resource

use declarative::{ResourceType, Tristate, Variant, config_model, wire_model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShellJumpModel {
    pub id: Tristate<String>,
    pub name: Tristate<String>,
    pub jumpoint_id: Tristate<i64>,
    pub hostname: Tristate<String>,
    pub protocol: Tristate<String>,
    pub port: Tristate<i64>,
    pub jump_group_id: Tristate<i64>,
    pub jump_group_type: Tristate<String>,
    pub terminal: Tristate<String>,
    pub keep_alive: Tristate<i64>,
    pub tag: Tristate<String>,
    pub comments: Tristate<String>,
    pub jump_policy_id: Tristate<i64>,
    pub session_policy_id: Tristate<i64>,
    pub username: Tristate<String>,
}

config_model!(ShellJumpModel {
    name,
    jumpoint_id,
    hostname,
    protocol,
    port,
    jump_group_id,
    jump_group_type,
    terminal,
    keep_alive,
    tag,
    comments,
    jump_policy_id: [variant(Variant::Pra)],
    session_policy_id,
    username,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellJump {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub jumpoint_id: i64,
    pub hostname: String,
    pub protocol: String,
    pub port: i64,
    pub jump_group_id: i64,
    pub jump_group_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_policy_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_policy_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

wire_model!(ShellJump => "/jump-item/shell-jump" {
    name,
    jumpoint_id,
    hostname,
    protocol,
    port,
    jump_group_id,
    jump_group_type,
    terminal,
    keep_alive,
    tag,
    comments,
    jump_policy_id,
    session_policy_id,
    username,
});

pub struct ShellJumpResource;

impl ResourceType for ShellJumpResource {
    type Config = ShellJumpModel;
    type Wire = ShellJump;
    const NAME: &'static str = "shell_jump";
}
