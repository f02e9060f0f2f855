//! Jump group resource

use declarative::{ResourceType, Tristate, config_model, wire_model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JumpGroupModel {
    pub id: Tristate<String>,
    pub name: Tristate<String>,
    pub code_name: Tristate<String>,
    pub comments: Tristate<String>,
    pub ecm_group_id: Tristate<i64>,
}

config_model!(JumpGroupModel {
    name,
    code_name,
    comments,
    ecm_group_id,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub code_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecm_group_id: Option<i64>,
}

wire_model!(JumpGroup => "/jump-group" {
    name,
    code_name,
    comments,
    ecm_group_id,
});

pub struct JumpGroupResource;

impl ResourceType for JumpGroupResource {
    type Config = JumpGroupModel;
    type Wire = JumpGroup;
    const NAME: &'static str = "jump_group";
}
