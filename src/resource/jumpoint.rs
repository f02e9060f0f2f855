//! Jumpoint resource
//!
//! Protocol tunnels and RDP service accounts only exist on PRA.

use declarative::{ResourceType, Tristate, Variant, config_model, wire_model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JumpointModel {
    pub id: Tristate<String>,
    pub name: Tristate<String>,
    pub code_name: Tristate<String>,
    pub platform: Tristate<String>,
    pub comments: Tristate<String>,
    pub enabled: Tristate<bool>,
    pub connected: Tristate<bool>,
    pub clustered: Tristate<bool>,
    pub shell_jump_enabled: Tristate<bool>,
    pub external_jump_item_network_id: Tristate<String>,
    pub protocol_tunnel_enabled: Tristate<bool>,
    pub rdp_service_account_id: Tristate<i64>,
}

config_model!(JumpointModel {
    name,
    code_name,
    platform,
    comments,
    enabled,
    connected,
    clustered,
    shell_jump_enabled,
    external_jump_item_network_id,
    protocol_tunnel_enabled: [variant(Variant::Pra)],
    rdp_service_account_id: [variant(Variant::Pra)],
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Jumpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub code_name: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub enabled: bool,
    // read-only on the server
    #[serde(skip_serializing)]
    pub connected: bool,
    pub clustered: bool,
    pub shell_jump_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_jump_item_network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_tunnel_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdp_service_account_id: Option<i64>,
}

wire_model!(Jumpoint => "/jumpoint" {
    name,
    code_name,
    platform,
    comments,
    enabled,
    connected,
    clustered,
    shell_jump_enabled,
    external_jump_item_network_id,
    protocol_tunnel_enabled,
    rdp_service_account_id,
});

pub struct JumpointResource;

impl ResourceType for JumpointResource {
    type Config = JumpointModel;
    type Wire = Jumpoint;
    const NAME: &'static str = "jumpoint";
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{VariantContext, copy_config_to_wire, copy_wire_to_config};

    fn wire() -> Jumpoint {
        Jumpoint {
            id: Some(2),
            name: "dc1".into(),
            code_name: "dc1".into(),
            platform: "linux-x86".into(),
            enabled: true,
            shell_jump_enabled: true,
            protocol_tunnel_enabled: Some(true),
            rdp_service_account_id: Some(40),
            ..Jumpoint::default()
        }
    }

    #[test]
    fn test_pra_fields_hidden_on_rs() {
        let ctx = VariantContext::new(Variant::Rs);
        let mut config = JumpointModel {
            protocol_tunnel_enabled: Tristate::Known(true),
            ..JumpointModel::default()
        };
        copy_wire_to_config(&ctx, &wire(), &mut config);
        assert!(config.protocol_tunnel_enabled.is_null());
        assert!(config.rdp_service_account_id.is_null());
        assert_eq!(config.enabled, Tristate::Known(true));

        let config = JumpointModel {
            rdp_service_account_id: Tristate::Known(40),
            ..config
        };
        let mut out = Jumpoint::default();
        copy_config_to_wire(&ctx, &config, &mut out).unwrap();
        assert_eq!(out.rdp_service_account_id, None);
    }

    #[test]
    fn test_pra_fields_mapped_on_pra() {
        let ctx = VariantContext::new(Variant::Pra);
        let mut config = JumpointModel::default();
        copy_wire_to_config(&ctx, &wire(), &mut config);
        assert_eq!(config.protocol_tunnel_enabled, Tristate::Known(true));
        assert_eq!(config.rdp_service_account_id, Tristate::Known(40));
    }

    #[test]
    fn test_connected_not_sent() {
        let mut wire = wire();
        wire.connected = true;
        let body = serde_json::to_value(&wire).unwrap();
        assert!(body.get("connected").is_none());
    }
}
