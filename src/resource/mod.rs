//! Resource types exposed by the appliance API
//!
//! Each module declares a config model, a wire model and a
//! [`ResourceType`](declarative::ResourceType) tying them together.
//! [`Kind`] names them on the command line.

pub mod group_policy;
pub mod jump_group;
pub mod jumpoint;
pub mod shell_jump;
pub mod vault_account;
pub mod vault_account_group;

use clap::ValueEnum;
use declarative::{ResourceType, Variant, WireModel};

/// Resource kinds selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    JumpGroup,
    Jumpoint,
    ShellJump,
    GroupPolicy,
    VaultAccountGroup,
    VaultAccount,
}

/// Run `$body` with `$r` bound to the resource type of `$kind`.
macro_rules! with_resource {
    ($kind:expr, $r:ident => $body:expr) => {{
        use $crate::resource::{
            Kind, group_policy, jump_group, jumpoint, shell_jump, vault_account,
            vault_account_group,
        };
        match $kind {
            Kind::JumpGroup => {
                type $r = jump_group::JumpGroupResource;
                $body
            }
            Kind::Jumpoint => {
                type $r = jumpoint::JumpointResource;
                $body
            }
            Kind::ShellJump => {
                type $r = shell_jump::ShellJumpResource;
                $body
            }
            Kind::GroupPolicy => {
                type $r = group_policy::GroupPolicyResource;
                $body
            }
            Kind::VaultAccountGroup => {
                type $r = vault_account_group::VaultAccountGroupResource;
                $body
            }
            Kind::VaultAccount => {
                type $r = vault_account::VaultAccountResource;
                $body
            }
        }
    }};
}

pub(crate) use with_resource;

impl Kind {
    /// Command line name, e.g. `shell-jump`
    pub fn cli_name(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default()
    }

    /// Resource type name
    pub fn name(self) -> &'static str {
        with_resource!(self, R => R::NAME)
    }

    /// Variant the kind is limited to, if any
    pub fn variant(self) -> Option<Variant> {
        with_resource!(self, R => R::VARIANT)
    }

    /// Wire collection path
    pub fn path(self) -> &'static str {
        with_resource!(self, R => <<R as ResourceType>::Wire as WireModel>::PATH)
    }
}
