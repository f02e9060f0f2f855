//! Resource types and their CRUD lifecycle
//!
//! A [`ResourceType`] ties a config model to a wire model and names the
//! variant it belongs to. [`Lifecycle`] runs the create/read/update/
//! delete/import sequence for any such type: variant check, map to wire,
//! one remote call, map back, then membership hooks.

use crate::client::{Filter, ResourceClient};
use crate::context::{Variant, VariantContext};
use crate::error::{Error, Result};
use crate::lock::LockRegistry;
use crate::mapper::{copy_config_to_wire, copy_wire_to_config, import_config, parse_id};
use crate::model::{ConfigModel, WireModel};
use crate::reconcile::{Relationship, SetReconciler};
use crate::types::Tristate;
use srakit::Transport;
use std::sync::Arc;

/// A declared resource type.
///
/// # Example
///
/// ```ignore
/// struct JumpGroupResource;
///
/// impl ResourceType for JumpGroupResource {
///     type Config = JumpGroupModel;
///     type Wire = JumpGroup;
///     const NAME: &'static str = "jump_group";
/// }
/// ```
pub trait ResourceType: Send + Sync + 'static {
    type Config: ConfigModel;
    type Wire: WireModel;

    /// Resource type name, used in logs and diagnostics.
    const NAME: &'static str;

    /// Variant this type exists under; `None` means both.
    const VARIANT: Option<Variant> = None;

    /// Apply membership lists after the record itself was written.
    ///
    /// `state` is `None` on create. Results go into `out`.
    fn sync_members(
        _lifecycle: &Lifecycle<'_>,
        _owner: i64,
        _plan: &Self::Config,
        _state: Option<&Self::Config>,
        _out: &mut Self::Config,
    ) -> Result<()> {
        Ok(())
    }

    /// Fill membership lists on read.
    fn read_members(
        _lifecycle: &Lifecycle<'_>,
        _owner: i64,
        _config: &mut Self::Config,
    ) -> Result<()> {
        Ok(())
    }
}

/// A record written to the server, plus any membership failure that
/// followed.
///
/// `config` always carries the server id. When `error` is set, its
/// membership lists were re-read from the server where possible, so a
/// re-run picks up from the edges that did apply.
#[derive(Debug)]
#[must_use]
pub struct Applied<C> {
    pub config: C,
    pub error: Option<Error>,
}

impl<C> Applied<C> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Discard the written record when membership sync failed.
    pub fn into_result(self) -> Result<C> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.config),
        }
    }
}

/// Runs lifecycle operations against one transport under one variant.
pub struct Lifecycle<'a> {
    client: ResourceClient<'a>,
    ctx: VariantContext,
    reconciler: SetReconciler,
}

impl<'a> Lifecycle<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        ctx: VariantContext,
        locks: Arc<LockRegistry>,
    ) -> Self {
        Self {
            client: ResourceClient::new(transport),
            ctx,
            reconciler: SetReconciler::new(locks),
        }
    }

    pub fn client(&self) -> &ResourceClient<'a> {
        &self.client
    }

    pub fn context(&self) -> &VariantContext {
        &self.ctx
    }

    /// Reconcile one membership list of `owner`.
    pub fn reconcile<R: Relationship>(
        &self,
        owner: i64,
        desired: &Tristate<Vec<R>>,
        current: &Tristate<Vec<R>>,
    ) -> Result<Tristate<Vec<R>>> {
        self.reconciler
            .reconcile(&self.client, owner, desired, current)
    }

    /// Create the remote record and return the refreshed config.
    ///
    /// # Errors
    ///
    /// Fails before any request when the type is gated to the other
    /// variant, and with [`Error::EmptyResponse`] when the server does not
    /// send the created record back. A membership failure after the record
    /// exists is reported through [`Applied::error`] instead.
    pub fn create<T: ResourceType>(&self, plan: &T::Config) -> Result<Applied<T::Config>> {
        self.check_variant::<T>()?;
        log::debug!("{}: create", T::NAME);

        let mut wire = T::Wire::default();
        copy_config_to_wire(&self.ctx, plan, &mut wire)?;

        let created = self
            .client
            .create(&wire)?
            .ok_or_else(|| Error::EmptyResponse {
                path: <T::Wire as WireModel>::PATH.to_string(),
            })?;
        let owner = created.id().ok_or_else(|| Error::MissingId {
            resource: T::NAME.to_string(),
        })?;

        let mut config = plan.clone();
        copy_wire_to_config(&self.ctx, &created, &mut config);
        log::debug!("{}: created {owner}", T::NAME);

        let synced = T::sync_members(self, owner, plan, None, &mut config);
        Ok(self.applied::<T>(owner, config, synced))
    }

    /// Refresh a config from the server.
    ///
    /// Returns `None` when the record no longer exists; dropping it from
    /// local state is up to the caller.
    pub fn read<T: ResourceType>(&self, state: &T::Config) -> Result<Option<T::Config>> {
        self.check_variant::<T>()?;
        let id = required_id::<T>(state)?;
        log::debug!("{}: read {id}", T::NAME);

        let Some(wire) = self.client.get::<T::Wire>(id)? else {
            log::debug!("{}: {id} is gone", T::NAME);
            return Ok(None);
        };

        let mut config = state.clone();
        copy_wire_to_config(&self.ctx, &wire, &mut config);
        T::read_members(self, id, &mut config)?;
        Ok(Some(config))
    }

    /// Patch the remote record from `plan`, reconciling memberships
    /// against `state`.
    ///
    /// The id comes from `plan` when known, otherwise from `state`. When
    /// the server answers without a body, the request is taken as the
    /// result. Membership failures go into [`Applied::error`].
    pub fn update<T: ResourceType>(
        &self,
        plan: &T::Config,
        state: &T::Config,
    ) -> Result<Applied<T::Config>> {
        self.check_variant::<T>()?;

        let mut wire = T::Wire::default();
        copy_config_to_wire(&self.ctx, plan, &mut wire)?;
        let id = match wire.id() {
            Some(id) => id,
            None => required_id::<T>(state)?,
        };
        wire.set_id(Some(id));
        log::debug!("{}: update {id}", T::NAME);

        let updated = self.client.update(&wire)?.unwrap_or(wire);

        let mut config = plan.clone();
        copy_wire_to_config(&self.ctx, &updated, &mut config);
        if !config.id().is_known() {
            *config.id_mut() = Tristate::Known(id.to_string());
        }
        let synced = T::sync_members(self, id, plan, Some(state), &mut config);
        Ok(self.applied::<T>(id, config, synced))
    }

    /// Delete the remote record.
    pub fn delete<T: ResourceType>(&self, state: &T::Config) -> Result<()> {
        self.check_variant::<T>()?;
        let id = required_id::<T>(state)?;
        log::debug!("{}: delete {id}", T::NAME);
        self.client.delete::<T::Wire>(id)
    }

    /// Seed a config from an external id; a following read fills it in.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidId`] when `id` is not an integer.
    pub fn import<T: ResourceType>(&self, id: &str) -> Result<T::Config> {
        self.check_variant::<T>()?;
        let config: T::Config = import_config(id);
        required_id::<T>(&config)?;
        log::debug!("{}: import {id}", T::NAME);
        Ok(config)
    }

    /// List remote records as configs.
    pub fn list<T: ResourceType>(&self, filter: &Filter) -> Result<Vec<T::Config>> {
        self.check_variant::<T>()?;
        let items = self.client.list::<T::Wire>(filter)?;
        log::debug!("{}: listed {} records", T::NAME, items.len());

        Ok(items
            .iter()
            .map(|wire| {
                let mut config = T::Config::default();
                copy_wire_to_config(&self.ctx, wire, &mut config);
                config
            })
            .collect())
    }

    fn applied<T: ResourceType>(
        &self,
        owner: i64,
        mut config: T::Config,
        synced: Result<()>,
    ) -> Applied<T::Config> {
        let Err(error) = synced else {
            return Applied {
                config,
                error: None,
            };
        };
        log::warn!("{}: memberships of {owner} left partial: {error}", T::NAME);
        if let Err(e) = T::read_members(self, owner, &mut config) {
            log::warn!("{}: could not refresh memberships of {owner}: {e}", T::NAME);
        }
        Applied {
            config,
            error: Some(error),
        }
    }

    fn check_variant<T: ResourceType>(&self) -> Result<()> {
        if self.ctx.allows(T::VARIANT) {
            Ok(())
        } else {
            Err(Error::VariantMismatch {
                resource: T::NAME,
                variant: self.ctx.variant(),
            })
        }
    }
}

fn required_id<T: ResourceType>(config: &T::Config) -> Result<i64> {
    parse_id(config.id())?.ok_or_else(|| Error::MissingId {
        resource: T::NAME.to_string(),
    })
}
