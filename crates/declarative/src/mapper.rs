//! Field mapper - copies values between config and wire models by name
//!
//! Both directions walk the config model's field table. The identifier is
//! handled separately: a string on the config side, an integer on the
//! wire. A kind mismatch between same-named fields is a broken model
//! definition and panics.

use crate::context::VariantContext;
use crate::error::{Error, Result};
use crate::model::{
    ConfigField, ConfigModel, ConfigSlot, FieldSpec, ID_FIELD, WireField, WireModel, WireSlot,
};
use crate::types::Tristate;

/// Parse a config identifier. Null and unknown ids parse to `None`.
pub fn parse_id(id: &Tristate<String>) -> Result<Option<i64>> {
    match id {
        Tristate::Known(value) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::InvalidId {
                value: value.clone(),
            }),
        Tristate::Null | Tristate::Unknown => Ok(None),
    }
}

/// Copy a config model onto a wire model.
///
/// Skipped fields, fields the wire model lacks, and fields gated to the
/// other variant are left at the wire's default. Null and unknown values
/// leave the wire field absent.
pub fn copy_config_to_wire<C, W>(ctx: &VariantContext, config: &C, wire: &mut W) -> Result<()>
where
    C: ConfigModel,
    W: WireModel,
{
    for spec in C::FIELDS {
        if spec.skip {
            continue;
        }
        if spec.name == ID_FIELD {
            if let Some(id) = parse_id(config.id())? {
                wire.set_id(Some(id));
            }
            continue;
        }
        let Some(slot) = wire.field_mut(spec.name) else {
            continue;
        };
        if !ctx.allows(spec.variant) {
            continue;
        }
        let value = config
            .field(spec.name)
            .unwrap_or_else(|| missing_accessor::<C>(spec));
        if slot.is_optional() && !value.is_known() {
            continue;
        }
        write_wire(spec, value, slot);
    }
    Ok(())
}

/// Refresh a config model from a wire model.
///
/// Persist-only fields keep their config value. Fields gated to the other
/// variant become null. Absent optional values become null, except string
/// lists, which become an empty list.
pub fn copy_wire_to_config<C, W>(ctx: &VariantContext, wire: &W, config: &mut C)
where
    C: ConfigModel,
    W: WireModel,
{
    for spec in C::FIELDS {
        if spec.skip {
            continue;
        }
        if spec.name == ID_FIELD {
            if let Some(id) = wire.id() {
                *config.id_mut() = Tristate::Known(id.to_string());
            }
            continue;
        }
        if spec.persist_only {
            continue;
        }
        let mut slot = config
            .field_mut(spec.name)
            .unwrap_or_else(|| missing_accessor::<C>(spec));
        if !ctx.allows(spec.variant) {
            slot.set_null();
            continue;
        }
        let Some(value) = wire.field(spec.name) else {
            continue;
        };
        write_config(spec, value, slot);
    }
}

/// A config model carrying only `id`, every other mapped field unknown.
///
/// Used to seed an import; the following read fills the rest.
pub fn import_config<C: ConfigModel>(id: &str) -> C {
    let mut config = C::default();
    *config.id_mut() = Tristate::Known(id.to_string());
    for spec in C::FIELDS {
        if spec.skip || spec.name == ID_FIELD {
            continue;
        }
        if let Some(mut slot) = config.field_mut(spec.name) {
            slot.set_unknown();
        }
    }
    config
}

fn write_wire(spec: &FieldSpec, value: ConfigField<'_>, slot: WireSlot<'_>) {
    match (value, slot) {
        (ConfigField::Str(v), WireSlot::Str(dst)) => {
            if let Some(v) = v.as_known() {
                dst.clone_from(v);
            }
        }
        (ConfigField::Str(v), WireSlot::OptStr(dst)) => {
            if let Some(v) = v.as_known() {
                *dst = Some(v.clone());
            }
        }
        (ConfigField::Int(v), WireSlot::Int(dst)) => {
            if let Some(v) = v.as_known() {
                *dst = *v;
            }
        }
        (ConfigField::Int(v), WireSlot::OptInt(dst)) => {
            if let Some(v) = v.as_known() {
                *dst = Some(*v);
            }
        }
        (ConfigField::Bool(v), WireSlot::Bool(dst)) => {
            if let Some(v) = v.as_known() {
                *dst = *v;
            }
        }
        (ConfigField::Bool(v), WireSlot::OptBool(dst)) => {
            if let Some(v) = v.as_known() {
                *dst = Some(*v);
            }
        }
        (value, slot) => panic!(
            "cannot map {} config field `{}` onto {} wire field",
            value.kind(),
            spec.name,
            slot.kind()
        ),
    }
}

fn write_config(spec: &FieldSpec, value: WireField<'_>, slot: ConfigSlot<'_>) {
    match (value, slot) {
        (WireField::Str(v), ConfigSlot::Str(dst)) => *dst = v.cloned().into(),
        (WireField::Int(v), ConfigSlot::Int(dst)) => *dst = v.into(),
        (WireField::Bool(v), ConfigSlot::Bool(dst)) => *dst = v.into(),
        (WireField::StrList(v), ConfigSlot::StrList(dst)) => {
            *dst = Tristate::Known(v.map(<[String]>::to_vec).unwrap_or_default());
        }
        (value, slot) => panic!(
            "cannot map {} wire field `{}` onto {} config field",
            value.kind(),
            spec.name,
            slot.kind()
        ),
    }
}

fn missing_accessor<C>(spec: &FieldSpec) -> ! {
    panic!(
        "{} lists field `{}` without an accessor",
        std::any::type_name::<C>(),
        spec.name
    )
}
