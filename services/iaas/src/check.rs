//! Client side validation of request parameters.
//!
//! Every check is a pure function over the parameter mapping and runs before
//! any network I/O.

use crate::params::{Params, Value};
use crate::rule::{Protocol, RouterStatic, RuleCodec, SecurityGroupRule, StaticType};
use qcsign_core::{Error, Result};

/// Constraints an action declares on its parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSpec {
    /// Keys that must be present.
    pub required: &'static [&'static str],
    /// Keys whose values must be integer coercible when present.
    pub integer: &'static [&'static str],
    /// Keys whose values must be lists when present.
    pub list: &'static [&'static str],
    /// Key carrying security group rules, if any.
    pub sg_rules: Option<&'static str>,
    /// Key carrying router statics, if any.
    pub router_statics: Option<&'static str>,
}

impl ValidationSpec {
    /// A spec without any constraint.
    pub const fn new() -> Self {
        Self {
            required: &[],
            integer: &[],
            list: &[],
            sg_rules: None,
            router_statics: None,
        }
    }

    /// Set required keys.
    pub const fn required(mut self, keys: &'static [&'static str]) -> Self {
        self.required = keys;
        self
    }

    /// Set integer keys.
    pub const fn integer(mut self, keys: &'static [&'static str]) -> Self {
        self.integer = keys;
        self
    }

    /// Set list keys.
    pub const fn list(mut self, keys: &'static [&'static str]) -> Self {
        self.list = keys;
        self
    }

    /// Validate the security group rules carried under `key`.
    pub const fn sg_rules(mut self, key: &'static str) -> Self {
        self.sg_rules = Some(key);
        self
    }

    /// Validate the router statics carried under `key`.
    pub const fn router_statics(mut self, key: &'static str) -> Self {
        self.router_statics = Some(key);
        self
    }
}

/// Fails with `MissingParameter` naming the first absent key.
pub fn check_required(params: &Params, keys: &[&str]) -> Result<()> {
    match keys.iter().find(|k| !params.contains_key(k)) {
        Some(k) => Err(Error::missing_parameter(format!("{k} is required"))),
        None => Ok(()),
    }
}

/// Whether the value is a boolean, an integer or a base-10 integer string.
pub fn check_integer(value: &Value) -> bool {
    value.coerce_int().is_some()
}

/// Fails with `InvalidParameter` naming the first key that is present but not
/// integer coercible.
pub fn check_integer_params(params: &Params, keys: &[&str]) -> Result<()> {
    for k in keys {
        match params.get(k) {
            Some(v) if !check_integer(v) => {
                return Err(Error::invalid_parameter(format!(
                    "{k} must be an integer, got {v}"
                )))
            }
            _ => {}
        }
    }
    Ok(())
}

/// Fails with `InvalidParameter` naming the first key that is present but not
/// a list.
pub fn check_list_params(params: &Params, keys: &[&str]) -> Result<()> {
    for k in keys {
        match params.get(k) {
            Some(v) if !v.is_list() => {
                return Err(Error::invalid_parameter(format!(
                    "{k} must be a list, got {v}"
                )))
            }
            _ => {}
        }
    }
    Ok(())
}

/// Run every check of `spec`: required, integer, list, then rule checks.
///
/// The first failure wins.
pub fn check_params(params: &Params, spec: &ValidationSpec) -> Result<()> {
    check_required(params, spec.required)?;
    check_integer_params(params, spec.integer)?;
    check_list_params(params, spec.list)?;

    if let Some(key) = spec.sg_rules {
        check_sg_rules(rule_items(params, key)?)?;
    }
    if let Some(key) = spec.router_statics {
        check_router_statics(rule_items(params, key)?)?;
    }
    Ok(())
}

fn rule_items<'a>(params: &'a Params, key: &str) -> Result<&'a [Value]> {
    match params.get(key) {
        None => Ok(&[]),
        Some(Value::List(items)) => Ok(items.as_slice()),
        Some(v) => Err(Error::invalid_parameter(format!(
            "{key} must be a list, got {v}"
        ))),
    }
}

fn rule_map<'a>(item: &'a Value, family: &str) -> Result<&'a Params> {
    match item {
        Value::Map(m) => Ok(m),
        v => Err(Error::invalid_parameter(format!(
            "{family} must be an object, got {v}"
        ))),
    }
}

fn check_fields<'a>(
    rule: &Params,
    fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    variant: &str,
) -> Result<()> {
    for (named, slot) in fields {
        if rule.named_or_slot(named, slot).is_none() {
            return Err(Error::invalid_parameter(format!(
                "{named} ({slot}) is required by {variant}"
            )));
        }
    }
    Ok(())
}

/// Check every security group rule mapping.
///
/// Each rule needs `protocol` and `priority`, a recognized protocol and the
/// fields that protocol requires, in named or slot form. The rule must then
/// decode, which bounds the priority.
pub fn check_sg_rules(rules: &[Value]) -> Result<()> {
    for item in rules {
        let rule = rule_map(item, "security group rule")?;
        check_required(rule, &["protocol", "priority"])?;

        let protocol: Protocol = rule
            .get("protocol")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .parse()
            .map_err(|e: Error| Error::invalid_parameter(e.message()))?;
        check_fields(
            rule,
            protocol.required_fields().iter().copied(),
            protocol.as_str(),
        )?;
        SecurityGroupRule::decode_wire(rule)?;
    }
    Ok(())
}

/// Check every router static mapping, keyed on `static_type`.
pub fn check_router_statics(statics: &[Value]) -> Result<()> {
    for item in statics {
        let rule = rule_map(item, "router static")?;
        check_required(rule, &["static_type"])?;

        let static_type = rule
            .get("static_type")
            .map(StaticType::from_value)
            .transpose()
            .map_err(|e| Error::invalid_parameter(e.message()))?
            .ok_or_else(|| Error::missing_parameter("static_type is required"))?;
        let required = static_type
            .fields()
            .iter()
            .filter(|(_, _, default)| default.is_none())
            .map(|(named, slot, _)| (*named, *slot));
        check_fields(rule, required, &static_type.to_string())?;
        RouterStatic::decode_wire(rule)?;
    }
    Ok(())
}
