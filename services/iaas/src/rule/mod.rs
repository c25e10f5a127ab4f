//! Rule families that ride on the generic `val1..valN` wire slots.
//!
//! The API carries heterogeneous rules in a fixed-width positional schema: a
//! discriminant field selects the variant and the variant decides what each
//! slot means. Every family implements [`RuleCodec`] to move between the typed
//! form and that wire form.

mod router_static;
pub use router_static::{RouterStatic, RouterStaticKind, StaticType};

mod security_group;
pub use security_group::{
    Direction, Protocol, RuleAction, SecurityGroupRule, SecurityGroupRuleKind,
};

use crate::params::{Params, Value};
use qcsign_core::{Error, Result};

/// Bidirectional mapping between a typed rule and its slot mapping.
pub trait RuleCodec: Sized {
    /// Wire key of the discriminant, like `protocol`.
    const DISCRIMINANT: &'static str;

    /// Decode a rule from its discriminant and fields.
    ///
    /// Every named field is taken from its named key if present, otherwise
    /// from its slot key. An unknown discriminant yields
    /// [`qcsign_core::ErrorKind::UnrecognizedVariant`].
    fn decode(discriminant: &Value, fields: &Params) -> Result<Self>;

    /// Encode the rule into common fields plus every slot of the family.
    fn encode(&self) -> Params;

    /// Decode a wire mapping that carries its own discriminant.
    fn decode_wire(wire: &Params) -> Result<Self> {
        let discriminant = wire.get(Self::DISCRIMINANT).ok_or_else(|| {
            Error::missing_parameter(format!("{} is required", Self::DISCRIMINANT))
        })?;
        Self::decode(discriminant, wire)
    }
}

/// Result of [`decode_batch`]: the wire text held either one rule or many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<R> {
    /// The text was a single object.
    One(R),
    /// The text was an array, rules are kept in input order.
    Many(Vec<R>),
}

impl<R> Decoded<R> {
    /// Flatten into a list.
    pub fn into_vec(self) -> Vec<R> {
        match self {
            Decoded::One(r) => vec![r],
            Decoded::Many(rs) => rs,
        }
    }
}

/// Decode rules from their JSON wire text.
///
/// A single object decodes into [`Decoded::One`], an array into
/// [`Decoded::Many`].
pub fn decode_batch<R: RuleCodec>(json: &str) -> Result<Decoded<R>> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        Error::invalid_parameter(format!("rules are not valid json: {e}")).with_source(e)
    })?;
    match Value::from_json(value) {
        Some(value) => decode_value(&value),
        None => Err(Error::invalid_parameter("rules must not be null")),
    }
}

/// Decode rules from an already parsed value.
pub fn decode_value<R: RuleCodec>(value: &Value) -> Result<Decoded<R>> {
    match value {
        Value::Map(wire) => R::decode_wire(wire).map(Decoded::One),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Map(wire) => R::decode_wire(wire),
                other => Err(Error::invalid_parameter(format!(
                    "rule must be an object, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Decoded::Many),
        other => Err(Error::invalid_parameter(format!(
            "rules must be an object or an array, got {other}"
        ))),
    }
}

/// Decode the rules carried by a describe response under `key`, like
/// `security_group_rule_set`.
///
/// A missing key yields an empty list.
pub fn decode_set<R: RuleCodec>(
    resp: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<Vec<R>> {
    match resp.get(key).cloned().and_then(Value::from_json) {
        Some(value) => decode_value(&value).map(Decoded::into_vec),
        None => Ok(Vec::new()),
    }
}

/// Anything that can be turned into a list of rules.
///
/// Wire text is decoded, rules that are already decoded pass through
/// unchanged.
pub trait IntoRules<R> {
    /// Convert into rules.
    fn into_rules(self) -> Result<Vec<R>>;
}

impl<R: RuleCodec> IntoRules<R> for &str {
    fn into_rules(self) -> Result<Vec<R>> {
        decode_batch(self).map(Decoded::into_vec)
    }
}

impl<R: RuleCodec> IntoRules<R> for String {
    fn into_rules(self) -> Result<Vec<R>> {
        decode_batch(&self).map(Decoded::into_vec)
    }
}

impl<R: RuleCodec> IntoRules<R> for Vec<R> {
    fn into_rules(self) -> Result<Vec<R>> {
        Ok(self)
    }
}

impl<R: RuleCodec> IntoRules<R> for Decoded<R> {
    fn into_rules(self) -> Result<Vec<R>> {
        Ok(self.into_vec())
    }
}

/// Encode rules into the list value sent under `rules` or `statics`.
pub fn encode_list<R: RuleCodec>(rules: &[R]) -> Value {
    Value::List(rules.iter().map(|r| Value::Map(r.encode())).collect())
}

/// Resolve a string field: named key, then slot key, then default.
///
/// An empty value counts as absent when the field has a default.
fn string_field(
    fields: &Params,
    named: &str,
    slot: &str,
    default: Option<&str>,
    variant: &str,
) -> Result<String> {
    let value = fields
        .named_or_slot(named, slot)
        .map(Value::to_wire_string)
        .filter(|v| !(v.is_empty() && default.is_some()));
    match value {
        Some(v) => Ok(v),
        None => default.map(str::to_string).ok_or_else(|| {
            Error::invalid_parameter(format!("{named} ({slot}) is required by {variant}"))
        }),
    }
}

/// Get an optional common field rendered as string, empty if absent.
fn common_field(fields: &Params, key: &str) -> String {
    fields
        .get(key)
        .map(Value::to_wire_string)
        .unwrap_or_default()
}
