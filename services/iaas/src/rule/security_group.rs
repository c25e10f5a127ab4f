use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::{common_field, RuleCodec};
use crate::params::{Params, Value};
use qcsign_core::{Error, Result};

/// Highest priority a security group rule may carry.
pub const MAX_PRIORITY: u8 = 100;

/// Protocol of a security group rule, the discriminant of the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// tcp
    Tcp,
    /// udp
    Udp,
    /// icmp
    Icmp,
    /// gre
    Gre,
}

impl Protocol {
    /// Name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Icmp => "icmp",
            Protocol::Gre => "gre",
        }
    }

    /// Named fields this protocol requires, paired with their slot keys.
    pub fn required_fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Protocol::Tcp | Protocol::Udp => &[
                ("start_port", "val1"),
                ("end_port", "val2"),
                ("ip_network", "val3"),
            ],
            Protocol::Icmp => &[
                ("icmp_type", "val1"),
                ("icmp_code", "val2"),
                ("ip_network", "val3"),
            ],
            Protocol::Gre => &[("ip_network", "val3")],
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "icmp" => Ok(Protocol::Icmp),
            "gre" => Ok(Protocol::Gre),
            v => Err(Error::unrecognized_variant(format!(
                "unknown security group rule protocol: {v}"
            ))),
        }
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of traffic a rule applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// `0` on the wire.
    #[default]
    Inbound,
    /// `1` on the wire.
    Outbound,
}

impl Direction {
    fn decode(value: Option<&Value>) -> Result<Self> {
        match value.map(|v| (v, v.coerce_int())) {
            None => Ok(Direction::Inbound),
            Some((_, Some(0))) => Ok(Direction::Inbound),
            Some((_, Some(1))) => Ok(Direction::Outbound),
            Some((v, _)) => Err(Error::invalid_parameter(format!(
                "direction must be 0 or 1, got {v}"
            ))),
        }
    }

    fn as_int(&self) -> i64 {
        match self {
            Direction::Inbound => 0,
            Direction::Outbound => 1,
        }
    }
}

/// What happens to matched traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuleAction {
    /// accept
    #[default]
    Accept,
    /// drop
    Drop,
}

impl RuleAction {
    fn decode(value: Option<&Value>) -> Result<Self> {
        match value.map(|v| (v, v.as_str())) {
            None => Ok(RuleAction::Accept),
            Some((_, Some("accept"))) => Ok(RuleAction::Accept),
            Some((_, Some("drop"))) => Ok(RuleAction::Drop),
            Some((v, _)) => Err(Error::invalid_parameter(format!(
                "action must be accept or drop, got {v}"
            ))),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            RuleAction::Accept => "accept",
            RuleAction::Drop => "drop",
        }
    }
}

/// Protocol specific part of a security group rule.
///
/// Ports and ICMP type and code may be left unset, which encodes to an empty
/// slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityGroupRuleKind {
    /// `val1` start port, `val2` end port, `val3` source network.
    Tcp {
        start_port: Option<u16>,
        end_port: Option<u16>,
        ip_network: String,
    },
    /// Same slots as tcp.
    Udp {
        start_port: Option<u16>,
        end_port: Option<u16>,
        ip_network: String,
    },
    /// `val1` icmp type, `val2` icmp code, `val3` source network.
    Icmp {
        icmp_type: Option<u8>,
        icmp_code: Option<u8>,
        ip_network: String,
    },
    /// Only `val3` is used.
    Gre { ip_network: String },
}

impl SecurityGroupRuleKind {
    /// Protocol of this kind.
    pub fn protocol(&self) -> Protocol {
        match self {
            SecurityGroupRuleKind::Tcp { .. } => Protocol::Tcp,
            SecurityGroupRuleKind::Udp { .. } => Protocol::Udp,
            SecurityGroupRuleKind::Icmp { .. } => Protocol::Icmp,
            SecurityGroupRuleKind::Gre { .. } => Protocol::Gre,
        }
    }
}

/// A security group rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupRule {
    /// `security_group_rule_id`, empty for rules not created yet.
    pub id: String,
    /// `security_group_rule_name`
    pub name: String,
    /// Priority in `0..=100`.
    pub priority: u8,
    pub direction: Direction,
    pub action: RuleAction,
    pub kind: SecurityGroupRuleKind,
}

impl SecurityGroupRule {
    /// Create an inbound accepting rule.
    pub fn new(priority: u8, kind: SecurityGroupRuleKind) -> Result<Self> {
        if priority > MAX_PRIORITY {
            return Err(Error::invalid_parameter(format!(
                "priority must be in 0..={MAX_PRIORITY}, got {priority}"
            )));
        }

        Ok(Self {
            id: String::new(),
            name: String::new(),
            priority,
            direction: Direction::default(),
            action: RuleAction::default(),
            kind,
        })
    }

    /// Set the rule name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the action.
    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.action = action;
        self
    }

    /// Protocol of this rule.
    pub fn protocol(&self) -> Protocol {
        self.kind.protocol()
    }
}

fn decode_priority(value: Option<&Value>) -> Result<u8> {
    let value = value.ok_or_else(|| Error::invalid_parameter("priority is required"))?;
    match value.as_int() {
        Some(p) if (0..=i64::from(MAX_PRIORITY)).contains(&p) => Ok(p as u8),
        Some(p) => Err(Error::invalid_parameter(format!(
            "priority must be in 0..={MAX_PRIORITY}, got {p}"
        ))),
        None => Err(Error::invalid_parameter(format!(
            "priority must be an integer, got {value}"
        ))),
    }
}

/// Decode an optional numeric slot, absent or empty means unset.
fn decode_number<T: TryFrom<i64>>(fields: &Params, named: &str, slot: &str) -> Result<Option<T>> {
    let Some(value) = fields.named_or_slot(named, slot) else {
        return Ok(None);
    };
    if value.as_str() == Some("") {
        return Ok(None);
    }

    value
        .coerce_int()
        .and_then(|v| T::try_from(v).ok())
        .map(Some)
        .ok_or_else(|| Error::invalid_parameter(format!("{named} is out of range: {value}")))
}

fn encode_number<T: Into<i64>>(v: Option<T>) -> Value {
    match v {
        Some(v) => Value::Int(v.into()),
        None => Value::Str(String::new()),
    }
}

impl RuleCodec for SecurityGroupRule {
    const DISCRIMINANT: &'static str = "protocol";

    fn decode(discriminant: &Value, fields: &Params) -> Result<Self> {
        let protocol: Protocol = discriminant
            .as_str()
            .ok_or_else(|| {
                Error::unrecognized_variant(format!(
                    "protocol must be a string, got {discriminant}"
                ))
            })?
            .parse()?;

        let ip_network = fields
            .named_or_slot("ip_network", "val3")
            .map(Value::to_wire_string)
            .unwrap_or_default();
        let kind = match protocol {
            Protocol::Tcp => SecurityGroupRuleKind::Tcp {
                start_port: decode_number(fields, "start_port", "val1")?,
                end_port: decode_number(fields, "end_port", "val2")?,
                ip_network,
            },
            Protocol::Udp => SecurityGroupRuleKind::Udp {
                start_port: decode_number(fields, "start_port", "val1")?,
                end_port: decode_number(fields, "end_port", "val2")?,
                ip_network,
            },
            Protocol::Icmp => SecurityGroupRuleKind::Icmp {
                icmp_type: decode_number(fields, "icmp_type", "val1")?,
                icmp_code: decode_number(fields, "icmp_code", "val2")?,
                ip_network,
            },
            Protocol::Gre => SecurityGroupRuleKind::Gre { ip_network },
        };

        Ok(Self {
            id: common_field(fields, "security_group_rule_id"),
            name: common_field(fields, "security_group_rule_name"),
            priority: decode_priority(fields.get("priority"))?,
            direction: Direction::decode(fields.get("direction"))?,
            action: RuleAction::decode(fields.get("action"))?,
            kind,
        })
    }

    fn encode(&self) -> Params {
        let (val1, val2, val3) = match &self.kind {
            SecurityGroupRuleKind::Tcp {
                start_port,
                end_port,
                ip_network,
            }
            | SecurityGroupRuleKind::Udp {
                start_port,
                end_port,
                ip_network,
            } => (
                encode_number(*start_port),
                encode_number(*end_port),
                ip_network.clone(),
            ),
            SecurityGroupRuleKind::Icmp {
                icmp_type,
                icmp_code,
                ip_network,
            } => (
                encode_number(*icmp_type),
                encode_number(*icmp_code),
                ip_network.clone(),
            ),
            SecurityGroupRuleKind::Gre { ip_network } => {
                (Value::from(""), Value::from(""), ip_network.clone())
            }
        };

        let mut wire = Params::new();
        wire.insert("security_group_rule_id", self.id.as_str())
            .insert("security_group_rule_name", self.name.as_str())
            .insert("protocol", self.protocol().as_str())
            .insert("priority", self.priority)
            .insert("direction", self.direction.as_int())
            .insert("action", self.action.as_str())
            .insert("val1", val1)
            .insert("val2", val2)
            .insert("val3", val3);
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qcsign_core::ErrorKind;
    use test_case::test_case;

    fn tcp(priority: u8, start: u16, end: u16) -> SecurityGroupRule {
        SecurityGroupRule::new(
            priority,
            SecurityGroupRuleKind::Tcp {
                start_port: Some(start),
                end_port: Some(end),
                ip_network: "192.168.1.0/24".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_encode_tcp_rule_into_slots() {
        let wire = tcp(1, 10, 200).encode();

        assert_eq!(wire.get("protocol"), Some(&Value::from("tcp")));
        assert_eq!(wire.get("priority"), Some(&Value::Int(1)));
        assert_eq!(wire.get("direction"), Some(&Value::Int(0)));
        assert_eq!(wire.get("action"), Some(&Value::from("accept")));
        assert_eq!(wire.get("val1"), Some(&Value::Int(10)));
        assert_eq!(wire.get("val2"), Some(&Value::Int(200)));
        assert_eq!(wire.get("val3"), Some(&Value::from("192.168.1.0/24")));
        assert!(wire.get("start_port").is_none());
    }

    #[test]
    fn test_round_trip_every_protocol() {
        let rules = vec![
            tcp(1, 22, 22).with_name("ssh"),
            SecurityGroupRule::new(
                2,
                SecurityGroupRuleKind::Udp {
                    start_port: Some(53),
                    end_port: None,
                    ip_network: String::new(),
                },
            )
            .unwrap(),
            SecurityGroupRule::new(
                3,
                SecurityGroupRuleKind::Icmp {
                    icmp_type: Some(8),
                    icmp_code: Some(0),
                    ip_network: "0.0.0.0/0".to_string(),
                },
            )
            .unwrap()
            .with_direction(Direction::Outbound),
            SecurityGroupRule::new(
                100,
                SecurityGroupRuleKind::Gre {
                    ip_network: "10.0.0.0/8".to_string(),
                },
            )
            .unwrap()
            .with_action(RuleAction::Drop),
        ];

        for rule in rules {
            let decoded = SecurityGroupRule::decode_wire(&rule.encode()).unwrap();
            assert_eq!(decoded, rule);
        }
    }

    #[test]
    fn test_decode_prefers_named_fields_over_slots() {
        let fields = Params::from_iter([
            ("priority", Value::Int(5)),
            ("start_port", Value::Int(80)),
            ("val1", Value::Int(1)),
            ("val2", Value::Int(443)),
            ("ip_network", Value::from("10.0.0.0/8")),
        ]);

        let rule = SecurityGroupRule::decode(&Value::from("tcp"), &fields).unwrap();
        assert_eq!(
            rule.kind,
            SecurityGroupRuleKind::Tcp {
                start_port: Some(80),
                end_port: Some(443),
                ip_network: "10.0.0.0/8".to_string(),
            }
        );
    }

    #[test_case(Value::from("tcp"), ErrorKind::InvalidParameter; "string priority")]
    #[test_case(Value::Int(101), ErrorKind::InvalidParameter; "priority above max")]
    #[test_case(Value::Int(-1), ErrorKind::InvalidParameter; "negative priority")]
    fn test_decode_rejects_bad_priority(priority: Value, kind: ErrorKind) {
        let fields = Params::from_iter([
            ("priority", priority),
            ("val1", Value::Int(1)),
            ("val2", Value::Int(2)),
            ("val3", Value::from("")),
        ]);
        let err = SecurityGroupRule::decode(&Value::from("tcp"), &fields).unwrap_err();
        assert_eq!(err.kind(), kind);
    }

    #[test_case(0; "lowest priority")]
    #[test_case(100; "highest priority")]
    fn test_decode_accepts_priority_bounds(priority: i64) {
        for protocol in ["tcp", "udp", "icmp", "gre"] {
            let fields = Params::from_iter([("priority", priority)]);
            let rule = SecurityGroupRule::decode(&Value::from(protocol), &fields).unwrap();
            assert_eq!(i64::from(rule.priority), priority);
            assert_eq!(rule.protocol().as_str(), protocol);
        }
    }

    #[test_case("sctp", ErrorKind::UnrecognizedVariant; "unknown protocol")]
    #[test_case("TCP", ErrorKind::UnrecognizedVariant; "protocol is case sensitive")]
    fn test_decode_rejects_unknown_protocol(protocol: &str, kind: ErrorKind) {
        let fields = Params::from_iter([("priority", 1)]);
        let err = SecurityGroupRule::decode(&Value::from(protocol), &fields).unwrap_err();
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn test_decode_leaves_absent_slots_unset() {
        let fields = Params::from_iter([("priority", 1), ("start_port", 10), ("end_port", 200)]);
        let rule = SecurityGroupRule::decode(&Value::from("tcp"), &fields).unwrap();
        assert_eq!(
            rule.kind,
            SecurityGroupRuleKind::Tcp {
                start_port: Some(10),
                end_port: Some(200),
                ip_network: String::new(),
            }
        );

        let fields = Params::from_iter([("priority", 0)]);
        let rule = SecurityGroupRule::decode(&Value::from("icmp"), &fields).unwrap();
        assert_eq!(
            rule.kind,
            SecurityGroupRuleKind::Icmp {
                icmp_type: None,
                icmp_code: None,
                ip_network: String::new(),
            }
        );
    }

    #[test]
    fn test_new_rejects_priority_above_max() {
        let err = SecurityGroupRule::new(
            101,
            SecurityGroupRuleKind::Gre {
                ip_network: String::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
