use std::fmt::{Display, Formatter};

use super::{common_field, string_field, RuleCodec};
use crate::params::{Params, Value};
use qcsign_core::{Error, Result};

/// Number of generic slots a router static carries on the wire.
const SLOTS: [&str; 6] = ["val1", "val2", "val3", "val4", "val5", "val6"];

/// Static type of a router static, the discriminant of the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticType {
    /// `1`
    PortForwarding,
    /// `2`
    Vpn,
    /// `4`
    Tunnel,
    /// `5`
    Filtering,
}

impl StaticType {
    /// Value on the wire.
    pub fn as_int(&self) -> i64 {
        match self {
            StaticType::PortForwarding => 1,
            StaticType::Vpn => 2,
            StaticType::Tunnel => 4,
            StaticType::Filtering => 5,
        }
    }

    /// Named fields in slot order, with their slot keys and defaults.
    ///
    /// A field without default is required.
    pub fn fields(&self) -> &'static [(&'static str, &'static str, Option<&'static str>)] {
        match self {
            StaticType::PortForwarding => &[
                ("src_port", "val1", None),
                ("dst_ip", "val2", None),
                ("dst_port", "val3", None),
                ("protocol", "val4", Some("tcp")),
            ],
            StaticType::Vpn => &[
                ("vpn_type", "val1", Some("openvpn")),
                ("serv_port", "val2", Some("1194")),
                ("serv_protocol", "val3", Some("udp")),
                ("ip_network", "val4", None),
            ],
            StaticType::Tunnel => &[("value", "val1", None)],
            StaticType::Filtering => &[
                ("src_ip", "val1", Some("")),
                ("src_port", "val2", Some("")),
                ("dst_ip", "val3", Some("")),
                ("dst_port", "val4", Some("")),
                ("priority", "val5", Some("1")),
                ("action", "val6", None),
            ],
        }
    }

    /// Parse the wire value, integers and integer strings are accepted.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value.coerce_int() {
            Some(1) => Ok(StaticType::PortForwarding),
            Some(2) => Ok(StaticType::Vpn),
            Some(4) => Ok(StaticType::Tunnel),
            Some(5) => Ok(StaticType::Filtering),
            _ => Err(Error::unrecognized_variant(format!(
                "unknown router static type: {value}"
            ))),
        }
    }
}

impl TryFrom<i64> for StaticType {
    type Error = Error;

    fn try_from(v: i64) -> Result<Self> {
        StaticType::from_value(&Value::Int(v))
    }
}

impl Display for StaticType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StaticType::PortForwarding => "port forwarding",
            StaticType::Vpn => "vpn",
            StaticType::Tunnel => "tunnel",
            StaticType::Filtering => "filtering",
        };
        f.write_str(name)
    }
}

/// Type specific part of a router static.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterStaticKind {
    PortForwarding {
        name: String,
        src_port: String,
        dst_ip: String,
        dst_port: String,
        protocol: String,
    },
    Vpn {
        vpn_type: String,
        serv_port: String,
        serv_protocol: String,
        ip_network: String,
    },
    Tunnel {
        vxnet_id: String,
        /// Tunnel entries like `gre|182.130.1.2|key`.
        value: String,
    },
    Filtering {
        name: String,
        src_ip: String,
        src_port: String,
        dst_ip: String,
        dst_port: String,
        priority: String,
        /// `accept` or `drop`.
        action: String,
    },
}

/// A static rule of a router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterStatic {
    /// `router_static_id`, empty for statics not created yet.
    pub id: String,
    pub kind: RouterStaticKind,
}

impl RouterStatic {
    /// Forward `src_port` on the router to `dst_ip:dst_port` over tcp.
    pub fn port_forwarding(
        src_port: impl Into<String>,
        dst_ip: impl Into<String>,
        dst_port: impl Into<String>,
    ) -> Self {
        Self::from(RouterStaticKind::PortForwarding {
            name: String::new(),
            src_port: src_port.into(),
            dst_ip: dst_ip.into(),
            dst_port: dst_port.into(),
            protocol: "tcp".to_string(),
        })
    }

    /// An openvpn service on udp 1194 for `ip_network`.
    pub fn vpn(ip_network: impl Into<String>) -> Self {
        Self::from(RouterStaticKind::Vpn {
            vpn_type: "openvpn".to_string(),
            serv_port: "1194".to_string(),
            serv_protocol: "udp".to_string(),
            ip_network: ip_network.into(),
        })
    }

    /// Tunnel entries for `vxnet_id`.
    pub fn tunnel(vxnet_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::from(RouterStaticKind::Tunnel {
            vxnet_id: vxnet_id.into(),
            value: value.into(),
        })
    }

    /// Static type of this static.
    pub fn static_type(&self) -> StaticType {
        match self.kind {
            RouterStaticKind::PortForwarding { .. } => StaticType::PortForwarding,
            RouterStaticKind::Vpn { .. } => StaticType::Vpn,
            RouterStaticKind::Tunnel { .. } => StaticType::Tunnel,
            RouterStaticKind::Filtering { .. } => StaticType::Filtering,
        }
    }
}

impl From<RouterStaticKind> for RouterStatic {
    fn from(kind: RouterStaticKind) -> Self {
        Self {
            id: String::new(),
            kind,
        }
    }
}

impl RuleCodec for RouterStatic {
    const DISCRIMINANT: &'static str = "static_type";

    fn decode(discriminant: &Value, fields: &Params) -> Result<Self> {
        let static_type = StaticType::from_value(discriminant)?;
        let variant = static_type.to_string();
        let mut values = static_type
            .fields()
            .iter()
            .map(|(named, slot, default)| string_field(fields, named, slot, *default, &variant))
            .collect::<Result<Vec<_>>>()?
            .into_iter();
        let mut next = || values.next().unwrap_or_default();

        let name = common_field(fields, "router_static_name");
        let kind = match static_type {
            StaticType::PortForwarding => RouterStaticKind::PortForwarding {
                name,
                src_port: next(),
                dst_ip: next(),
                dst_port: next(),
                protocol: next(),
            },
            StaticType::Vpn => RouterStaticKind::Vpn {
                vpn_type: next(),
                serv_port: next(),
                serv_protocol: next(),
                ip_network: next(),
            },
            StaticType::Tunnel => RouterStaticKind::Tunnel {
                vxnet_id: common_field(fields, "vxnet_id"),
                value: next(),
            },
            StaticType::Filtering => RouterStaticKind::Filtering {
                name,
                src_ip: next(),
                src_port: next(),
                dst_ip: next(),
                dst_port: next(),
                priority: next(),
                action: next(),
            },
        };

        Ok(Self {
            id: common_field(fields, "router_static_id"),
            kind,
        })
    }

    fn encode(&self) -> Params {
        let mut wire = Params::new();
        wire.insert("router_static_id", self.id.as_str())
            .insert("static_type", self.static_type().as_int());

        let slots: Vec<&String> = match &self.kind {
            RouterStaticKind::PortForwarding {
                name,
                src_port,
                dst_ip,
                dst_port,
                protocol,
            } => {
                wire.insert("router_static_name", name.as_str());
                vec![src_port, dst_ip, dst_port, protocol]
            }
            RouterStaticKind::Vpn {
                vpn_type,
                serv_port,
                serv_protocol,
                ip_network,
            } => vec![vpn_type, serv_port, serv_protocol, ip_network],
            RouterStaticKind::Tunnel { vxnet_id, value } => {
                wire.insert("vxnet_id", vxnet_id.as_str());
                vec![value]
            }
            RouterStaticKind::Filtering {
                name,
                src_ip,
                src_port,
                dst_ip,
                dst_port,
                priority,
                action,
            } => {
                wire.insert("router_static_name", name.as_str());
                vec![src_ip, src_port, dst_ip, dst_port, priority, action]
            }
        };

        for (i, key) in SLOTS.iter().enumerate() {
            let value = slots.get(i).map(|v| v.as_str()).unwrap_or_default();
            wire.insert(*key, value);
        }
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qcsign_core::ErrorKind;
    use test_case::test_case;

    #[test]
    fn test_vpn_acquires_defaults_on_encode() {
        let fields = Params::from_iter([("ip_network", "10.255.0.0/24")]);
        let vpn = RouterStatic::decode(&Value::Int(2), &fields).unwrap();
        assert_eq!(vpn, RouterStatic::vpn("10.255.0.0/24"));

        let wire = vpn.encode();
        assert_eq!(wire.get("static_type"), Some(&Value::Int(2)));
        assert_eq!(wire.get("val1"), Some(&Value::from("openvpn")));
        assert_eq!(wire.get("val2"), Some(&Value::from("1194")));
        assert_eq!(wire.get("val3"), Some(&Value::from("udp")));
        assert_eq!(wire.get("val4"), Some(&Value::from("10.255.0.0/24")));
        assert_eq!(wire.get("val5"), Some(&Value::from("")));
        assert_eq!(wire.get("val6"), Some(&Value::from("")));
    }

    #[test]
    fn test_empty_slot_falls_back_to_default() {
        let fields = Params::from_iter([("val1", ""), ("val4", "10.255.0.0/24")]);
        let vpn = RouterStatic::decode(&Value::from("2"), &fields).unwrap();
        assert_eq!(vpn, RouterStatic::vpn("10.255.0.0/24"));
    }

    #[test]
    fn test_round_trip_every_type() {
        let mut statics = vec![
            RouterStatic::port_forwarding("8080", "192.168.0.2", "80"),
            RouterStatic::vpn("10.255.0.0/24"),
            RouterStatic::tunnel("vxnet-1", "gre|182.130.1.2|key;gre|182.130.1.3|"),
            RouterStatic::from(RouterStaticKind::Filtering {
                name: "deny ssh".to_string(),
                src_ip: "10.0.0.0/24".to_string(),
                src_port: String::new(),
                dst_ip: String::new(),
                dst_port: "22".to_string(),
                priority: "2".to_string(),
                action: "drop".to_string(),
            }),
        ];
        statics[0].id = "rtrs-1".to_string();

        for s in statics {
            let wire = s.encode();
            for slot in SLOTS {
                assert!(wire.contains_key(slot), "{slot} missing in {wire:?}");
            }
            assert_eq!(RouterStatic::decode_wire(&wire).unwrap(), s);
        }
    }

    #[test]
    fn test_decode_named_fields() {
        let fields = Params::from_iter([
            ("router_static_name", "web"),
            ("src_port", "80"),
            ("val2", "192.168.0.2"),
            ("dst_port", "8080"),
            ("protocol", "udp"),
        ]);
        let s = RouterStatic::decode(&Value::Int(1), &fields).unwrap();
        assert_eq!(
            s.kind,
            RouterStaticKind::PortForwarding {
                name: "web".to_string(),
                src_port: "80".to_string(),
                dst_ip: "192.168.0.2".to_string(),
                dst_port: "8080".to_string(),
                protocol: "udp".to_string(),
            }
        );
    }

    #[test_case(Value::Int(3); "unused type")]
    #[test_case(Value::from("notsupported"); "not a number")]
    #[test_case(Value::Float(1.0); "float")]
    fn test_decode_rejects_unknown_type(static_type: Value) {
        let err = RouterStatic::decode(&static_type, &Params::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedVariant);
    }

    #[test_case(1, &[("src_port", "80"), ("dst_ip", "192.168.0.2")]; "port forwarding without dst_port")]
    #[test_case(2, &[]; "vpn without ip_network")]
    #[test_case(4, &[("vxnet_id", "vxnet-1")]; "tunnel without value")]
    #[test_case(5, &[("src_ip", "10.0.0.0/24")]; "filtering without action")]
    fn test_decode_rejects_missing_fields(static_type: i64, fields: &[(&str, &str)]) {
        let fields = Params::from_iter(fields.iter().copied());
        let err = RouterStatic::decode(&Value::Int(static_type), &fields).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
