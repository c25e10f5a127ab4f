use super::{Action, Paging};
use crate::check::ValidationSpec;
use crate::params::Params;
use crate::rule::{encode_list, IntoRules, SecurityGroupRule};
use qcsign_core::Result;

/// Describe security groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeSecurityGroups {
    pub security_groups: Vec<String>,
    pub paging: Paging,
}

impl Action for DescribeSecurityGroups {
    const NAME: &'static str = "DescribeSecurityGroups";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone"])
        .integer(&["offset", "limit", "verbose"])
        .list(&["security_groups"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params.insert_list("security_groups", self.security_groups.clone());
        self.paging.write(&mut params);
        Ok(params)
    }
}

/// Create an empty security group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateSecurityGroup {
    pub security_group_name: Option<String>,
}

impl Action for CreateSecurityGroup {
    const NAME: &'static str = "CreateSecurityGroup";
    const SPEC: ValidationSpec = ValidationSpec::new().required(&["zone"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params.insert_opt("security_group_name", self.security_group_name.clone());
        Ok(params)
    }
}

/// Add rules to a security group.
///
/// Rules are sent as `rules.N.*` after being checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddSecurityGroupRules {
    pub security_group: String,
    pub rules: Vec<SecurityGroupRule>,
}

impl AddSecurityGroupRules {
    /// Add `rules` to `security_group`, rules may be given as wire text.
    pub fn new(
        security_group: impl Into<String>,
        rules: impl IntoRules<SecurityGroupRule>,
    ) -> Result<Self> {
        Ok(Self {
            security_group: security_group.into(),
            rules: rules.into_rules()?,
        })
    }
}

impl Action for AddSecurityGroupRules {
    const NAME: &'static str = "AddSecurityGroupRules";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone", "security_group", "rules"])
        .list(&["rules"])
        .sg_rules("rules");

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        if !self.security_group.is_empty() {
            params.insert("security_group", self.security_group.as_str());
        }
        if !self.rules.is_empty() {
            params.insert("rules", encode_list(&self.rules));
        }
        Ok(params)
    }
}

/// Describe the rules of security groups.
///
/// Use [`crate::decode_set`] with `security_group_rule_set` to read them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeSecurityGroupRules {
    pub security_group: Option<String>,
    pub security_group_rules: Vec<String>,
    /// `0` inbound, `1` outbound.
    pub direction: Option<i64>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl Action for DescribeSecurityGroupRules {
    const NAME: &'static str = "DescribeSecurityGroupRules";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone"])
        .integer(&["direction", "offset", "limit"])
        .list(&["security_group_rules"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params
            .insert_opt("security_group", self.security_group.clone())
            .insert_list("security_group_rules", self.security_group_rules.clone())
            .insert_opt("direction", self.direction)
            .insert_opt("offset", self.offset)
            .insert_opt("limit", self.limit);
        Ok(params)
    }
}

/// Apply the rules of a security group to instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySecurityGroup {
    pub security_group: String,
    /// All instances of the group when empty.
    pub instances: Vec<String>,
}

impl Action for ApplySecurityGroup {
    const NAME: &'static str = "ApplySecurityGroup";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone", "security_group"])
        .list(&["instances"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        if !self.security_group.is_empty() {
            params.insert("security_group", self.security_group.as_str());
        }
        params.insert_list("instances", self.instances.clone());
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::check_params;
    use crate::params::Value;
    use crate::rule::SecurityGroupRuleKind;
    use pretty_assertions::assert_eq;
    use qcsign_core::ErrorKind;

    #[test]
    fn test_add_rules_from_wire_text() {
        let req = AddSecurityGroupRules::new(
            "sg-1",
            r#"[{"protocol": "tcp", "priority": 1, "val1": 22, "val2": 22, "val3": ""}]"#,
        )
        .unwrap();
        assert_eq!(req.rules.len(), 1);

        let params = req.to_params().unwrap().with("zone", "pek3a");
        check_params(&params, &AddSecurityGroupRules::SPEC).unwrap();

        let flat = params.flatten();
        assert_eq!(flat.get("rules.1.protocol"), Some(&Value::from("tcp")));
        assert_eq!(flat.get("rules.1.val1"), Some(&Value::Int(22)));
        assert_eq!(flat.get("rules.1.val3"), Some(&Value::from("")));
    }

    #[test]
    fn test_add_rules_from_typed_rules() {
        let rule = SecurityGroupRule::new(
            1,
            SecurityGroupRuleKind::Icmp {
                icmp_type: Some(8),
                icmp_code: Some(0),
                ip_network: String::new(),
            },
        )
        .unwrap();
        let req = AddSecurityGroupRules::new("sg-1", vec![rule.clone()]).unwrap();
        assert_eq!(req.rules, vec![rule]);
    }

    #[test]
    fn test_add_rules_rejects_bad_wire_text() {
        let err = AddSecurityGroupRules::new(
            "sg-1",
            r#"[{"protocol": "sctp", "priority": 1}]"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedVariant);
    }

    #[test]
    fn test_add_rules_requires_rules() {
        let req = AddSecurityGroupRules {
            security_group: "sg-1".to_string(),
            rules: vec![],
        };
        let params = req.to_params().unwrap().with("zone", "pek3a");
        let err = check_params(&params, &AddSecurityGroupRules::SPEC).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);
    }
}
