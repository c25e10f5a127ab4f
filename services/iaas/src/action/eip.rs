use super::Action;
use crate::check::ValidationSpec;
use crate::params::Params;
use qcsign_core::Result;

/// Allocate eips with `bandwidth` Mbps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocateEips {
    pub bandwidth: i64,
    /// `bandwidth` or `traffic`.
    pub billing_mode: Option<String>,
    pub eip_name: Option<String>,
    pub count: Option<i64>,
    pub need_icp: Option<bool>,
}

impl Action for AllocateEips {
    const NAME: &'static str = "AllocateEips";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone", "bandwidth"])
        .integer(&["bandwidth", "count", "need_icp"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params
            .insert("bandwidth", self.bandwidth)
            .insert_opt("billing_mode", self.billing_mode.clone())
            .insert_opt("eip_name", self.eip_name.clone())
            .insert_opt("count", self.count)
            .insert_opt("need_icp", self.need_icp);
        Ok(params)
    }
}

/// Associate an eip with an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociateEip {
    pub eip: String,
    pub instance: String,
}

impl Action for AssociateEip {
    const NAME: &'static str = "AssociateEip";
    const SPEC: ValidationSpec = ValidationSpec::new().required(&["zone", "eip", "instance"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        for (k, v) in [("eip", &self.eip), ("instance", &self.instance)] {
            if !v.is_empty() {
                params.insert(k, v);
            }
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::check_params;
    use qcsign_core::ErrorKind;

    #[test]
    fn test_associate_eip_requires_both_ends() {
        let req = AssociateEip {
            eip: "eip-1".to_string(),
            ..Default::default()
        };
        let params = req.to_params().unwrap().with("zone", "pek3a");
        let err = check_params(&params, &AssociateEip::SPEC).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);
        assert!(err.message().contains("instance"));
    }

    #[test]
    fn test_allocate_eips_need_icp_is_integer() {
        let req = AllocateEips {
            bandwidth: 2,
            need_icp: Some(false),
            ..Default::default()
        };
        let params = req.to_params().unwrap().with("zone", "pek3a");
        check_params(&params, &AllocateEips::SPEC).unwrap();
    }
}
