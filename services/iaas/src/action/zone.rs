use super::Action;
use crate::check::ValidationSpec;
use crate::params::Params;
use qcsign_core::Result;

/// List zones, the only action that needs no zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeZones {
    pub zones: Vec<String>,
    /// `active` or `faulty`.
    pub status: Vec<String>,
}

impl Action for DescribeZones {
    const NAME: &'static str = "DescribeZones";
    const SPEC: ValidationSpec = ValidationSpec::new().list(&["zones", "status"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params
            .insert_list("zones", self.zones.clone())
            .insert_list("status", self.status.clone());
        Ok(params)
    }
}
