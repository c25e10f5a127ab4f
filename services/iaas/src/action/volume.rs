use super::{Action, Paging};
use crate::check::ValidationSpec;
use crate::params::Params;
use qcsign_core::Result;

/// Describe volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeVolumes {
    pub volumes: Vec<String>,
    pub volume_type: Option<i64>,
    /// Volumes attached to this instance.
    pub instance_id: Option<String>,
    pub status: Vec<String>,
    pub paging: Paging,
}

impl Action for DescribeVolumes {
    const NAME: &'static str = "DescribeVolumes";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone"])
        .integer(&["volume_type", "offset", "limit", "verbose"])
        .list(&["volumes", "status"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params
            .insert_list("volumes", self.volumes.clone())
            .insert_opt("volume_type", self.volume_type)
            .insert_opt("instance_id", self.instance_id.clone())
            .insert_list("status", self.status.clone());
        self.paging.write(&mut params);
        Ok(params)
    }
}

/// Create volumes of `size` GB.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateVolumes {
    pub size: i64,
    pub volume_name: Option<String>,
    pub volume_type: Option<i64>,
    pub count: Option<i64>,
}

impl Action for CreateVolumes {
    const NAME: &'static str = "CreateVolumes";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone", "size"])
        .integer(&["size", "count", "volume_type"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params
            .insert("size", self.size)
            .insert_opt("volume_name", self.volume_name.clone())
            .insert_opt("volume_type", self.volume_type)
            .insert_opt("count", self.count);
        Ok(params)
    }
}

/// Attach volumes to an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachVolumes {
    pub volumes: Vec<String>,
    pub instance: String,
}

impl Action for AttachVolumes {
    const NAME: &'static str = "AttachVolumes";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone", "volumes", "instance"])
        .list(&["volumes"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params.insert_list("volumes", self.volumes.clone());
        if !self.instance.is_empty() {
            params.insert("instance", self.instance.as_str());
        }
        Ok(params)
    }
}
