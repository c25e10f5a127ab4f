use super::{Action, Paging};
use crate::check::ValidationSpec;
use crate::params::Params;
use qcsign_core::Result;

/// Describe instances, filtered by the given fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeInstances {
    pub instances: Vec<String>,
    pub image_id: Vec<String>,
    pub instance_type: Vec<String>,
    pub status: Vec<String>,
    pub tags: Vec<String>,
    pub paging: Paging,
}

impl Action for DescribeInstances {
    const NAME: &'static str = "DescribeInstances";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone"])
        .integer(&["offset", "limit", "verbose"])
        .list(&["instances", "image_id", "instance_type", "status", "tags"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params
            .insert_list("instances", self.instances.clone())
            .insert_list("image_id", self.image_id.clone())
            .insert_list("instance_type", self.instance_type.clone())
            .insert_list("status", self.status.clone())
            .insert_list("tags", self.tags.clone());
        self.paging.write(&mut params);
        Ok(params)
    }
}

/// Create instances from an image.
///
/// Either `instance_type` or `cpu` plus `memory` decide the size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunInstances {
    pub image_id: String,
    pub instance_type: Option<String>,
    pub cpu: Option<i64>,
    /// In MB.
    pub memory: Option<i64>,
    pub count: Option<i64>,
    pub instance_name: Option<String>,
    /// `keypair` or `passwd`.
    pub login_mode: String,
    pub login_keypair: Option<String>,
    pub login_passwd: Option<String>,
    pub vxnets: Vec<String>,
    pub security_group: Option<String>,
    pub volumes: Vec<String>,
    pub need_newsid: Option<bool>,
    pub need_userdata: Option<bool>,
    pub userdata_type: Option<String>,
    pub userdata_value: Option<String>,
}

impl RunInstances {
    /// Run one instance of `image_id` logging in with `login_mode`.
    pub fn new(image_id: impl Into<String>, login_mode: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            login_mode: login_mode.into(),
            ..Default::default()
        }
    }
}

impl Action for RunInstances {
    const NAME: &'static str = "RunInstances";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone", "image_id", "login_mode"])
        .integer(&["count", "cpu", "memory", "need_newsid", "need_userdata"])
        .list(&["vxnets", "volumes"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        if !self.image_id.is_empty() {
            params.insert("image_id", self.image_id.as_str());
        }
        if !self.login_mode.is_empty() {
            params.insert("login_mode", self.login_mode.as_str());
        }
        params
            .insert_opt("instance_type", self.instance_type.clone())
            .insert_opt("cpu", self.cpu)
            .insert_opt("memory", self.memory)
            .insert_opt("count", self.count)
            .insert_opt("instance_name", self.instance_name.clone())
            .insert_opt("login_keypair", self.login_keypair.clone())
            .insert_opt("login_passwd", self.login_passwd.clone())
            .insert_list("vxnets", self.vxnets.clone())
            .insert_opt("security_group", self.security_group.clone())
            .insert_list("volumes", self.volumes.clone())
            .insert_opt("need_newsid", self.need_newsid)
            .insert_opt("need_userdata", self.need_userdata)
            .insert_opt("userdata_type", self.userdata_type.clone())
            .insert_opt("userdata_value", self.userdata_value.clone());
        Ok(params)
    }
}

/// Terminate instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminateInstances {
    pub instances: Vec<String>,
    /// `1` to skip the recycle bin.
    pub direct_cease: Option<i64>,
}

impl Action for TerminateInstances {
    const NAME: &'static str = "TerminateInstances";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone", "instances"])
        .integer(&["direct_cease"])
        .list(&["instances"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params
            .insert_list("instances", self.instances.clone())
            .insert_opt("direct_cease", self.direct_cease);
        Ok(params)
    }
}
