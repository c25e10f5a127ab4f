use super::{Action, Paging};
use crate::check::ValidationSpec;
use crate::params::Params;
use crate::rule::{encode_list, IntoRules, RouterStatic, StaticType};
use qcsign_core::Result;

/// Describe routers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeRouters {
    pub routers: Vec<String>,
    /// Routers joined by this vxnet.
    pub vxnet: Option<String>,
    pub status: Vec<String>,
    pub paging: Paging,
}

impl Action for DescribeRouters {
    const NAME: &'static str = "DescribeRouters";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone"])
        .integer(&["offset", "limit", "verbose"])
        .list(&["routers", "status"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params
            .insert_list("routers", self.routers.clone())
            .insert_opt("vxnet", self.vxnet.clone())
            .insert_list("status", self.status.clone());
        self.paging.write(&mut params);
        Ok(params)
    }
}

/// Add statics to a router.
///
/// Statics are sent as `statics.N.*` after being checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddRouterStatics {
    pub router: String,
    pub statics: Vec<RouterStatic>,
}

impl AddRouterStatics {
    /// Add `statics` to `router`, statics may be given as wire text.
    pub fn new(router: impl Into<String>, statics: impl IntoRules<RouterStatic>) -> Result<Self> {
        Ok(Self {
            router: router.into(),
            statics: statics.into_rules()?,
        })
    }
}

impl Action for AddRouterStatics {
    const NAME: &'static str = "AddRouterStatics";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone", "router", "statics"])
        .list(&["statics"])
        .router_statics("statics");

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        if !self.router.is_empty() {
            params.insert("router", self.router.as_str());
        }
        if !self.statics.is_empty() {
            params.insert("statics", encode_list(&self.statics));
        }
        Ok(params)
    }
}

/// Describe router statics.
///
/// Use [`crate::decode_set`] with `router_static_set` to read them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeRouterStatics {
    pub router_statics: Vec<String>,
    pub router: Option<String>,
    pub vxnet: Option<String>,
    pub static_type: Option<StaticType>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl Action for DescribeRouterStatics {
    const NAME: &'static str = "DescribeRouterStatics";
    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone"])
        .integer(&["static_type", "offset", "limit"])
        .list(&["router_statics"]);

    fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();
        params
            .insert_list("router_statics", self.router_statics.clone())
            .insert_opt("router", self.router.clone())
            .insert_opt("vxnet", self.vxnet.clone())
            .insert_opt("static_type", self.static_type.map(|t| t.as_int()))
            .insert_opt("offset", self.offset)
            .insert_opt("limit", self.limit);
        Ok(params)
    }
}
