//! Typed requests for the IaaS API.
//!
//! Each request builds its [`Params`] and declares the [`ValidationSpec`] they
//! are checked against before anything is sent.

mod eip;
pub use eip::{AllocateEips, AssociateEip};

mod instance;
pub use instance::{DescribeInstances, RunInstances, TerminateInstances};

mod router;
pub use router::{AddRouterStatics, DescribeRouterStatics, DescribeRouters};

mod security_group;
pub use security_group::{
    AddSecurityGroupRules, ApplySecurityGroup, CreateSecurityGroup, DescribeSecurityGroupRules,
    DescribeSecurityGroups,
};

mod volume;
pub use volume::{AttachVolumes, CreateVolumes, DescribeVolumes};

mod zone;
pub use zone::DescribeZones;

use crate::check::ValidationSpec;
use crate::params::Params;
use qcsign_core::Result;

/// A request the API understands.
pub trait Action {
    /// Name sent as `action`, like `DescribeInstances`.
    const NAME: &'static str;
    /// Constraints on the assembled params.
    const SPEC: ValidationSpec;

    /// Build the params of this request. Unset fields are left out.
    fn to_params(&self) -> Result<Params>;
}

/// Params shared by describe requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paging {
    /// Keyword to filter by.
    pub search_word: Option<String>,
    /// `1` to return details of related resources.
    pub verbose: Option<i64>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl Paging {
    fn write(&self, params: &mut Params) {
        params
            .insert_opt("search_word", self.search_word.clone())
            .insert_opt("verbose", self.verbose)
            .insert_opt("offset", self.offset)
            .insert_opt("limit", self.limit);
    }
}
