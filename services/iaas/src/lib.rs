//! Assemble, validate and sign QingCloud IaaS requests.
//!
//! ```no_run
//! use qcsign_core::{Context, OsEnv, Result};
//! use qcsign_http_send_reqwest::ReqwestHttpSend;
//! use qcsign_iaas::action::DescribeInstances;
//! use qcsign_iaas::{Client, Config};
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let config = Config::new().with_zone("pek3a").from_env(&ctx);
//! let client = Client::new(ctx, config);
//!
//! let resp = client.call(&DescribeInstances::default()).await?;
//! println!("{resp:?}");
//! # Ok(())
//! # }
//! ```

pub mod action;

mod assemble;
pub use assemble::RequestAssembler;

pub mod check;
pub use check::ValidationSpec;

mod client;
pub use client::{Client, Response};

mod config;
pub use config::Config;

mod constants;

mod credential;
pub use credential::Credential;

mod params;
pub use params::{Params, Value};

mod provide_credential;
pub use provide_credential::*;

pub mod rule;
pub use rule::{decode_batch, decode_set, Decoded, IntoRules, RuleCodec};

mod sign_request;
pub use sign_request::{canonical_query, sign, string_to_sign, AppSigner};
