use std::sync::Arc;

use bytes::Bytes;
use log::debug;
use qcsign_core::{Context, Error, ProvideCredential, Result, Signer, SigningRequest};

use crate::action::Action;
use crate::assemble::RequestAssembler;
use crate::check::ValidationSpec;
use crate::constants::{MESSAGE, RET_CODE};
use crate::params::Params;
use crate::provide_credential::DefaultCredentialProvider;
use crate::sign_request::{params_to_pairs, AppSigner};
use crate::{Config, Credential};

/// Decoded body of a successful response.
pub type Response = serde_json::Map<String, serde_json::Value>;

/// Client sends validated and signed requests to the IaaS API.
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<Config>,
    assembler: RequestAssembler,
    signer: Signer<Credential>,
}

impl Client {
    /// Create a client loading credentials from config, then env.
    pub fn new(ctx: Context, config: Config) -> Self {
        let config = Arc::new(config);
        let loader = DefaultCredentialProvider::new(config.clone());
        Self::with_credential_provider(ctx, config, loader)
    }

    /// Create a client with a custom credential provider.
    pub fn with_credential_provider(
        ctx: Context,
        config: Arc<Config>,
        loader: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        Self {
            assembler: RequestAssembler::from_config(&config),
            signer: Signer::new(ctx, loader, AppSigner::new()),
            config,
        }
    }

    /// Config used by this client.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send a typed request.
    pub async fn call<A: Action>(&self, action: &A) -> Result<Option<Response>> {
        self.send(A::NAME, action.to_params()?, &A::SPEC).await
    }

    /// Send `action` with `params` checked against `spec`.
    ///
    /// Nothing is sent if the params fail validation. Returns `Ok(None)` if
    /// the service answered with an empty body. A non-zero `ret_code` is
    /// returned as [`qcsign_core::ErrorKind::ServiceError`].
    pub async fn send(
        &self,
        action: &str,
        params: Params,
        spec: &ValidationSpec,
    ) -> Result<Option<Response>> {
        let params = self.assembler.build(action, params, spec)?.flatten();
        let query = SigningRequest::query_to_encoded_string(&params_to_pairs(&params));
        let url = format!("{}?{query}", self.config.endpoint()?);

        let (mut parts, body) = http::Request::get(url).body(Bytes::new())?.into_parts();
        self.signer.sign(&mut parts, None).await?;

        debug!("sending action {action} to {}", self.config.host);
        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, body))
            .await?;
        parse_response(action, resp)
    }
}

fn parse_response(action: &str, resp: http::Response<Bytes>) -> Result<Option<Response>> {
    let (parts, body) = resp.into_parts();
    if body.iter().all(u8::is_ascii_whitespace) {
        return if parts.status.is_success() {
            Ok(None)
        } else {
            Err(Error::unexpected(format!(
                "{action} failed with status {}",
                parts.status
            )))
        };
    }

    let value: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        Error::unexpected(format!(
            "{action} returned invalid json with status {}",
            parts.status
        ))
        .with_source(e)
    })?;
    let serde_json::Value::Object(resp) = value else {
        return Err(Error::unexpected(format!(
            "{action} returned a non object response"
        )));
    };

    match resp.get(RET_CODE).and_then(serde_json::Value::as_i64) {
        Some(0) => Ok(Some(resp)),
        Some(code) => {
            let message = resp
                .get(MESSAGE)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default();
            Err(Error::service_error(format!(
                "{action} failed with ret_code {code}: {message}"
            )))
        }
        None if parts.status.is_success() => Ok(Some(resp)),
        None => Err(Error::unexpected(format!(
            "{action} failed with status {}",
            parts.status
        ))),
    }
}
