use std::cmp::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use http::request::Parts;
use log::debug;
use percent_encoding::utf8_percent_encode;
use qcsign_core::hash::{base64_hmac_sha256, hex_md5};
use qcsign_core::time::{add_duration, format_iso8601, now, DateTime};
use qcsign_core::{Context, Result, SignRequest, SigningRequest, QUERY_ENCODE_SET};

use crate::constants::{PARAM_ACCESS_KEY_ID, PARAM_EXPIRES, PARAM_SIGNATURE};
use crate::credential::Credential;
use crate::params::{Params, Value};

/// AppSigner signs requests with the access key pair.
///
/// The signed query is the canonical query followed by `signature`, which is
/// exactly what [`sign`] returns for the same parameters.
#[derive(Debug, Default)]
pub struct AppSigner {
    time: Option<DateTime>,
}

impl AppSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for AppSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        let mut signing_req = SigningRequest::build(req)?;
        let mut pairs = std::mem::take(&mut signing_req.query);
        if let Some(expires_in) = expires_in {
            if !pairs.iter().any(|(k, _)| k == PARAM_EXPIRES) {
                let expires = add_duration(self.time.unwrap_or_else(now), expires_in)?;
                pairs.push((PARAM_EXPIRES.to_string(), format_iso8601(expires)));
            }
        }

        let pairs = canonical_pairs(pairs, &cred.access_key_id);
        let signature = build_signature(
            signing_req.method.as_str(),
            &signing_req.path,
            &pairs,
            &cred.secret_access_key,
        );
        signing_req.query = pairs;
        signing_req.query_push(PARAM_SIGNATURE, signature);

        signing_req.apply(req)
    }
}

/// Sign `params` and return the query string to send.
///
/// The result is the canonical query (with `access_key_id` injected) followed
/// by `&signature=<encoded>`. Absent parameters must already be dropped,
/// empty lists contribute nothing.
pub fn sign(
    method: &str,
    path: &str,
    access_key_id: &str,
    secret_access_key: &str,
    params: &Params,
) -> String {
    let pairs = canonical_pairs(params_to_pairs(params), access_key_id);
    let signature = build_signature(method, path, &pairs, secret_access_key);

    format!(
        "{}&{PARAM_SIGNATURE}={}",
        SigningRequest::query_to_encoded_string(&pairs),
        utf8_percent_encode(&signature, &QUERY_ENCODE_SET)
    )
}

/// Canonical query of `params` with `access_key_id` injected.
pub fn canonical_query(access_key_id: &str, params: &Params) -> String {
    SigningRequest::query_to_encoded_string(&canonical_pairs(
        params_to_pairs(params),
        access_key_id,
    ))
}

/// String to sign: `METHOD\nPATH/\nCANONICAL_QUERY\nMD5("")`.
pub fn string_to_sign(method: &str, path: &str, canonical_query: &str) -> String {
    let path = if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    };
    format!("{method}\n{path}\n{canonical_query}\n{}", hex_md5(b""))
}

/// Expand params into pairs, list values become repeated keys.
///
/// List elements are sorted by value before rendering, so numbers order
/// numerically.
pub(crate) fn params_to_pairs(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len() + 1);
    for (k, v) in params {
        match v {
            Value::List(items) => {
                let mut items: Vec<&Value> = items.iter().collect();
                items.sort_by(|a, b| cmp_values(a, b));
                pairs.extend(items.into_iter().map(|i| (k.clone(), i.to_wire_string())))
            }
            v => pairs.push((k.clone(), v.to_wire_string())),
        }
    }
    pairs
}

/// Numbers compare numerically, everything else by wire form.
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            as_f64(a).total_cmp(&as_f64(b))
        }
        _ => a.to_wire_string().cmp(&b.to_wire_string()),
    }
}

fn as_f64(v: &Value) -> f64 {
    match v {
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        _ => f64::NAN,
    }
}

/// Inject the access key and sort by key.
///
/// The sort is stable, repeated keys keep the order `params_to_pairs` gave them.
fn canonical_pairs(
    mut pairs: Vec<(String, String)>,
    access_key_id: &str,
) -> Vec<(String, String)> {
    pairs.retain(|(k, _)| k != PARAM_ACCESS_KEY_ID && k != PARAM_SIGNATURE);
    pairs.push((PARAM_ACCESS_KEY_ID.to_string(), access_key_id.to_string()));
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

/// Base64 of the HMAC-SHA256, not yet percent-encoded.
fn build_signature(
    method: &str,
    path: &str,
    pairs: &[(String, String)],
    secret_access_key: &str,
) -> String {
    let canonical_query = SigningRequest::query_to_encoded_string(pairs);
    debug!("canonical query: {canonical_query}");
    let string_to_sign = string_to_sign(method, path, &canonical_query);
    debug!("string to sign: {}", string_to_sign.escape_debug());

    base64_hmac_sha256(secret_access_key.as_bytes(), string_to_sign.as_bytes())
}
