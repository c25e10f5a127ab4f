use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::constants::*;
use qcsign_core::utils::Redact;
use qcsign_core::{Context, Error, Result};

/// Config carries all the configuration for QingCloud IaaS requests.
#[derive(Clone)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`QY_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`QY_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// Zone injected into every request that does not carry one.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`QY_ZONE`]
    pub zone: Option<String>,
    /// API host, `api.qingcloud.com` by default.
    pub host: String,
    /// API port, `443` by default.
    pub port: u16,
    /// `https` or `http`.
    pub protocol: String,
    /// Path of the API endpoint, `/iaas/` by default.
    pub uri: String,
    /// When set, every request carries an `expires` parameter of now plus
    /// this duration.
    pub expires_in: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            zone: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            protocol: DEFAULT_PROTOCOL.to_string(),
            uri: DEFAULT_URI.to_string(),
            expires_in: None,
        }
    }
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set access_key_id
    pub fn with_access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self
    }

    /// Set secret_access_key
    pub fn with_secret_access_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set the default zone
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Set the api host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the api port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the protocol
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Set the endpoint path
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Set the expiry policy
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Load config from env.
    ///
    /// Values already set on this config win over env values.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(QY_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(QY_SECRET_ACCESS_KEY) {
            self.secret_access_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(QY_ZONE) {
            self.zone.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(QY_HOST) {
            if self.host == DEFAULT_HOST {
                self.host = v;
            }
        }
        if let Some(v) = ctx.env_var(QY_PORT).and_then(|v| v.parse().ok()) {
            if self.port == DEFAULT_PORT {
                self.port = v;
            }
        }
        if let Some(v) = ctx.env_var(QY_PROTOCOL) {
            if self.protocol == DEFAULT_PROTOCOL {
                self.protocol = v;
            }
        }
        if let Some(v) = ctx.env_var(QY_URI) {
            if self.uri == DEFAULT_URI {
                self.uri = v;
            }
        }

        self
    }

    /// Build the endpoint url, like `https://api.qingcloud.com:443/iaas/`.
    pub fn endpoint(&self) -> Result<String> {
        match self.protocol.as_str() {
            "http" | "https" => {}
            v => return Err(Error::config_invalid(format!("unsupported protocol: {v}"))),
        }
        if self.host.is_empty() {
            return Err(Error::config_invalid("host must not be empty"));
        }

        let uri = if self.uri.starts_with('/') {
            self.uri.clone()
        } else {
            format!("/{}", self.uri)
        };
        Ok(format!("{}://{}:{}{uri}", self.protocol, self.host, self.port))
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("zone", &self.zone)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("protocol", &self.protocol)
            .field("uri", &self.uri)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcsign_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (QY_ACCESS_KEY_ID.to_string(), "QYACCESSKEYIDEXAMPLE".to_string()),
                (QY_SECRET_ACCESS_KEY.to_string(), "SECRETEXAMPLE".to_string()),
                (QY_ZONE.to_string(), "pek3a".to_string()),
                (QY_PORT.to_string(), "8080".to_string()),
                (QY_PROTOCOL.to_string(), "http".to_string()),
            ]),
        });

        let cfg = Config::new().with_zone("sh1a").from_env(&ctx);
        assert_eq!(cfg.access_key_id.as_deref(), Some("QYACCESSKEYIDEXAMPLE"));
        assert_eq!(cfg.secret_access_key.as_deref(), Some("SECRETEXAMPLE"));
        // Explicit values win.
        assert_eq!(cfg.zone.as_deref(), Some("sh1a"));
        assert_eq!(
            cfg.endpoint().unwrap(),
            "http://api.qingcloud.com:8080/iaas/"
        );
    }

    #[test]
    fn test_config_endpoint_rejects_unknown_protocol() {
        let err = Config::new().with_protocol("ftp").endpoint().unwrap_err();
        assert_eq!(err.kind(), qcsign_core::ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let cfg = Config::new()
            .with_access_key_id("QYACCESSKEYIDEXAMPLE")
            .with_secret_access_key("short");
        let s = format!("{cfg:?}");
        assert!(s.contains("QYA***PLE"));
        assert!(!s.contains("short"));
    }
}
