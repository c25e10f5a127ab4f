use std::time::Duration;

use log::debug;
use qcsign_core::time::{add_duration, format_iso8601, now, DateTime};
use qcsign_core::Result;

use crate::check::{check_params, ValidationSpec};
use crate::config::Config;
use crate::constants::{PARAM_ACTION, PARAM_EXPIRES, PARAM_ZONE};
use crate::params::Params;

/// RequestAssembler turns caller params into a validated request.
#[derive(Debug, Clone, Default)]
pub struct RequestAssembler {
    zone: Option<String>,
    expires_in: Option<Duration>,
    time: Option<DateTime>,
}

impl RequestAssembler {
    /// Create an assembler without zone default and expiry policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take zone default and expiry policy from config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            zone: config.zone.clone(),
            expires_in: config.expires_in,
            time: None,
        }
    }

    /// Set the zone injected into requests without one.
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Set the expiry policy.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Specify the time `expires` is computed from.
    ///
    /// # Note
    ///
    /// We should always take current time to build requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Build a request for `action`.
    ///
    /// `action` is always set, `zone` only when absent and a default is
    /// configured, `expires` only when an expiry policy is configured. The
    /// result is checked against `spec`; an error means the request must not
    /// be sent.
    pub fn build(
        &self,
        action: &str,
        mut params: Params,
        spec: &ValidationSpec,
    ) -> Result<Params> {
        params.insert(PARAM_ACTION, action);
        if let Some(zone) = &self.zone {
            if !params.contains_key(PARAM_ZONE) {
                params.insert(PARAM_ZONE, zone.as_str());
            }
        }
        if let Some(expires_in) = self.expires_in {
            let expires = add_duration(self.time.unwrap_or_else(now), expires_in)?;
            params.insert(PARAM_EXPIRES, format_iso8601(expires));
        }

        check_params(&params, spec)?;
        debug!("assembled request for action {action} with {} params", params.len());
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Value;
    use pretty_assertions::assert_eq;
    use qcsign_core::time::parse_iso8601;
    use qcsign_core::ErrorKind;

    const SPEC: ValidationSpec = ValidationSpec::new()
        .required(&["zone", "instances"])
        .list(&["instances"]);

    #[test]
    fn test_build_injects_action_and_zone() {
        let assembler = RequestAssembler::new().with_zone("pek3a");
        let params = Params::new().with("instances", vec!["i-1"]);

        let built = assembler.build("StartInstances", params, &SPEC).unwrap();
        assert_eq!(
            built,
            Params::from_iter([
                ("action", Value::from("StartInstances")),
                ("instances", Value::from(vec!["i-1"])),
                ("zone", Value::from("pek3a")),
            ])
        );
    }

    #[test]
    fn test_build_keeps_caller_zone() {
        let assembler = RequestAssembler::new().with_zone("pek3a");
        let params = Params::new()
            .with("zone", "sh1a")
            .with("instances", vec!["i-1"]);

        let built = assembler.build("StartInstances", params, &SPEC).unwrap();
        assert_eq!(built.get("zone"), Some(&Value::from("sh1a")));
    }

    #[test]
    fn test_build_adds_expires() {
        let time = parse_iso8601("2024-03-05T06:07:08Z").unwrap();
        let assembler = RequestAssembler::new()
            .with_expires_in(Duration::from_secs(3600))
            .with_time(time);

        let built = assembler
            .build("DescribeZones", Params::new(), &ValidationSpec::new())
            .unwrap();
        assert_eq!(built.get("expires"), Some(&Value::from("2024-03-05T07:07:08Z")));
        assert!(built.get("zone").is_none());
    }

    #[test]
    fn test_build_fails_before_sending() {
        let assembler = RequestAssembler::new();
        let params = Params::new().with("instances", "i-1");

        // No zone default configured.
        let err = assembler
            .build("StartInstances", params.clone(), &SPEC)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);

        let err = assembler
            .with_zone("pek3a")
            .build("StartInstances", params, &SPEC)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_from_config() {
        let cfg = Config::new()
            .with_zone("gd2")
            .with_expires_in(Duration::from_secs(60));
        let assembler = RequestAssembler::from_config(&cfg);
        assert_eq!(assembler.zone.as_deref(), Some("gd2"));
        assert_eq!(assembler.expires_in, Some(Duration::from_secs(60)));
    }
}
