use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use qcsign_core::{Context, ErrorKind, HttpSend, Result};
use qcsign_iaas::action::{
    AddRouterStatics, AddSecurityGroupRules, DescribeSecurityGroupRules, DescribeZones,
    TerminateInstances,
};
use qcsign_iaas::rule::{RouterStatic, SecurityGroupRule, SecurityGroupRuleKind};
use qcsign_iaas::{decode_set, sign, Client, Config, Params, ValidationSpec};

/// Records requests and answers with queued bodies.
#[derive(Debug, Default, Clone)]
struct MockHttpSend {
    requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
    responses: Arc<Mutex<VecDeque<(u16, String)>>>,
}

impl MockHttpSend {
    fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
        self
    }

    fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.uri().query().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((200, r#"{"ret_code":0}"#.to_string()));
        Ok(http::Response::builder()
            .status(status)
            .body(Bytes::from(body))?)
    }
}

fn client(mock: &MockHttpSend) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_send(mock.clone());
    let config = Config::new()
        .with_access_key_id("QYACCESSKEYIDEXAMPLE")
        .with_secret_access_key("SECRETACCESSKEY")
        .with_zone("pek3a");
    Client::new(ctx, config)
}

#[tokio::test]
async fn test_send_signs_the_query() -> Result<()> {
    let mock = MockHttpSend::default().respond(200, r#"{"ret_code":0,"total_count":2}"#);
    let client = client(&mock);

    let resp = client
        .call(&DescribeZones {
            zones: vec!["sh1a".to_string(), "pek3a".to_string()],
            ..Default::default()
        })
        .await?
        .expect("response must have a body");
    assert_eq!(resp["total_count"], 2);

    let expected = Params::new()
        .with("action", "DescribeZones")
        .with("zone", "pek3a")
        .with("zones", vec!["sh1a", "pek3a"]);
    assert_eq!(
        mock.queries(),
        vec![sign(
            "GET",
            "/iaas/",
            "QYACCESSKEYIDEXAMPLE",
            "SECRETACCESSKEY",
            &expected
        )]
    );

    let requests = mock.requests.lock().unwrap();
    let req = &requests[0];
    assert_eq!(req.method(), http::Method::GET);
    assert_eq!(req.uri().host(), Some("api.qingcloud.com"));
    assert_eq!(req.uri().path(), "/iaas/");
    Ok(())
}

#[tokio::test]
async fn test_invalid_params_are_never_sent() {
    let mock = MockHttpSend::default();
    let client = client(&mock);

    let err = client
        .call(&TerminateInstances::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingParameter);

    const SPEC: ValidationSpec = ValidationSpec::new().integer(&["count"]);
    let err = client
        .send("RunInstances", Params::new().with("count", "two"), &SPEC)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    assert!(mock.queries().is_empty());
}

#[tokio::test]
async fn test_rules_are_sent_as_indexed_keys() -> Result<()> {
    let mock = MockHttpSend::default();
    let client = client(&mock);

    let rule = SecurityGroupRule::new(
        10,
        SecurityGroupRuleKind::Tcp {
            start_port: Some(22),
            end_port: None,
            ip_network: "10.0.0.0/8".to_string(),
        },
    )?;
    client
        .call(&AddSecurityGroupRules::new("sg-1", vec![rule])?)
        .await?;
    client
        .call(&AddRouterStatics::new(
            "rtr-1",
            r#"{"static_type": 4, "vxnet_id": "vxnet-1", "val1": "gre|1.2.3.4|"}"#,
        )?)
        .await?;

    let queries = mock.queries();
    assert!(queries[0].contains("rules.1.protocol=tcp"));
    assert!(queries[0].contains("rules.1.val1=22"));
    assert!(queries[0].contains("rules.1.val2=&"));
    assert!(queries[0].contains("rules.1.val3=10.0.0.0%2F8"));
    assert!(queries[1].contains("statics.1.static_type=4"));
    assert!(queries[1].contains("statics.1.val1=gre%7C1.2.3.4%7C"));
    Ok(())
}

#[tokio::test]
async fn test_service_error() {
    let mock = MockHttpSend::default().respond(
        200,
        r#"{"ret_code":1400,"message":"PermissionDenied, resource [sg-1] is not yours"}"#,
    );
    let client = client(&mock);

    let err = client
        .call(&DescribeSecurityGroupRules::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServiceError);
    assert!(err.message().contains("PermissionDenied"));
}

#[tokio::test]
async fn test_empty_body_is_no_data() -> Result<()> {
    let mock = MockHttpSend::default().respond(200, "");
    let client = client(&mock);

    let resp = client.call(&DescribeZones::default()).await?;
    assert!(resp.is_none());
    Ok(())
}

#[tokio::test]
async fn test_describe_and_decode_rules() -> Result<()> {
    let mock = MockHttpSend::default().respond(
        200,
        r#"{
            "ret_code": 0,
            "action": "DescribeRouterStaticsResponse",
            "total_count": 2,
            "router_static_set": [
                {"router_static_id": "rtrs-1", "static_type": 1, "router_static_name": "web",
                 "val1": "80", "val2": "192.168.0.2", "val3": "8080", "val4": "tcp",
                 "val5": "", "val6": ""},
                {"router_static_id": "rtrs-2", "static_type": 2,
                 "val1": "openvpn", "val2": "1194", "val3": "udp", "val4": "10.255.0.0/24",
                 "val5": "", "val6": ""}
            ]
        }"#,
    );
    let client = client(&mock);

    let resp = client
        .send(
            "DescribeRouterStatics",
            Params::new().with("router", "rtr-1"),
            &ValidationSpec::new().required(&["router"]),
        )
        .await?
        .expect("response must have a body");
    let statics: Vec<RouterStatic> = decode_set(&resp, "router_static_set")?;

    let mut vpn = RouterStatic::vpn("10.255.0.0/24");
    vpn.id = "rtrs-2".to_string();
    assert_eq!(statics.len(), 2);
    assert_eq!(statics[0].id, "rtrs-1");
    assert_eq!(statics[1], vpn);

    assert!(mock.queries()[0].split('&').any(|kv| kv == "router=rtr-1"));
    Ok(())
}
