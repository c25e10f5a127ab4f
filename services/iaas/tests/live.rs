use std::env;

use log::warn;
use qcsign_core::{Context, OsEnv, Result};
use qcsign_http_send_reqwest::ReqwestHttpSend;
use qcsign_iaas::action::{DescribeSecurityGroupRules, DescribeZones};
use qcsign_iaas::rule::SecurityGroupRule;
use qcsign_iaas::{decode_set, Client, Config};

fn init_client() -> Option<Client> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("QCSIGN_IAAS_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::new().from_env(&ctx);
    Some(Client::new(ctx, config))
}

#[tokio::test]
async fn test_live_describe_zones() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("QCSIGN_IAAS_TEST is not set, skipped");
        return Ok(());
    };

    let resp = client
        .call(&DescribeZones::default())
        .await?
        .expect("describe zones must return a body");
    assert!(resp.contains_key("zone_set"));
    Ok(())
}

#[tokio::test]
async fn test_live_describe_security_group_rules() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("QCSIGN_IAAS_TEST is not set, skipped");
        return Ok(());
    };
    if client.config().zone.is_none() {
        warn!("QY_ZONE is not set, skipped");
        return Ok(());
    }

    let resp = client
        .call(&DescribeSecurityGroupRules {
            limit: Some(10),
            ..Default::default()
        })
        .await?
        .expect("describe security group rules must return a body");
    let rules: Vec<SecurityGroupRule> = decode_set(&resp, "security_group_rule_set")?;
    assert!(rules.len() <= 10);
    Ok(())
}
