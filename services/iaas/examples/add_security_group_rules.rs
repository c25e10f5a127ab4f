use std::time::Duration;

use qcsign_core::{Context, OsEnv, Result};
use qcsign_http_send_reqwest::ReqwestHttpSend;
use qcsign_iaas::action::{AddSecurityGroupRules, DescribeSecurityGroupRules};
use qcsign_iaas::rule::{SecurityGroupRule, SecurityGroupRuleKind};
use qcsign_iaas::{decode_set, Client, Config, IntoRules};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::try_init();
    let _ = dotenv::dotenv();

    let Some(security_group) = std::env::args().nth(1) else {
        eprintln!("usage: add_security_group_rules <security_group_id>");
        return Ok(());
    };

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| qcsign_core::Error::unexpected("failed to build client").with_source(e))?;
    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::new(http))
        .with_env(OsEnv);

    // QY_ACCESS_KEY_ID, QY_SECRET_ACCESS_KEY and QY_ZONE are read from env.
    let config = Config::new()
        .with_expires_in(Duration::from_secs(60))
        .from_env(&ctx);
    let client = Client::new(ctx, config);

    let ssh = SecurityGroupRule::new(
        10,
        SecurityGroupRuleKind::Tcp {
            start_port: Some(22),
            end_port: Some(22),
            ip_network: String::new(),
        },
    )?
    .with_name("ssh");
    let ping: Vec<SecurityGroupRule> =
        r#"{"protocol": "icmp", "priority": 20, "val1": 8, "val2": 0, "val3": ""}"#.into_rules()?;

    let mut rules = vec![ssh];
    rules.extend(ping);
    client
        .call(&AddSecurityGroupRules::new(&security_group, rules)?)
        .await?;

    let resp = client
        .call(&DescribeSecurityGroupRules {
            security_group: Some(security_group),
            ..Default::default()
        })
        .await?
        .unwrap_or_default();
    for rule in decode_set::<SecurityGroupRule>(&resp, "security_group_rule_set")? {
        println!("{} {:?} {:?}", rule.id, rule.protocol(), rule.kind);
    }

    Ok(())
}
