use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use once_cell::sync::Lazy;
use qcsign_core::{Context, SignRequest};
use qcsign_iaas::{sign, AppSigner, Credential, Params};

criterion_group!(benches, bench);
criterion_main!(benches);

static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("must success")
});

fn params() -> Params {
    let mut params = Params::new();
    params
        .insert("action", "DescribeInstances")
        .insert("zone", "pek3a")
        .insert("instances", vec!["i-3", "i-2", "i-1"])
        .insert("status", vec!["running", "stopped"])
        .insert("limit", 20)
        .insert("verbose", 1);
    params
}

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("iaas");

    group.bench_function("sign", |b| {
        let params = params();
        b.iter(|| sign("GET", "/iaas/", "access_key_id", "secret_access_key", &params))
    });

    group.bench_function("app_signer", |b| {
        let cred = Credential::new("access_key_id", "secret_access_key");
        let signer = AppSigner::new();
        let ctx = Context::new();

        b.to_async(&*RUNTIME).iter(|| async {
            let (mut parts, _) = http::Request::get(
                "https://api.qingcloud.com/iaas/?action=DescribeInstances&zone=pek3a&instances=i-3&instances=i-1",
            )
            .body(())
            .expect("request must be valid")
            .into_parts();
            signer
                .sign_request(&ctx, &mut parts, Some(&cred), None)
                .await
                .expect("must success")
        })
    });

    group.finish()
}
