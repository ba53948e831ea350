//! Benchmarks for configuration resolution.
//!
//! These benchmarks measure layering the stored configuration with
//! profiles and overrides, the three-pass template resolution and the
//! conversion of the `options` section into command-line arguments.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vs_emr::config::{self, Overrides};
use vs_emr::defaults::SPOT_CLUSTER_TEMPLATE;
use vs_emr::options::to_command_options;
use vs_emr::template::{resolve_template, TemplateRenderer};

/// Stored configuration with defaults and a few profiles.
const STORED_CONFIG: &str = r#"
default:
  cluster:
    name: analysis
    owner: data-team
    logUri: s3://bucket/logs/
  ec2:
    keyName: analysis-key
    subnetId: subnet-0123
profiles:
  small:
    worker:
      instanceType: r4.large
  large:
    worker:
      instanceType: r4.4xlarge
      instanceCount: 10
  spot:
    master:
      bidPrice: "0.1"
    worker:
      bidPrice: "0.25"
"#;

fn generate_profiles(num_profiles: usize) -> String {
    let mut yaml = String::from("default:\n  cluster:\n    name: analysis\nprofiles:\n");
    for i in 0..num_profiles {
        yaml.push_str(&format!(
            "  p{i}:\n    worker:\n      instanceCount: {i}\n      tag{i}: value{i}\n    nested:\n      level{i}:\n        key: v{i}\n"
        ));
    }
    yaml
}

fn bench_resolve_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_config");
    let stored = config::parse(STORED_CONFIG).unwrap();

    group.bench_function("defaults_only", |b| {
        let overrides = Overrides::default();
        b.iter(|| config::resolve_config(black_box(&stored), black_box(&overrides)))
    });

    group.bench_function("profiles_and_overrides", |b| {
        let overrides = Overrides {
            profiles: vec!["small".to_string(), "spot".to_string()],
            conf_json: vec![r#"{"cluster": {"name": "bench"}}"#.to_string()],
            conf: vec![
                "worker.instanceCount=6".to_string(),
                "cluster.autoTerminate=true".to_string(),
            ],
            options: Default::default(),
        };
        b.iter(|| config::resolve_config(black_box(&stored), black_box(&overrides)))
    });

    for num_profiles in [5, 20, 50] {
        let stored = config::parse(&generate_profiles(num_profiles)).unwrap();
        let overrides = Overrides {
            profiles: (0..num_profiles).map(|i| format!("p{i}")).collect(),
            ..Default::default()
        };
        group.bench_with_input(
            BenchmarkId::new("profiles", num_profiles),
            &overrides,
            |b, overrides| b.iter(|| config::resolve_config(black_box(&stored), black_box(overrides))),
        );
    }

    group.finish();
}

fn bench_template_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_resolution");
    let stored = config::parse(STORED_CONFIG).unwrap();
    let overrides = Overrides {
        profiles: vec!["small".to_string(), "spot".to_string()],
        ..Default::default()
    };
    let user_config = config::resolve_config(&stored, &overrides).unwrap();
    let renderer = TemplateRenderer::new().unwrap();

    group.bench_function("spot_cluster", |b| {
        b.iter(|| resolve_template(&renderer, black_box(SPOT_CLUSTER_TEMPLATE), black_box(&user_config)))
    });

    let resolved = resolve_template(&renderer, SPOT_CLUSTER_TEMPLATE, &user_config).unwrap();
    group.bench_function("command_options", |b| {
        b.iter(|| to_command_options(black_box(&resolved.options)))
    });

    group.finish();
}

criterion_group!(benches, bench_resolve_config, bench_template_resolution);
criterion_main!(benches);
