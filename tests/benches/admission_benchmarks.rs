//! # Relay Admission Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | ACL evaluation, 1k subnets | < 50µs |
//! | admit + release, open ACL | < 5µs |
//! | sweep over 1k tracked circuits | < 1ms |

// Allow excessive nesting in benchmark code
#![allow(clippy::excessive_nesting)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use relay_admission::{
    AclEvaluator, ManualTimeSource, NoOpTransport, PeerId, RelayAdmissionApi,
    RelayAdmissionService, RelaySettings, ResourceKind, ResourceLimits, Subnet,
};

fn random_v4(rng: &mut impl Rng) -> IpAddr {
    IpAddr::V4(Ipv4Addr::from(rng.gen::<u32>()))
}

fn service_with(limits: ResourceLimits, time: &ManualTimeSource) -> RelayAdmissionService {
    let settings = RelaySettings {
        limits,
        ..RelaySettings::default()
    };
    RelayAdmissionService::new(settings, Box::new(time.clone()), Arc::new(NoOpTransport))
}

// ============================================================================
// ACL evaluation
// ============================================================================

fn bench_acl_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("acl");
    let mut rng = rand::thread_rng();
    let peer = PeerId::parse("QmBench").unwrap();

    for size in [10usize, 100, 1_000] {
        let subnets: Vec<Subnet> = (0..size)
            .map(|_| Subnet::new(random_v4(&mut rng), 24).unwrap())
            .collect();
        let acl = AclEvaluator::new(Vec::<PeerId>::new(), subnets);
        let probe = random_v4(&mut rng);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("subnet_miss", size), &acl, |b, acl| {
            b.iter(|| black_box(acl.allow(&peer, probe)))
        });
    }
    group.finish();
}

// ============================================================================
// Admission hot path
// ============================================================================

fn bench_admit_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("admission");
    group.measurement_time(Duration::from_secs(5));

    let time = ManualTimeSource::new(0);
    let service = service_with(ResourceLimits::default(), &time);
    let peers: Vec<PeerId> = (0..64)
        .map(|n| PeerId::parse(&format!("QmPeer{n}")).unwrap())
        .collect();
    let addr: IpAddr = "192.0.2.1".parse().unwrap();

    for kind in [ResourceKind::Reservation, ResourceKind::Circuit, ResourceKind::Bytes] {
        let mut next = 0usize;
        group.bench_function(BenchmarkId::new("admit_release", kind), |b| {
            b.iter(|| {
                next = (next + 1) % peers.len();
                let decision = service.admit(&peers[next], addr, kind, 1);
                if let Some(token) = decision.token() {
                    service.release(token).unwrap();
                }
                black_box(decision)
            })
        });
    }
    group.finish();
}

// ============================================================================
// Maintenance
// ============================================================================

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("maintenance");

    for circuits in [100u64, 1_000] {
        let limits = ResourceLimits {
            max_circuits: circuits,
            max_circuits_total: circuits,
            ..ResourceLimits::default()
        };
        let time = ManualTimeSource::new(0);
        let service = service_with(limits, &time);
        let peer = PeerId::parse("QmBusy").unwrap();
        let addr: IpAddr = "192.0.2.1".parse().unwrap();
        for _ in 0..circuits {
            service.admit(&peer, addr, ResourceKind::Circuit, 1);
        }

        // Nothing expires, so every iteration walks the full table
        group.throughput(Throughput::Elements(circuits));
        group.bench_with_input(BenchmarkId::new("sweep_idle", circuits), &service, |b, s| {
            b.iter(|| black_box(s.sweep()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_acl_evaluation, bench_admit_release, bench_sweep);
criterion_main!(benches);
