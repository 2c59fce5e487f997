//! # Concurrency
//!
//! Many threads hammering one service. After every thread finishes, the
//! ledger must balance and no cap may ever have been exceeded.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use relay_admission::{
        ConnectionEventHandler, ConnectionId, RelayAdmissionApi, ResourceKind, Token,
    };

    use crate::integration::{ip, peer, relay_from};

    const THREADS: u64 = 8;
    const OPS_PER_THREAD: usize = 500;

    #[test]
    fn test_parallel_admissions_keep_ledger_balanced() {
        let relay = relay_from(
            r#"{
                "RelayV2": {
                    "Resources": {
                        "MaxReservations": 20,
                        "MaxReservationsPerPeer": 3,
                        "MaxCircuits": 2,
                        "MaxCircuitsTotal": 12,
                        "BufferSize": 64
                    }
                }
            }"#,
        );
        let service = Arc::new(relay.service);
        let limits = service.limits();

        let handles: Vec<_> = (0..THREADS)
            .map(|seed| {
                let service = Arc::clone(&service);
                let limits = limits.clone();
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let mut held: Vec<Token> = Vec::new();
                    for _ in 0..OPS_PER_THREAD {
                        // Peers are shared between threads on purpose
                        let who = peer(&format!("QmPeer{}", rng.gen_range(0..6)));
                        let addr = ip(&format!("192.0.2.{}", rng.gen_range(1..4)));
                        if !held.is_empty() && rng.gen_bool(0.45) {
                            let token = held.swap_remove(rng.gen_range(0..held.len()));
                            service.release(&token).unwrap();
                            continue;
                        }
                        let kind = match rng.gen_range(0..3) {
                            0 => ResourceKind::Reservation,
                            1 => ResourceKind::Circuit,
                            _ => ResourceKind::Bytes,
                        };
                        let amount = match kind {
                            ResourceKind::Bytes => rng.gen_range(1..=64),
                            _ => 1,
                        };
                        if let Some(token) = service.admit(&who, addr, kind, amount).token() {
                            held.push(token.clone());
                        }

                        let totals = service.stats().ledger.totals;
                        assert!(totals.reservations <= limits.max_reservations);
                        assert!(totals.circuits <= limits.max_circuits_total);
                        assert!(totals.bytes <= limits.global_bytes_cap());
                    }
                    held
                })
            })
            .collect();

        let leftovers: Vec<Token> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();

        assert!(service.is_consistent());
        assert_eq!(
            service.stats().ledger.outstanding_tokens,
            leftovers.len()
        );
        for token in &leftovers {
            service.release(token).unwrap();
        }
        assert!(service.stats().ledger.totals.is_zero());
        assert_eq!(service.stats().double_releases, 0);
        assert_eq!(service.peers_in_flight(), 0);
    }

    #[test]
    fn test_connection_events_race_with_admissions() {
        let relay = relay_from(
            r#"{ "ConnMgr": { "ConnMgrLo": 4, "ConnMgrHi": 8, "ConnMgrGrace": 0 } }"#,
        );
        let service = Arc::new(relay.service);

        let churn = {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for n in 0..400u64 {
                    let conn = ConnectionId(n);
                    service.on_connect(conn, &peer(&format!("QmConn{}", n % 10)));
                    if n % 3 == 0 {
                        service.on_disconnect(conn);
                    }
                }
            })
        };
        let admit = {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let who = peer("QmSteady");
                for _ in 0..400 {
                    let decision = service.admit(&who, ip("192.0.2.9"), ResourceKind::Circuit, 1);
                    if let Some(token) = decision.token() {
                        service.release(token).unwrap();
                    }
                }
            })
        };
        churn.join().unwrap();
        admit.join().unwrap();

        let stats = service.stats();
        assert!(stats.connections.count <= stats.connections.high_water);
        assert!(stats.ledger.totals.is_zero());
        assert!(service.is_consistent());
        assert_eq!(
            relay.transport.closed().len() as u64,
            stats.trimmed_connections
        );
    }
}
