//! # Admission Flows
//!
//! A relay configured from JSON, driven through the public API:
//!
//! 1. **ACL**: subnet and peer allow lists, combined
//! 2. **Ledger**: per-peer, per-IP and global caps, release and reuse
//! 3. **Connection pressure**: overload rollback, trimming after grace
//! 4. **Circuit limits**: data cap, duration and reservation TTL

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use relay_admission::{
        AclEvaluator, ConnectionEventHandler, ConnectionId, Decision, LedgerError, LimitScope,
        PeerId, RejectReason, RelayAdmissionApi, ResourceKind, Subnet, TeardownReason,
        TransferOutcome,
    };

    use crate::integration::{accepted, ip, peer, relay_from};

    // =============================================================================
    // ACCESS CONTROL
    // =============================================================================

    #[test]
    fn test_subnet_allow_list_gates_admission() {
        let relay = relay_from(r#"{ "ACL": { "AllowSubnets": ["10.0.0.0/8"] } }"#);
        let kind = ResourceKind::Reservation;

        accepted(relay.service.admit(&peer("QmInside"), ip("10.20.30.40"), kind, 1));
        assert_eq!(
            relay.service.admit(&peer("QmOutside"), ip("192.0.2.1"), kind, 1),
            Decision::Rejected(RejectReason::AclDenied)
        );

        let stats = relay.service.stats();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected_acl, 1);
        assert_eq!(stats.ledger.totals.reservations, 1);
    }

    #[test]
    fn test_peer_and_subnet_rules_must_both_match() {
        let relay = relay_from(
            r#"{ "ACL": { "AllowPeers": ["QmFriend"], "AllowSubnets": ["198.51.100.0/24"] } }"#,
        );
        let kind = ResourceKind::Circuit;

        accepted(relay.service.admit(&peer("QmFriend"), ip("198.51.100.7"), kind, 1));
        let denied = [
            ("QmFriend", "203.0.113.7"),
            ("QmStranger", "198.51.100.7"),
        ];
        for (who, addr) in denied {
            assert_eq!(
                relay.service.admit(&peer(who), ip(addr), kind, 1).reason(),
                Some(RejectReason::AclDenied),
                "{who} from {addr}"
            );
        }
    }

    #[test]
    fn test_acl_swap_applies_to_new_requests_only() {
        let relay = relay_from("{}");
        let kind = ResourceKind::Reservation;
        let held = accepted(relay.service.admit(&peer("QmEarly"), ip("192.0.2.1"), kind, 1));

        let subnet: Subnet = "10.0.0.0/8".parse().unwrap();
        relay
            .service
            .replace_acl(AclEvaluator::new(Vec::<PeerId>::new(), vec![subnet]));

        assert!(!relay
            .service
            .admit(&peer("QmLate"), ip("192.0.2.2"), kind, 1)
            .is_accepted());
        // Grants made under the old rules stay valid
        relay.service.release(&held).unwrap();
    }

    // =============================================================================
    // RESOURCE LEDGER
    // =============================================================================

    #[test]
    fn test_per_peer_cap_then_release_frees_slot() {
        let relay = relay_from(
            r#"{ "RelayV2": { "Resources": { "MaxReservationsPerPeer": 1 } } }"#,
        );
        let p = peer("QmBusy");
        let kind = ResourceKind::Reservation;

        let first = accepted(relay.service.admit(&p, ip("192.0.2.1"), kind, 1));
        assert_eq!(
            relay.service.admit(&p, ip("192.0.2.1"), kind, 1),
            Decision::Rejected(RejectReason::ResourceExhausted(
                LimitScope::PeerReservations
            ))
        );
        // Another peer is unaffected
        accepted(relay.service.admit(&peer("QmOther"), ip("192.0.2.2"), kind, 1));

        relay.service.release(&first).unwrap();
        accepted(relay.service.admit(&p, ip("192.0.2.1"), kind, 1));
    }

    #[test]
    fn test_per_ip_cap_spans_peers() {
        let relay = relay_from(
            r#"{ "RelayV2": { "Resources": { "MaxReservationsPerIP": 2 } } }"#,
        );
        let shared = ip("203.0.113.50");
        let kind = ResourceKind::Reservation;

        accepted(relay.service.admit(&peer("QmA"), shared, kind, 1));
        accepted(relay.service.admit(&peer("QmB"), shared, kind, 1));
        assert_eq!(
            relay.service.admit(&peer("QmC"), shared, kind, 1).reason(),
            Some(RejectReason::ResourceExhausted(LimitScope::IpReservations))
        );
        accepted(relay.service.admit(&peer("QmC"), ip("203.0.113.51"), kind, 1));
    }

    #[test]
    fn test_global_circuit_cap() {
        let relay = relay_from(
            r#"{ "RelayV2": { "Resources": { "MaxCircuitsTotal": 2 } } }"#,
        );
        let kind = ResourceKind::Circuit;

        accepted(relay.service.admit(&peer("QmA"), ip("192.0.2.1"), kind, 1));
        accepted(relay.service.admit(&peer("QmB"), ip("192.0.2.2"), kind, 1));
        assert_eq!(
            relay.service.admit(&peer("QmC"), ip("192.0.2.3"), kind, 1).reason(),
            Some(RejectReason::ResourceExhausted(LimitScope::GlobalCircuits))
        );
        assert_eq!(relay.service.stats().rejected_resources, 1);
    }

    #[test]
    fn test_byte_requests_bounded_by_buffer_size() {
        let relay = relay_from(
            r#"{ "RelayV2": { "Resources": { "BufferSize": 512, "MaxCircuits": 2 } } }"#,
        );
        let p = peer("QmBytes");
        let kind = ResourceKind::Bytes;

        assert_eq!(
            relay.service.admit(&p, ip("192.0.2.1"), kind, 513).reason(),
            Some(RejectReason::ResourceExhausted(LimitScope::CircuitBuffer))
        );
        accepted(relay.service.admit(&p, ip("192.0.2.1"), kind, 512));
        accepted(relay.service.admit(&p, ip("192.0.2.1"), kind, 512));
        assert_eq!(
            relay.service.admit(&p, ip("192.0.2.1"), kind, 1).reason(),
            Some(RejectReason::ResourceExhausted(LimitScope::PeerBytes))
        );
        assert_eq!(relay.service.peer_usage(&p).bytes, 1024);
    }

    #[test]
    fn test_zero_amount_is_invalid() {
        let relay = relay_from("{}");
        assert_eq!(
            relay
                .service
                .admit(&peer("QmZero"), ip("192.0.2.1"), ResourceKind::Circuit, 0),
            Decision::Rejected(RejectReason::InvalidRequest)
        );
        assert_eq!(relay.service.stats().rejected_invalid, 1);
    }

    #[test]
    fn test_double_release_is_reported_and_harmless() {
        let relay = relay_from("{}");
        let token = accepted(relay.service.admit(
            &peer("QmTwice"),
            ip("192.0.2.1"),
            ResourceKind::Reservation,
            1,
        ));

        relay.service.release(&token).unwrap();
        assert_eq!(
            relay.service.release(&token),
            Err(LedgerError::DoubleRelease(token.id()))
        );

        let stats = relay.service.stats();
        assert_eq!(stats.double_releases, 1);
        assert_eq!(stats.ledger.totals.reservations, 0);
        assert!(relay.service.is_consistent());
    }

    // =============================================================================
    // CONNECTION PRESSURE
    // =============================================================================

    #[test]
    fn test_overload_rolls_back_then_recovers_after_grace() {
        let relay = relay_from(
            r#"{ "ConnMgr": { "ConnMgrLo": 1, "ConnMgrHi": 2, "ConnMgrGrace": 60000000000 } }"#,
        );
        for n in 1..=3 {
            relay
                .service
                .on_connect(ConnectionId(n), &peer(&format!("QmConn{n}")));
        }
        // Everyone is still in grace, so nothing could be trimmed
        assert!(relay.transport.closed().is_empty());

        let p = peer("QmNew");
        assert_eq!(
            relay.service.admit(&p, ip("192.0.2.1"), ResourceKind::Circuit, 1),
            Decision::Rejected(RejectReason::Overloaded)
        );
        assert!(relay.service.peer_usage(&p).is_zero());
        assert_eq!(relay.service.stats().ledger.outstanding_tokens, 0);

        relay.time.advance(Duration::from_secs(61));
        accepted(relay.service.admit(&p, ip("192.0.2.1"), ResourceKind::Circuit, 1));

        assert_eq!(
            relay.transport.closed(),
            vec![ConnectionId(1), ConnectionId(2)]
        );
        let stats = relay.service.stats();
        assert_eq!(stats.connections.count, 1);
        assert_eq!(stats.trimmed_connections, 2);
    }

    #[test]
    fn test_trim_prefers_least_recently_active_and_skips_protected() {
        let relay = relay_from(
            r#"{ "ConnMgr": { "ConnMgrLo": 3, "ConnMgrHi": 3, "ConnMgrGrace": 0 } }"#,
        );
        for n in 1..=3 {
            relay
                .service
                .on_connect(ConnectionId(n), &peer(&format!("QmConn{n}")));
            relay.time.advance(Duration::from_secs(1));
        }
        assert!(relay.service.protect(ConnectionId(1)));
        relay.service.on_activity(ConnectionId(2));

        relay.service.on_connect(ConnectionId(4), &peer("QmConn4"));

        // conn 1 is protected and conn 2 was just active, so conn 3 goes
        assert_eq!(relay.transport.closed(), vec![ConnectionId(3)]);
        assert!(relay.service.is_connected(ConnectionId(1)));
        assert!(!relay.service.is_connected(ConnectionId(3)));

        // The transport reports the close back; that is a no-op now
        relay.service.on_disconnect(ConnectionId(3));
        assert_eq!(relay.service.stats().connections.count, 3);
    }

    // =============================================================================
    // CIRCUIT LIMITS
    // =============================================================================

    #[test]
    fn test_data_cap_tears_down_and_frees_ledger() {
        let relay = relay_from(
            r#"{ "RelayV2": { "Resources": { "Limit": { "Data": 1000 } } } }"#,
        );
        let p = peer("QmChatty");
        let circuit = accepted(relay.service.admit(&p, ip("192.0.2.1"), ResourceKind::Circuit, 1));

        assert_eq!(
            relay.service.record_transfer(&circuit, 700).unwrap(),
            TransferOutcome::Within {
                remaining: Some(300)
            }
        );
        assert_eq!(
            relay.service.record_transfer(&circuit, 400).unwrap(),
            TransferOutcome::LimitExceeded { relayed: 1100 }
        );

        assert_eq!(
            relay.transport.torn_down(),
            vec![(circuit.clone(), TeardownReason::DataExceeded)]
        );
        assert_eq!(relay.service.peer_usage(&p).circuits, 0);
        assert_eq!(
            relay.service.record_transfer(&circuit, 1),
            Err(LedgerError::UnknownCircuit(circuit.id()))
        );
        // The teardown already returned the capacity
        assert!(relay.service.release(&circuit).is_err());
    }

    #[test]
    fn test_null_limit_leaves_circuits_uncapped() {
        let relay = relay_from(r#"{ "RelayV2": { "Resources": { "Limit": null } } }"#);
        let circuit = accepted(relay.service.admit(
            &peer("QmForever"),
            ip("192.0.2.1"),
            ResourceKind::Circuit,
            1,
        ));

        assert_eq!(
            relay.service.record_transfer(&circuit, 10 << 20).unwrap(),
            TransferOutcome::Within { remaining: None }
        );
        relay.time.advance(Duration::from_secs(24 * 60 * 60));
        assert_eq!(relay.service.sweep().circuits_expired, 0);
        relay.service.release(&circuit).unwrap();
    }

    #[test]
    fn test_sweep_expires_circuits_and_reservations() {
        let relay = relay_from(
            r#"{
                "RelayV2": {
                    "Resources": {
                        "ReservationTTL": 30000000000,
                        "Limit": { "Duration": 10000000000 }
                    }
                }
            }"#,
        );
        let p = peer("QmStale");
        accepted(relay.service.admit(&p, ip("192.0.2.1"), ResourceKind::Circuit, 1));
        accepted(relay.service.admit(&p, ip("192.0.2.1"), ResourceKind::Reservation, 1));

        relay.time.advance(Duration::from_secs(11));
        let report = relay.service.sweep();
        assert_eq!(report.circuits_expired, 1);
        assert_eq!(report.reservations_expired, 0);

        relay.time.advance(Duration::from_secs(20));
        let report = relay.service.sweep();
        assert_eq!(report.reservations_expired, 1);

        let reasons: Vec<TeardownReason> = relay
            .transport
            .torn_down()
            .into_iter()
            .map(|(_, reason)| reason)
            .collect();
        assert_eq!(
            reasons,
            vec![
                TeardownReason::DurationExceeded,
                TeardownReason::ReservationExpired
            ]
        );
        assert!(relay.service.peer_usage(&p).is_zero());
        assert_eq!(relay.service.stats().forced_teardowns, 2);
    }
}
