//! # Configuration Loading
//!
//! The loader against files on disk, the way the daemon invokes it.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use relay_admission::{load_config, Config, ConfigError};

    use crate::integration::write_config;

    /// A complete file in the format the daemon writes out.
    const FULL_CONFIG: &str = r#"{
        "Network": {
            "ListenAddrs": ["/ip4/0.0.0.0/tcp/4001", "/ip6/::/tcp/4001"],
            "AnnounceAddrs": ["/dns4/relay.example.org/tcp/4001"]
        },
        "ConnMgr": {
            "ConnMgrLo": 100,
            "ConnMgrHi": 200,
            "ConnMgrGrace": 15000000000
        },
        "RelayV2": {
            "Enabled": true,
            "Resources": {
                "Limit": { "Duration": 300000000000, "Data": 1048576 },
                "ReservationTTL": 1800000000000,
                "MaxReservations": 64,
                "MaxReservationsPerPeer": 2,
                "MaxReservationsPerIP": 4,
                "MaxCircuits": 8,
                "MaxCircuitsTotal": 256,
                "BufferSize": 4096
            }
        },
        "ACL": {
            "AllowPeers": ["12D3KooWEbomrRWemnfMBfgNMHdQmduTYZGmmLzTUXydfwU1iohy"],
            "AllowSubnets": ["10.0.0.0/8", "2001:db8::/32"]
        },
        "Daemon": { "PprofPort": 0 }
    }"#;

    #[test]
    fn test_full_file_sets_every_field() {
        let file = write_config(FULL_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.network.listen_addrs.len(), 2);
        assert_eq!(config.conn_mgr.conn_mgr_grace, Duration::from_secs(15));

        let resources = &config.relay_v2.resources;
        assert_eq!(resources.reservation_ttl, Duration::from_secs(30 * 60));
        assert_eq!(resources.max_reservations_per_ip, 4);
        assert_eq!(resources.limit.unwrap().duration, Duration::from_secs(300));
        assert_eq!(config.daemon.profiling_port(), None);

        let settings = config.relay_settings().unwrap();
        assert_eq!(settings.acl.peer_rule_count(), 1);
        assert_eq!(settings.acl.subnet_rule_count(), 2);
        assert_eq!(settings.limits.global_bytes_cap(), 256 * 4096);
    }

    #[test]
    fn test_rendered_config_reloads_identically() {
        let original = load_config(write_config(FULL_CONFIG).path()).unwrap();
        let rendered = original.to_json_pretty().unwrap();

        assert!(rendered.contains("\"ReservationTTL\""));
        assert!(rendered.contains("\"MaxReservationsPerIP\""));
        assert!(rendered.contains("\"ACL\""));
        assert_eq!(load_config(write_config(&rendered).path()).unwrap(), original);
    }

    #[test]
    fn test_defaults_survive_sparse_file() {
        let config = load_config(write_config(r#"{ "Daemon": {} }"#).path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let file = write_config(r#"{ "ConnMgr": {} } {"#);
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_keys_match_like_go() {
        let config = load_config(write_config(r#"{ "connmgr": { "connmgrhi": 900 } }"#).path())
            .unwrap();
        assert_eq!(config.conn_mgr.conn_mgr_hi, 900);

        // A lower-case ACL block still restricts the relay
        let config = load_config(
            write_config(r#"{ "acl": { "allowpeers": ["QmFriend"], "allowsubnets": ["10.0.0.0/8"] } }"#)
                .path(),
        )
        .unwrap();
        let acl = config.relay_settings().unwrap().acl;
        assert!(!acl.is_open());
        assert_eq!(acl.peer_rule_count(), 1);
        assert_eq!(acl.subnet_rule_count(), 1);
    }

    #[test]
    fn test_go_default_dump_is_accepted() {
        let dump = r#"{
            "Network": {
                "ListenAddrs": ["/ip4/0.0.0.0/tcp/4001"],
                "AnnounceAddrs": ["/ip4/127.0.0.1/tcp/4001"]
            },
            "ConnMgr": { "ConnMgrLo": 512, "ConnMgrHi": 768, "ConnMgrGrace": 120000000000 },
            "RelayV2": {
                "Enabled": true,
                "Resources": {
                    "Limit": { "Duration": 120000000000, "Data": 131072 },
                    "ReservationTTL": 3600000000000,
                    "MaxReservations": 128,
                    "MaxCircuits": 16,
                    "BufferSize": 2048,
                    "MaxReservationsPerPeer": 4,
                    "MaxReservationsPerIP": 8
                }
            },
            "ACL": { "AllowPeers": null, "AllowSubnets": null },
            "Daemon": { "PprofPort": 6060 }
        }"#;
        let config = load_config(write_config(dump).path()).unwrap();

        assert!(config.acl.allow_peers.is_empty());
        assert!(config.relay_settings().unwrap().acl.is_open());
        assert_eq!(config.relay_v2.resources, Config::default().relay_v2.resources);
    }

    #[test]
    fn test_errors_name_the_offending_entry() {
        let file = write_config(r#"{ "ACL": { "AllowSubnets": ["10.0.0.0/8", "bogus"] } }"#);
        let message = load_config(file.path()).unwrap_err().to_string();
        assert!(message.contains("\"bogus\""), "{message}");
        assert!(message.contains("ACL.AllowSubnets"), "{message}");

        let file = write_config(r#"{ "Network": { "AnnounceAddrs": ["/"] } }"#);
        let message = load_config(file.path()).unwrap_err().to_string();
        assert!(message.contains("Network.AnnounceAddrs"), "{message}");
    }

    #[test]
    fn test_unreadable_path_reports_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
