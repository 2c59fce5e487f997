//! Cross-crate integration tests.
//!
//! Every test builds its service from JSON, the way the daemon does, so the
//! loader, validation and admission core are exercised together.

use std::io::Write;
use std::net::IpAddr;
use std::sync::Arc;

use relay_admission::{
    load_config, Config, Decision, ManualTimeSource, PeerId, RecordingTransport,
    RelayAdmissionService, RelayTransport, Token,
};
use tempfile::NamedTempFile;

pub mod admission_flows;
pub mod concurrency;
pub mod config_loading;

/// Service plus the doubles driving it.
pub struct TestRelay {
    pub service: RelayAdmissionService,
    pub time: ManualTimeSource,
    pub transport: Arc<RecordingTransport>,
}

/// Write `json` to a temporary file.
pub fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write config");
    file
}

/// Load `json` through a real file.
pub fn config_from(json: &str) -> Config {
    let file = write_config(json);
    load_config(file.path()).expect("valid config")
}

/// Build a service from `json`, with a manual clock starting at zero.
pub fn relay_from(json: &str) -> TestRelay {
    let settings = config_from(json)
        .relay_settings()
        .expect("valid relay settings");
    let time = ManualTimeSource::new(0);
    let transport = Arc::new(RecordingTransport::new());
    let shared: Arc<dyn RelayTransport> = transport.clone();
    let service = RelayAdmissionService::new(settings, Box::new(time.clone()), shared);
    TestRelay {
        service,
        time,
        transport,
    }
}

pub fn peer(s: &str) -> PeerId {
    PeerId::parse(s).expect("valid peer id")
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("valid address")
}

pub fn accepted(decision: Decision) -> Token {
    match decision {
        Decision::Accepted(token) => token,
        Decision::Rejected(reason) => panic!("expected acceptance, got {reason}"),
    }
}
