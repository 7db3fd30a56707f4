pub mod external_monitor;
pub mod jitter;
pub mod prober;
pub mod self_ping;
pub mod shutdown;
pub mod status_log;
pub mod types;

pub use external_monitor::ExternalMonitor;
pub use prober::{HttpProber, Probe, ProbeError, DEFAULT_PROBE_TIMEOUT};
pub use self_ping::{SelfPingLoop, SelfPingState};
pub use status_log::{StatusLog, StatusSnapshot, STATUS_LOG_CAPACITY};
pub use types::*;
