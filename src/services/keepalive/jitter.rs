use rand::Rng;
use std::time::Duration;

/// Uniform wait in `[0, jitter_secs]` taken before each self-ping.
pub fn pre_ping_delay(jitter_secs: u64) -> Duration {
    let jitter = jitter_secs as f64;
    let mut rng = rand::rng();
    seconds(rng.random_range(0.0..=jitter))
}

/// Wait after a self-ping: `base ± jitter`, never below `floor_secs`.
pub fn post_ping_delay(base_secs: u64, jitter_secs: u64, floor_secs: u64) -> Duration {
    let jitter = jitter_secs as f64;
    let mut rng = rand::rng();
    let offset = rng.random_range(-jitter..=jitter);
    post_ping_delay_with_offset(base_secs, offset, floor_secs)
}

/// Deterministic core of `post_ping_delay` for a given jitter draw.
pub fn post_ping_delay_with_offset(base_secs: u64, offset_secs: f64, floor_secs: u64) -> Duration {
    seconds((base_secs as f64 + offset_secs).max(floor_secs as f64))
}

/// Saturates at `Duration::MAX` instead of panicking on out-of-range values.
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
