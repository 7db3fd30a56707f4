pub mod alert;
pub mod keepalive;
pub mod metrics;
pub mod rate_limit;
pub mod security;
