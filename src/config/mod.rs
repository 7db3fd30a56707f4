pub mod environment;

pub use environment::{
    AlertConfig, Config, ExternalMonitorConfig, MonitorConfig, ServerConfig,
};
