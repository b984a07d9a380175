//! Configuration module

pub mod settings;

pub use settings::{
    LoggingConfig, RequestConfig, SecurityConfig, ServerConfig, Settings, UpstreamConfig,
};
