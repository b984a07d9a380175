//! Service layer module

pub mod registry;

pub use registry::ProviderRegistry;
