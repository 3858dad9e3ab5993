pub mod config;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod provider_factory;
pub mod providers;
pub mod record;
pub mod request;
pub mod telemetry;
#[cfg(test)]
pub mod test_util;
