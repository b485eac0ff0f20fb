//! Infrastructure layer - Cache engine, service clients and observability

pub mod annotation;
pub mod cache;
pub mod http_client;
pub mod logging;
pub mod observability;
pub mod profile;
