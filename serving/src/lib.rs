//! Plumbing shared by the two prediction services: environment configuration,
//! logger setup, the JSON error surface, ONNX plan loading and the server
//! bootstrap.

pub mod config;
pub mod http;
pub mod logging;
pub mod onnx;
pub mod server;

pub use config::ServerConfig;
pub use http::{json_config, not_found, ErrorBody, HealthStatus, RootInfo};
pub use onnx::OnnxPlan;
pub use server::serve;
