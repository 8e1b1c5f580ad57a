//! CARE-NET Risk Service
//!
//! HTTP front end for dropout-risk assessments. Routes:
//! - `POST /predict`: patient features in, [`carenet_core::RiskAssessment`] out
//! - `GET /health`: liveness probe
//! - `GET /feature-importance`: classifier feature importances, most important first
//! - `GET /metrics`: Prometheus exposition

pub mod cli;
pub mod config;
pub mod predictor;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::{CorsConfig, ServiceConfig};
pub use predictor::{assemble, Predictor};
pub use routes::{create_router, AppError, MALFORMED_BODY_MESSAGE};
pub use state::AppState;
