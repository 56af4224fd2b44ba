//! API Module
//!
//! This module exposes the loan engine over HTTP. It provides the
//! `POST /api/loan/calculate` endpoint used by the loan form and a health check.

mod server;
pub use server::{build_router, AppState, HealthResponse, Server, CALCULATE_PATH, HEALTH_PATH};
