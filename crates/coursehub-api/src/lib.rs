//! # coursehub-api
//!
//! HTTP API layer for CourseHub session authentication built on Axum.
//!
//! Provides the auth and admin endpoints, the `AuthUser` extractor, request
//! logging and CORS middleware, DTOs and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
