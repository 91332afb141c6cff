//! API layer - HTTP endpoints

pub mod error;
pub mod health;
pub mod query;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
