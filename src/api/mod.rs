//! Web boundary: router, handlers and API error types

mod error;
mod health;
mod labelling;
mod models;
mod router;
mod state;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use labelling::LabellingPage;
pub use router::create_router;
pub use state::AppState;
