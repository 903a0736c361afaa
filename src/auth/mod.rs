use axum::Router;

use crate::state::AppState;

pub mod claims;
pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod repo;
pub mod services;

pub use extractors::AuthUser;

pub fn router() -> Router<AppState> {
    handlers::router()
}
