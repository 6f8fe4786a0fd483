//! contact-gateway: HTTP gateway relaying contact-form submissions as push
//! notifications to a single Pushover subscriber.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;

pub use error::AppError;
pub use startup::{build_router, AppState, Application};
