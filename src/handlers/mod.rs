pub mod contact;
pub mod fallback;
pub mod health;

pub use contact::{submit_contact, ContactResponse, CONFIRMATION_TEXT};
pub use fallback::not_found;
pub use health::{health_check, root_info};
