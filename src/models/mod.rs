pub mod contact;

pub use contact::{
    ContactRequest, ContactSubmission, ValidationError, MESSAGE_MAX_CHARS, MESSAGE_MIN_CHARS,
    NAME_MIN_CHARS,
};
