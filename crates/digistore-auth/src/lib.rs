//! Session and user identity for DigiStore.
//!
//! Login and register are local simulations; there is no credential store.

mod credentials;
mod error;
mod session;
mod user;

pub use credentials::{
    password_strength, validate_email, validate_password, PasswordCheck, PasswordStrength,
    MIN_PASSWORD_LENGTH,
};
pub use error::AuthError;
pub use session::{SessionEngine, DEFAULT_LATENCY};
pub use user::{RegisterRequest, User, UserUpdate};
