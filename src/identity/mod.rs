pub mod commands;
pub mod gate;
pub mod memory;
pub mod provider;

pub use gate::{GateState, GateSubscription, IdentityGate};
pub use memory::MemoryIdentityProvider;
pub use provider::{AuthError, IdentityProvider};

/// User-facing text for a failed sign-in.
pub fn login_error_message(err: &AuthError) -> &'static str {
    match err {
        AuthError::UserNotFound | AuthError::WrongPassword => "Invalid email or password",
        AuthError::TooManyRequests => "Too many failed login attempts. Please try again later.",
        _ => "Failed to login. Please try again.",
    }
}
