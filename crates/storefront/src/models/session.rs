//! Session-related types.

/// Session keys for authentication data.
pub mod session_keys {
    /// Boolean flag set by a successful admin login.
    pub const LOGGED_IN: &str = "logged_in";
}
