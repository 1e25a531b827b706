//! Navigation port

/// Route the user is sent to after logging out.
pub const LOGIN_ROUTE: &str = "/login";

/// Port for client-side redirects.
///
/// This abstraction keeps the session layer free of any particular host
/// (browser router, desktop shell, terminal).
pub trait Navigator: Send + Sync {
    /// Redirects to the given route.
    fn navigate_to(&self, route: &str);
}
