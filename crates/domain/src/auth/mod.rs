//! Authentication domain types

mod claims;
mod state;

pub use claims::{Claims, claim_types};
pub use state::{AuthProviderKind, AuthenticationState};
