//! Credential domain: redacted secrets, grant selection, and the shared credential store.

/// Grant types and resolved grants presented to the token endpoint.
pub mod grant;
/// Redacting wrapper for client secrets, codes, and tokens.
pub mod secret;
/// Credential store shared by the authenticator and the API client.
pub mod store;

pub use grant::*;
pub use secret::*;
pub use store::*;
