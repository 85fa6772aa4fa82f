//! # Streaming-Service Authentication
//!
//! Implicit-grant helper for the streaming backend: builds the authorize
//! URL, extracts the access token from the redirect fragment, and holds it
//! in an in-memory session.
//!
//! The token is treated as radioactive. It lives only in [`AuthSession`]'s
//! memory, is never serialized, never written through the key-value bridge,
//! and every `Debug` rendering redacts it. The host is expected to scrub the
//! redirect fragment from its visible URL immediately after handing it over.

pub mod config;
pub mod error;
pub mod fragment;
pub mod session;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use fragment::extract_token_from_fragment;
pub use session::AuthSession;
pub use token::AccessToken;
