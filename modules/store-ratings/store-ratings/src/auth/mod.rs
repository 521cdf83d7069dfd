//! Authorization gate.
//!
//! `Unauthenticated -> Authenticated(role) -> {Authorized, Forbidden}`. The role
//! check only ever runs on a principal that was fully resolved, and the gate
//! never writes to storage.

pub mod error;
pub mod gate;
pub mod principal;
pub mod token;

pub use error::AuthError;
pub use gate::{AuthGate, PrincipalResolver, authorization_header};
pub use principal::Principal;
pub use token::{Claims, JwtCodec};
