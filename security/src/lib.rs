// security/src/lib.rs
//
// Session/identity issuance and the access policy gate. The JWT secret
// and token lifetime are injected at construction; nothing here reads
// ambient global state.

pub mod gate;
pub mod password;
pub mod service;
pub mod token;

pub use crate::gate::check_access;
pub use crate::service::{login, LoginOutcome, LoginRequest};
pub use crate::token::{Claims, TokenIssuer, DEFAULT_TOKEN_TTL_HOURS};
