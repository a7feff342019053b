//! Authentication module
//!
//! Every request to the public API carries `ts`, `apikey` and `hash` query
//! parameters, where `hash` is the hex MD5 digest of `ts + private + public`.
//! The `Authenticator` owns the key pair and produces those parameters.

mod authenticator;

pub use authenticator::{AuthParams, Authenticator};
