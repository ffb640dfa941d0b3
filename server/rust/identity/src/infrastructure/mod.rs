pub mod config;
pub mod database;
pub mod telemetry;
pub mod token_verifier;

#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{JwtTokenVerifier, TokenVerifier};
