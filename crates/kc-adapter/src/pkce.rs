//! PKCE and login request randomness.
//!
//! Implements the client side of RFC 7636. Verifiers are drawn from the
//! unreserved character set with the thread-local CSPRNG.

use aws_lc_rs::digest;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;

use crate::options::CodeChallengeMethod;

/// Length of generated code verifiers (RFC 7636 allows 43-128).
pub const VERIFIER_LENGTH: usize = 96;

const UNRESERVED: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// A PKCE verifier together with its derived challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkce {
    /// Secret kept by the client until the code exchange.
    pub verifier: String,
    /// Challenge sent with the authorization request.
    pub challenge: String,
    /// How the challenge was derived.
    pub method: CodeChallengeMethod,
}

impl Pkce {
    /// Generates a fresh verifier and derives its challenge.
    #[must_use]
    pub fn generate(method: CodeChallengeMethod) -> Self {
        let verifier = generate_verifier();
        let challenge = code_challenge(&verifier, method);
        Self {
            verifier,
            challenge,
            method,
        }
    }
}

/// Generates a random code verifier.
#[must_use]
pub fn generate_verifier() -> String {
    let mut rng = rand::rng();
    (0..VERIFIER_LENGTH)
        .map(|_| char::from(UNRESERVED[rng.random_range(0..UNRESERVED.len())]))
        .collect()
}

/// Derives the code challenge for a verifier.
#[must_use]
pub fn code_challenge(verifier: &str, method: CodeChallengeMethod) -> String {
    match method {
        CodeChallengeMethod::Plain => verifier.to_string(),
        CodeChallengeMethod::S256 => {
            let hash = digest::digest(&digest::SHA256, verifier.as_bytes());
            URL_SAFE_NO_PAD.encode(hash.as_ref())
        }
    }
}

/// Generates an opaque `state` or `nonce` value.
#[must_use]
pub fn generate_state() -> String {
    uuid::Uuid::new_v4().to_string()
}
