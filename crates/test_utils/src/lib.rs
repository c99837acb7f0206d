//! Test utilities for the full-sync dht.

use rand::RngCore;

pub mod id;
pub mod switchboard;

/// Enable tracing with the RUST_LOG environment variable.
///
/// This is intended to be used in tests, so it defaults to DEBUG level.
pub fn enable_tracing() {
    enable_tracing_with_default_level(tracing::Level::DEBUG);
}

/// Enable tracing with the RUST_LOG environment variable, falling back to
/// `level` when it is not set.
pub fn enable_tracing_with_default_level(level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .try_init();
}

/// Generate `len` random bytes.
pub fn random_bytes(len: u16) -> Vec<u8> {
    let mut bytes = vec![0; len as usize];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}
