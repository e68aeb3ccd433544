//! Device bearer key generation and hashing.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the API/repository layer and any future provisioning tooling.

use rand::RngCore;

use crate::hashing;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of random bytes in a device key (256 bits).
pub const KEY_BYTES: usize = 32;

/// Length of the hex-rendered key string.
pub const KEY_HEX_LENGTH: usize = KEY_BYTES * 2;

/// Number of leading characters stored as a human-visible prefix.
pub const KEY_PREFIX_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Key generation
// ---------------------------------------------------------------------------

/// The result of generating a new device key.
pub struct GeneratedDeviceKey {
    /// The plaintext key (disclosed exactly once, never stored).
    pub plaintext: String,
    /// The first [`KEY_PREFIX_LENGTH`] characters of the key for display.
    pub prefix: String,
    /// The SHA-256 hex digest of the plaintext key (stored in the database).
    pub hash: String,
}

/// Generate a new random device key.
///
/// 32 bytes from the thread-local CSPRNG, rendered as 64 lowercase hex
/// characters. Returns the plaintext (shown once), prefix (for
/// identification), and SHA-256 hash (for storage). The plaintext must never
/// be persisted.
pub fn generate_device_key() -> GeneratedDeviceKey {
    let mut bytes = [0u8; KEY_BYTES];
    rand::rng().fill_bytes(&mut bytes);

    let key = hashing::hex_encode(bytes);
    let prefix = key[..KEY_PREFIX_LENGTH].to_string();
    let hash = hash_device_key(&key);

    GeneratedDeviceKey {
        plaintext: key,
        prefix,
        hash,
    }
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Compute the SHA-256 hex digest of a device key.
///
/// Used both during key creation (to store the hash) and during ingestion
/// authentication (to look up the key by hash). Lookups only ever compare
/// digests over a unique index, so no raw secret comparison happens anywhere.
pub fn hash_device_key(key: &str) -> String {
    hashing::sha256_hex(key.as_bytes())
}

/// Extract the display prefix from a plaintext device key.
pub fn extract_prefix(key: &str) -> &str {
    &key[..KEY_PREFIX_LENGTH.min(key.len())]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
