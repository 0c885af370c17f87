//! Per-request nonce generation.

use rand::Rng;

/// Length of every generated nonce.
pub const NONCE_LENGTH: usize = 25;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh `On-Nonce` value.
///
/// The server uses the nonce to drop replayed requests inside the signature
/// validity window, so it only needs to be unique, not secret.
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    (0..NONCE_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_nonce_shape_and_uniqueness() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let nonce = generate_nonce();
            assert_eq!(nonce.len(), NONCE_LENGTH);
            assert!(nonce
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
            assert!(seen.insert(nonce), "nonce collision");
        }
    }
}
