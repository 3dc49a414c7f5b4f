//! Identifier generation

use rand::RngCore;

/// Source of opaque poll and option identifiers
pub trait IdGenerator: Send + Sync {
    /// Produce a new identifier
    fn generate(&self) -> String;
}

/// Random 8-character hex identifiers (4 bytes of entropy)
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        generate_id()
    }
}

/// Generate a random 8-character lowercase hex identifier
pub fn generate_id() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
