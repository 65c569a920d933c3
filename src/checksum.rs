use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::ConvertedTransaction;

/// Correlation ID of a converted transaction: hex SHA-256 of its JSON form.
///
/// Any change to a field value (or to the schema) yields a new ID, so an
/// edited transaction is treated as new by the enhancer.
pub fn compute_checksum(transaction: &ConvertedTransaction) -> Result<String> {
    let bytes = serde_json::to_vec(transaction)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
