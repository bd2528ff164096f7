//! Disruption input (§3): an opaque text blob plus an optional continuation id.

use serde::{Deserialize, Serialize};

use crate::error::TarmacError;

const MIN_LEN: usize = 10;
const MAX_LEN: usize = 10_000;
const STRIPPED_CHARS: [char; 4] = ['<', '>', '{', '}'];

/// A sanitized, length-checked disruption description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionInput {
    pub prompt: String,
    pub continuation_id: Option<String>,
}

impl DisruptionInput {
    /// Sanitize and validate a raw prompt per §3: strip `<`, `>`, `{`, `}`,
    /// then enforce the 10-10,000 character bound on the sanitized text.
    pub fn new(raw_prompt: &str, continuation_id: Option<String>) -> Result<Self, TarmacError> {
        let sanitized: String = raw_prompt.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();
        let len = sanitized.chars().count();
        if len < MIN_LEN || len > MAX_LEN {
            return Err(TarmacError::InvalidRequest(format!(
                "prompt length {len} outside allowed range [{MIN_LEN}, {MAX_LEN}]"
            )));
        }
        Ok(Self {
            prompt: sanitized,
            continuation_id,
        })
    }
}
