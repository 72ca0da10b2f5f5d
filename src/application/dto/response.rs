//! Response DTOs

use serde::Serialize;

/// Acknowledgement returned for an accepted event.
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
