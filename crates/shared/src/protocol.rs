use serde::{Deserialize, Serialize};

pub use crate::domain::Schedule;

/// Acknowledgement returned by write endpoints. Only `status` is inspected;
/// echoed records are kept opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Empty JSON object posted where the backend expects a body but reads none.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EmptyBody {}
