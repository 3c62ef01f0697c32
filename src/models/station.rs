use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Station {
    pub id: i64,

    #[validate(length(min = 1, max = 32))]
    pub code: String,
}

impl Station {
    pub fn new(id: i64, code: String) -> Self {
        Self { id, code }
    }
}

/// Validate a station code before it reaches storage
pub(crate) fn validate_code(code: &str) -> crate::Result<()> {
    Station::new(0, code.to_string()).validate()?;
    Ok(())
}
