use serde::{Deserialize, Serialize};

/// One procedure entry of a batch: the SIGTAP code as published (hyphen
/// allowed) and the performed quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureLine {
    pub code: String,
    pub quantity: u32,
}

impl ProcedureLine {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }

    /// The code with separators removed, as written into records.
    pub fn plain_code(&self) -> String {
        self.code.chars().filter(char::is_ascii_digit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_code_strips_hyphen() {
        let line = ProcedureLine::new("090501003-5", 1);
        assert_eq!(line.plain_code(), "0905010035");
    }
}
