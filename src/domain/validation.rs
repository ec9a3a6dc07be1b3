use crate::error::{PayStreamError, Result};
use serde::Serialize;

/// A single failed constraint on an incoming payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn join(violations: &[Violation]) -> String {
        violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Accumulates constraint failures so a payload reports all of them at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not_blank(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.0.push(Violation::new(field, message));
        }
        self
    }

    pub fn length_between(
        &mut self,
        field: &str,
        value: &str,
        min: usize,
        max: usize,
        message: &str,
    ) -> &mut Self {
        let len = value.chars().count();
        if !value.trim().is_empty() && (len < min || len > max) {
            self.0.push(Violation::new(field, message));
        }
        self
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.0.push(Violation::new(field, message));
        }
        self
    }

    /// Prefixes every collected violation with `prefix` (e.g. `transactions[2]`).
    pub fn nested(&mut self, prefix: &str, inner: Vec<Violation>) -> &mut Self {
        self.0.extend(inner.into_iter().map(|v| Violation {
            field: format!("{}.{}", prefix, v.field),
            message: v.message,
        }));
        self
    }

    pub fn into_result(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(PayStreamError::InvalidRequest(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_failure() {
        let mut v = Violations::new();
        v.not_blank("name", " ", "Bank name is required")
            .length_between("branchCode", "AB", 3, 20, "too short")
            .check(true, "active", "never");

        match v.into_result() {
            Err(PayStreamError::InvalidRequest(list)) => {
                assert_eq!(list.len(), 2);
                assert_eq!(list[0].field, "name");
                assert_eq!(list[1].message, "too short");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_length_skips_blank_values() {
        let mut v = Violations::new();
        v.length_between("branchCode", "", 3, 20, "too short");
        assert!(v.into_result().is_ok());
    }
}
