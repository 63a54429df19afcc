use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ModelError;

/// Field-level validation for input records.
pub trait Validate {
    fn validate(&self) -> Result<(), ModelError>;
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern is valid"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().\-]*[0-9][0-9 ().\-]*$").expect("phone pattern is valid"));

pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_phone_shaped(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Accumulates constraint violations so a caller sees all of them at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: &str) {
        self.0.push(message.to_string());
    }

    pub fn check(&mut self, ok: bool, message: &str) {
        if !ok {
            self.push(message);
        }
    }

    /// Required text: present and not blank.
    pub fn required(&mut self, value: &str, message: &str) -> bool {
        let present = !value.trim().is_empty();
        self.check(present, message);
        present
    }

    pub fn max_len(&mut self, value: &str, max: usize, message: &str) {
        self.check(char_len(value) <= max, message);
    }

    pub fn optional_max_len(&mut self, value: Option<&str>, max: usize, message: &str) {
        if let Some(v) = value {
            self.max_len(v, max, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn finish(self) -> Result<(), ModelError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Validation(self.0))
        }
    }
}
