use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::config::ValidationConfig;
use crate::database::{Programmer, ProgrammerStore, StoreError};

/// Avatar images available to pick from
pub const AVATAR_NUMBERS: RangeInclusive<i32> = 1..=6;

pub const NICKNAME_REQUIRED: &str = "Please enter a clever nickname";
pub const NICKNAME_TAKEN: &str = "Looks like that nickname is already taken";
pub const AVATAR_INVALID: &str = "Please choose a valid avatar";

/// Messages per field; serializes as `{ "field": ["message", ...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one message
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub tag_line_max_length: usize,
}

impl From<&ValidationConfig> for ValidationRules {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            tag_line_max_length: config.tag_line_max_length,
        }
    }
}

impl ValidationRules {
    /// Rules that need nothing beyond the programmer itself
    pub fn check_fields(&self, programmer: &Programmer) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if programmer.nickname.as_deref().map_or(true, |n| n.trim().is_empty()) {
            errors.add("nickname", NICKNAME_REQUIRED);
        }

        match programmer.avatar_number {
            Some(n) if AVATAR_NUMBERS.contains(&n) => {}
            _ => errors.add("avatarNumber", AVATAR_INVALID),
        }

        if let Some(tag_line) = &programmer.tag_line {
            if tag_line.chars().count() > self.tag_line_max_length {
                errors.add(
                    "tagLine",
                    format!(
                        "The tag line cannot be longer than {} characters",
                        self.tag_line_max_length
                    ),
                );
            }
        }

        errors
    }

    /// Run every rule, including the nickname uniqueness lookup
    pub async fn validate(
        &self,
        programmer: &Programmer,
        store: &dyn ProgrammerStore,
    ) -> Result<FieldErrors, StoreError> {
        let mut errors = self.check_fields(programmer);

        if let Some(nickname) = programmer.nickname.as_deref().filter(|n| !n.trim().is_empty()) {
            if let Some(other) = store.find_by_nickname(nickname).await? {
                if other.id != programmer.id {
                    errors.add("nickname", NICKNAME_TAKEN);
                }
            }
        }

        Ok(errors)
    }
}
