use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field problem found while cleaning a record, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn required(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field is required.");
        }
    }

    pub fn max_len(&mut self, field: &'static str, value: &str, limit: usize) {
        let length = value.chars().count();
        if length > limit {
            self.add(
                field,
                format!("Ensure this value has at most {limit} characters (it has {length})."),
            );
        }
    }

    pub fn at_least(&mut self, field: &'static str, value: u32, minimum: u32) {
        if value < minimum {
            self.add(
                field,
                format!("Ensure this value is greater than or equal to {minimum}."),
            );
        }
    }

    /// Mirrors a `DECIMAL(max_digits, decimal_places)` column.
    pub fn decimal(
        &mut self,
        field: &'static str,
        value: &Decimal,
        max_digits: u32,
        decimal_places: u32,
    ) {
        let normalized = value.normalize();
        if normalized.scale() > decimal_places {
            self.add(
                field,
                format!("Ensure that there are no more than {decimal_places} decimal places."),
            );
            return;
        }

        let whole = normalized.trunc().abs().normalize();
        let whole_digits = if whole.is_zero() {
            0
        } else {
            whole.to_string().len() as u32
        };
        if whole_digits > max_digits - decimal_places {
            self.add(
                field,
                format!(
                    "Ensure that there are no more than {} digits before the decimal point.",
                    max_digits - decimal_places
                ),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid record ({rendered})")
    }
}

impl std::error::Error for ValidationErrors {}

/// Lets a patch tell "leave unchanged" (missing) apart from "clear" (`null`).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
