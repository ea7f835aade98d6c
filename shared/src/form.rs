//! Form input parsing
//!
//! Form fields arrive as raw text. Every field crosses an explicit parse
//! boundary here and comes out either typed or as a [`FieldError`]; nothing
//! downstream sees untyped input.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field is required")]
    Required,

    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    #[error("'{0}' is not a whole number")]
    NotAnInteger(String),

    #[error("value must be between {min} and {max}")]
    OutOfRange { min: String, max: String },

    #[error("value must be 0 or greater")]
    Negative,

    #[error("value must be greater than 0")]
    NotPositive,

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("'{0}' is not one of the allowed values")]
    InvalidChoice(String),

    #[error("'{0}' is not a valid date and time")]
    InvalidDateTime(String),
}

/// Types that can be parsed out of a raw form input
pub trait ParseField: Sized {
    fn parse_field(raw: &str) -> Result<Self, FieldError>;
}

impl ParseField for Decimal {
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        Decimal::from_str(raw).map_err(|_| FieldError::NotANumber(raw.to_string()))
    }
}

impl ParseField for i64 {
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        if let Ok(value) = raw.parse::<i64>() {
            return Ok(value);
        }
        // "10.0" is a whole number typed into a number input
        match Decimal::from_str(raw) {
            Ok(d) if d.fract().is_zero() => d
                .to_i64()
                .ok_or_else(|| FieldError::NotAnInteger(raw.to_string())),
            Ok(_) => Err(FieldError::NotAnInteger(raw.to_string())),
            Err(_) => Err(FieldError::NotANumber(raw.to_string())),
        }
    }
}

impl ParseField for i32 {
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        let wide = i64::parse_field(raw)?;
        i32::try_from(wide).map_err(|_| FieldError::OutOfRange {
            min: i32::MIN.to_string(),
            max: i32::MAX.to_string(),
        })
    }
}

impl ParseField for DateTime<Utc> {
    /// Accepts RFC 3339 or the `datetime-local` input format (taken as UTC)
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(naive.and_utc());
            }
        }
        Err(FieldError::InvalidDateTime(raw.to_string()))
    }
}

/// A numeric (or otherwise parsed) form field
///
/// Keeps the raw text the user typed next to its parse outcome. Blank input
/// is `Ok(None)`, so optional fields stay optional and required fields
/// decide for themselves whether `None` is acceptable.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberField<T> {
    raw: String,
    value: Result<Option<T>, FieldError>,
}

impl<T: ParseField + Clone> NumberField<T> {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        let value = if trimmed.is_empty() {
            Ok(None)
        } else {
            T::parse_field(trimmed).map(Some)
        };
        Self { raw, value }
    }

    pub fn from_value(value: Option<T>) -> Self
    where
        T: Display,
    {
        Self {
            raw: value.as_ref().map(ToString::to_string).unwrap_or_default(),
            value: Ok(value),
        }
    }

    pub fn empty() -> Self {
        Self {
            raw: String::new(),
            value: Ok(None),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parse outcome
    pub fn value(&self) -> Result<Option<T>, FieldError> {
        self.value.clone()
    }

    /// The parsed value, treating unparsable input as absent
    pub fn get(&self) -> Option<T> {
        self.value.clone().ok().flatten()
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_ok()
    }

    /// Parsed value that must be present
    pub fn required(&self) -> Result<T, FieldError> {
        self.value()?.ok_or(FieldError::Required)
    }
}

/// Trimmed text, `None` when blank
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed text that must not be blank
pub fn required_text(raw: &str) -> Result<String, FieldError> {
    optional_text(raw).ok_or(FieldError::Required)
}

/// Inclusive range check
pub fn check_range<T>(value: T, min: T, max: T) -> Result<T, FieldError>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(FieldError::OutOfRange {
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(value)
}
