//! Field-level validation rules.
//!
//! Every rule is a declarative pattern plus the fixed message reported when a value
//! does not match. Callers (and API clients) rely on the exact message text.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

pub const INVALID_NAME: &str = "Name should only contain letters, spaces, and basic punctuation";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_PHONE: &str = "Phone number should be in format: XXX-XXX-XXXX or (XXX) XXX-XXXX";
pub const INVALID_SSN: &str = "SSN should be in format: XXX-XX-XXXX";
pub const INVALID_ZIP: &str = "ZIP code should be in format: XXXXX or XXXXX-XXXX";
pub const INVALID_STATE: &str = "State should be a two-letter code (e.g., MO)";
pub const INVALID_GPA: &str = "GPA should be between 0.00 and 4.00";
pub const INVALID_DEGREE: &str = "Degree name contains invalid characters";
pub const INVALID_INSTITUTION: &str = "Institution name contains invalid characters";
pub const INVALID_COMPANY: &str = "Company name contains invalid characters";
pub const INVALID_POSITION: &str = "Position title contains invalid characters";
pub const INVALID_DATE: &str = "Date should be in format: YYYY-MM-DD";
pub const INVALID_URL: &str = "Please enter a valid URL";
pub const INVALID_FILENAME: &str = "Filename contains invalid characters";

pub static NAME: FieldRule = FieldRule::new(
    "name",
    r"^[a-zA-Z]+(([',. -][a-zA-Z ])?[a-zA-Z]*)*$",
    INVALID_NAME,
);

pub static EMAIL: FieldRule = FieldRule::new("email", r"^[A-Za-z0-9+_.-]+@(.+)$", INVALID_EMAIL);

pub static PHONE: FieldRule = FieldRule::new(
    "phone",
    r"^\+?1?[ \t\n\x0B\x0C\r]*\(?[0-9]{3}\)?[-. ]?[0-9]{3}[-. ]?[0-9]{4}$",
    INVALID_PHONE,
);

pub static NATIONAL_ID: FieldRule = FieldRule::with_check(
    "national_id",
    r"^[0-8][0-9]{2}-[0-9]{2}-[0-9]{4}$",
    INVALID_SSN,
    national_id_groups_assigned,
);

pub static ZIP_CODE: FieldRule = FieldRule::new("zip_code", r"^[0-9]{5}(?:-[0-9]{4})?$", INVALID_ZIP);

pub static STATE_CODE: FieldRule = FieldRule::new("state_code", r"^[A-Z]{2}$", INVALID_STATE);

pub static GPA: FieldRule =
    FieldRule::with_check("gpa", r"^[0-4](\.[0-9]{1,2})?$", INVALID_GPA, gpa_within_scale);

pub static DEGREE: FieldRule = FieldRule::new("degree", r"^[A-Za-z. ]{2,50}$", INVALID_DEGREE);

pub static INSTITUTION: FieldRule =
    FieldRule::new("institution", r"^[A-Za-z0-9., ]{2,100}$", INVALID_INSTITUTION);

pub static COMPANY: FieldRule =
    FieldRule::new("company", r"^[A-Za-z0-9., &'-]{2,100}$", INVALID_COMPANY);

pub static POSITION: FieldRule =
    FieldRule::new("position", r"^[A-Za-z0-9., &'-]{2,50}$", INVALID_POSITION);

pub static DATE: FieldRule =
    FieldRule::with_check("date", r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$", INVALID_DATE, is_calendar_date);

pub static URL: FieldRule = FieldRule::new(
    "url",
    r"^(https?://)?([0-9a-z.-]+)\.([a-z.]{2,6})[/A-Za-z0-9_ .-]*/?$",
    INVALID_URL,
);

pub static FILENAME: FieldRule = FieldRule::new("filename", r"^[A-Za-z0-9_. -]+$", INVALID_FILENAME);

/// A named pattern with the message reported when a value fails it.
///
/// `refine` runs after the pattern matched and covers constraints a plain regular
/// expression cannot express (excluded id groups, numeric bounds, real calendar days).
pub struct FieldRule {
    name: &'static str,
    pattern: &'static str,
    message: &'static str,
    refine: Option<fn(&str) -> bool>,
    compiled: OnceLock<Regex>,
}

impl FieldRule {
    pub const fn new(name: &'static str, pattern: &'static str, message: &'static str) -> Self {
        Self {
            name,
            pattern,
            message,
            refine: None,
            compiled: OnceLock::new(),
        }
    }

    pub const fn with_check(
        name: &'static str,
        pattern: &'static str,
        message: &'static str,
        refine: fn(&str) -> bool,
    ) -> Self {
        Self {
            name,
            pattern,
            message,
            refine: Some(refine),
            compiled: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    fn regex(&self) -> &Regex {
        self.compiled
            .get_or_init(|| Regex::new(self.pattern).expect("field rule pattern is valid"))
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex().is_match(value) && self.refine.map_or(true, |refine| refine(value))
    }

    pub fn check(&self, value: &str) -> Result<(), RuleViolation> {
        if self.matches(value) {
            Ok(())
        } else {
            Err(RuleViolation {
                rule: self.name,
                message: self.message,
            })
        }
    }
}

/// GPA values arrive as numbers; the rule applies to their shortest decimal rendering.
pub fn check_gpa(value: f64) -> Result<(), RuleViolation> {
    GPA.check(&value.to_string())
}

fn national_id_groups_assigned(value: &str) -> bool {
    let mut groups = value.split('-');
    let area = groups.next().unwrap_or_default();
    let group = groups.next().unwrap_or_default();
    let serial = groups.next().unwrap_or_default();
    area != "000" && area != "666" && group != "00" && serial != "0000"
}

fn gpa_within_scale(value: &str) -> bool {
    value
        .parse::<f64>()
        .map(|gpa| (0.0..=4.0).contains(&gpa))
        .unwrap_or(false)
}

fn is_calendar_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// A single rule failure, before it is attached to a field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuleViolation {
    pub rule: &'static str,
    pub message: &'static str,
}

impl RuleViolation {
    pub fn at(self, field: impl Into<String>) -> ValidationFailure {
        ValidationFailure {
            field: field.into(),
            message: self.message.to_string(),
        }
    }
}

/// First validation failure found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
