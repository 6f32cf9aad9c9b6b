//! String-typed form state for creating and editing records.
//!
//! A [`Draft`] holds every form field as text, exactly as typed. Nothing is
//! parsed until submit, when [`Draft::to_input`] validates required fields
//! and converts the text into a typed payload. How invalid numbers are
//! treated is an explicit [`NumericPolicy`] chosen by the caller.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::record::Record;

/// Message shown for any missing required field.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

/// Date format used by date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from parsing a single text value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The value is empty or whitespace.
    #[error("value is empty")]
    Empty,
    /// The value is not a number.
    #[error("not a number: {0}")]
    NotANumber(String),
    /// The value is not a `YYYY-MM-DD` date.
    #[error("not a date (expected YYYY-MM-DD): {0}")]
    NotADate(String),
}

/// Parse a whole number from form text.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for blank input and
/// [`ParseError::NotANumber`] for anything `i64` cannot parse.
pub fn parse_integer(value: &str) -> Result<i64, ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ParseError::Empty);
    }
    value
        .parse()
        .map_err(|_| ParseError::NotANumber(value.to_owned()))
}

/// Parse a decimal amount from form text.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for blank input and
/// [`ParseError::NotANumber`] for anything `Decimal` cannot parse.
pub fn parse_decimal(value: &str) -> Result<Decimal, ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ParseError::Empty);
    }
    Decimal::from_str(value).map_err(|_| ParseError::NotANumber(value.to_owned()))
}

/// Parse a `YYYY-MM-DD` date from form text.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for blank input and
/// [`ParseError::NotADate`] otherwise.
pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ParseError::Empty);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ParseError::NotADate(value.to_owned()))
}

/// What to do with numeric (and date) text that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericPolicy {
    /// Blank or invalid numbers become zero; blank or invalid dates become unset.
    #[default]
    ZeroOnInvalid,
    /// Invalid values are rejected. Blank numbers still become zero.
    Strict,
}

impl FromStr for NumericPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" | "zero_on_invalid" => Ok(Self::ZeroOnInvalid),
            "strict" => Ok(Self::Strict),
            other => Err(format!("invalid numeric policy: {other} (expected zero or strict)")),
        }
    }
}

/// Required fields left blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", REQUIRED_FIELDS_MESSAGE)]
pub struct ValidationError {
    /// Names of the blank required fields, in schema order.
    pub missing: Vec<&'static str>,
}

/// Errors converting a draft into a typed payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// Required fields are blank.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A numeric or date field does not parse under [`NumericPolicy::Strict`].
    #[error("invalid value for {field}: {source}")]
    InvalidNumber {
        field: &'static str,
        source: ParseError,
    },

    /// A constrained text field (status, email, ...) has an unacceptable value.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    /// The field name is not part of this form.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// How a field's text is interpreted on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
}

/// One form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, matching the payload's JSON key.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// How the text is parsed on submit.
    pub kind: FieldKind,
    /// Whether the field must be non-blank to submit.
    pub required: bool,
    /// Value a fresh or reset draft starts with.
    pub default: &'static str,
}

impl FieldSpec {
    /// Optional text field with an empty default.
    #[must_use]
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: false,
            default: "",
        }
    }

    /// Optional field of the given kind with an empty default.
    #[must_use]
    pub const fn of(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            default: "",
        }
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the value a fresh draft starts with.
    #[must_use]
    pub const fn default_value(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }
}

/// Field layout of one form.
#[derive(Debug, PartialEq, Eq)]
pub struct DraftSchema {
    /// Singular entity name, e.g. `"inventory item"`.
    pub entity: &'static str,
    /// Fields in display order.
    pub fields: &'static [FieldSpec],
}

impl DraftSchema {
    /// Look up a field by name.
    #[must_use]
    pub fn field(&'static self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Payload built from a submitted draft.
pub trait DraftInput: Sized {
    /// Form layout for this payload.
    fn schema() -> &'static DraftSchema;

    /// Convert already-validated draft text into the payload.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if a value cannot be converted under `policy`.
    fn from_draft(draft: &Draft, policy: NumericPolicy) -> Result<Self, DraftError>;
}

/// A record that can be edited through a draft.
pub trait Editable: Record {
    /// Payload sent to create or update calls.
    type Input: DraftInput;

    /// Seed an edit form with this record's values rendered as text.
    fn to_draft(&self) -> Draft;
}

/// In-progress form values, all held as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    schema: &'static DraftSchema,
    values: BTreeMap<&'static str, String>,
}

impl Draft {
    /// A fresh draft with every field at its default.
    #[must_use]
    pub fn new(schema: &'static DraftSchema) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|f| (f.name, f.default.to_owned()))
            .collect();
        Self { schema, values }
    }

    /// A draft for the form of payload `I`.
    #[must_use]
    pub fn for_input<I: DraftInput>() -> Self {
        Self::new(I::schema())
    }

    /// A draft seeded with `values`. Names outside the schema are ignored.
    #[must_use]
    pub fn with_values<'a>(
        schema: &'static DraftSchema,
        values: impl IntoIterator<Item = (&'a str, String)>,
    ) -> Self {
        let mut draft = Self::new(schema);
        for (name, value) in values {
            let _ = draft.set(name, value);
        }
        draft
    }

    /// The form layout.
    #[must_use]
    pub const fn schema(&self) -> &'static DraftSchema {
        self.schema
    }

    /// Current text of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Replace the text of a field.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownField`] if `name` is not in the schema.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), DraftError> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| DraftError::UnknownField(name.to_owned()))?;
        self.values.insert(field.name, value.into());
        Ok(())
    }

    /// Return every field to its default.
    pub fn reset(&mut self) {
        *self = Self::new(self.schema);
    }

    /// Returns `true` if every field still holds its default.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.schema
            .fields
            .iter()
            .all(|f| self.get(f.name) == Some(f.default))
    }

    /// Check that every required field is non-blank.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing the blank required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = self
            .schema
            .fields
            .iter()
            .filter(|f| f.required && self.get(f.name).is_none_or(|v| v.trim().is_empty()))
            .map(|f| f.name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Validate, then convert into payload `I`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Validation`] when required fields are blank,
    /// or whatever `I::from_draft` rejects.
    pub fn to_input<I: DraftInput>(&self, policy: NumericPolicy) -> Result<I, DraftError> {
        self.validate()?;
        I::from_draft(self, policy)
    }

    /// Trimmed text of a field (empty if unknown).
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(str::trim).unwrap_or_default().to_owned()
    }

    /// Trimmed text of a field, or `None` if blank.
    #[must_use]
    pub fn optional_text(&self, name: &str) -> Option<String> {
        let text = self.text(name);
        (!text.is_empty()).then_some(text)
    }

    /// Parse an integer field under `policy`.
    ///
    /// # Errors
    ///
    /// Under [`NumericPolicy::Strict`], returns [`DraftError::InvalidNumber`]
    /// for non-blank text that is not an integer.
    pub fn integer(&self, name: &'static str, policy: NumericPolicy) -> Result<i64, DraftError> {
        self.numeric(name, policy, parse_integer)
    }

    /// Parse a decimal field under `policy`.
    ///
    /// # Errors
    ///
    /// Under [`NumericPolicy::Strict`], returns [`DraftError::InvalidNumber`]
    /// for non-blank text that is not a decimal.
    pub fn decimal(&self, name: &'static str, policy: NumericPolicy) -> Result<Decimal, DraftError> {
        self.numeric(name, policy, parse_decimal)
    }

    /// Parse an optional date field under `policy`.
    ///
    /// # Errors
    ///
    /// Under [`NumericPolicy::Strict`], returns [`DraftError::InvalidNumber`]
    /// for non-blank text that is not a `YYYY-MM-DD` date.
    pub fn date(
        &self,
        name: &'static str,
        policy: NumericPolicy,
    ) -> Result<Option<NaiveDate>, DraftError> {
        match parse_date(self.get(name).unwrap_or_default()) {
            Ok(date) => Ok(Some(date)),
            Err(ParseError::Empty) => Ok(None),
            Err(source) => match policy {
                NumericPolicy::ZeroOnInvalid => Ok(None),
                NumericPolicy::Strict => Err(DraftError::InvalidNumber {
                    field: name,
                    source,
                }),
            },
        }
    }

    /// Parse a constrained text field with `FromStr`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::InvalidValue`] with the parser's message.
    pub fn parsed<T>(&self, name: &'static str) -> Result<T, DraftError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.text(name)
            .parse()
            .map_err(|e: T::Err| DraftError::InvalidValue {
                field: name,
                message: e.to_string(),
            })
    }

    fn numeric<T: Default>(
        &self,
        name: &'static str,
        policy: NumericPolicy,
        parse: fn(&str) -> Result<T, ParseError>,
    ) -> Result<T, DraftError> {
        match parse(self.get(name).unwrap_or_default()) {
            Ok(value) => Ok(value),
            Err(ParseError::Empty) => Ok(T::default()),
            Err(source) => match policy {
                NumericPolicy::ZeroOnInvalid => Ok(T::default()),
                NumericPolicy::Strict => Err(DraftError::InvalidNumber {
                    field: name,
                    source,
                }),
            },
        }
    }
}
