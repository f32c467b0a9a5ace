//! Contact form submission and its validation rules

use std::{fmt, ops::RangeInclusive};

use thiserror::Error;

use crate::domain::communication::email_addresses::EmailAddress;

const NAME_LENGTH: RangeInclusive<usize> = 2..=50;
const SUBJECT_LENGTH: RangeInclusive<usize> = 2..=100;
const MESSAGE_LENGTH: RangeInclusive<usize> = 5..=1000;

/// A field of the contact form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// The sender's name
    Name,

    /// The sender's email address
    Email,

    /// The message subject
    Subject,

    /// The message body
    Message,
}

impl Field {
    /// The field's name as submitted by clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    fn rule(&self) -> &'static str {
        match self {
            Self::Name => "Name must be between 2 and 50 characters",
            Self::Email => "Please provide a valid email address",
            Self::Subject => "Subject must be between 2 and 100 characters",
            Self::Message => "Message must be between 5 and 1000 characters",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field that failed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field
    pub field: Field,

    /// A human readable description of the rule that failed
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field) -> Self {
        Self {
            field,
            message: field.rule(),
        }
    }
}

/// Every field error found in a submission, in form order
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// The individual field errors
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether `field` failed validation
    pub fn contains(&self, field: Field) -> bool {
        self.0.iter().any(|error| error.field == field)
    }
}

/// A validated contact form submission.
///
/// Exists for the duration of one request only; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    name: String,
    email: EmailAddress,
    subject: String,
    message: String,
}

impl Submission {
    /// Validate raw field values, collecting every violation.
    pub fn new(
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<Self, ValidationErrors> {
        let name = bounded(name, NAME_LENGTH).ok_or(FieldError::new(Field::Name));
        let email = EmailAddress::new(email).map_err(|_| FieldError::new(Field::Email));
        let subject = bounded(subject, SUBJECT_LENGTH).ok_or(FieldError::new(Field::Subject));
        let message = bounded(message, MESSAGE_LENGTH).ok_or(FieldError::new(Field::Message));

        let errors: Vec<FieldError> = [
            name.as_ref().err(),
            email.as_ref().err(),
            subject.as_ref().err(),
            message.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

        match (name, email, subject, message) {
            (Ok(name), Ok(email), Ok(subject), Ok(message)) => Ok(Self {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }

    /// The sender's name, trimmed
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sender's normalized email address
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The message subject, trimmed
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The message body, trimmed
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Trim `raw` and accept it when its character count falls within `length`
fn bounded(raw: &str, length: RangeInclusive<usize>) -> Option<String> {
    let trimmed = raw.trim();

    length
        .contains(&trimmed.chars().count())
        .then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn fields(result: Result<Submission, ValidationErrors>) -> Vec<Field> {
        result
            .expect_err("submission should be rejected")
            .errors()
            .iter()
            .map(|error| error.field)
            .collect()
    }

    #[test]
    fn test_valid_submission_is_trimmed_and_normalized() -> TestResult {
        let submission = Submission::new(
            "  Jane Doe ",
            "Jane@Example.com",
            " Hello ",
            "\nInterested in collaborating.\n",
        )?;

        assert_eq!(submission.name(), "Jane Doe");
        assert_eq!(submission.email().as_str(), "jane@example.com");
        assert_eq!(submission.subject(), "Hello");
        assert_eq!(submission.message(), "Interested in collaborating.");

        Ok(())
    }

    #[test]
    fn test_short_name_and_bad_email_are_both_reported() {
        let result = Submission::new("A", "bad", "Hi", "Hello there");

        assert_eq!(fields(result), vec![Field::Name, Field::Email]);
    }

    #[test]
    fn test_addresses_the_mail_transport_cannot_use_are_rejected() {
        for email in [
            "jane,doe@example.com",
            "(jane)@example.com",
            "jane\"x@example.com",
            ".jane@example.com",
            "ja..ne@example.com",
            "jane<x>@example.com",
        ] {
            let result = Submission::new("Jane", email, "Hello", "Hello there");
            assert_eq!(fields(result), vec![Field::Email], "{email:?} should be rejected");
        }
    }

    #[test]
    fn test_name_length_bounds() {
        for name in ["A", " B ", &"x".repeat(51)] {
            let result = Submission::new(name, "jane@example.com", "Hello", "Hello there");
            assert_eq!(fields(result), vec![Field::Name], "{name:?} should be rejected");
        }

        assert!(Submission::new("Jo", "jane@example.com", "Hello", "Hello there").is_ok());
        assert!(Submission::new(&"x".repeat(50), "jane@example.com", "Hello", "Hello there").is_ok());
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let name = "é".repeat(50);

        assert!(Submission::new(&name, "jane@example.com", "Hello", "Hello there").is_ok());
    }

    #[test]
    fn test_subject_length_bounds() {
        for subject in ["H", &"x".repeat(101)] {
            let result = Submission::new("Jane", "jane@example.com", subject, "Hello there");
            assert_eq!(fields(result), vec![Field::Subject]);
        }
    }

    #[test]
    fn test_message_length_bounds() {
        for message in ["Hey", "   Hi    ", &"x".repeat(1001)] {
            let result = Submission::new("Jane", "jane@example.com", "Hello", message);
            assert_eq!(fields(result), vec![Field::Message]);
        }

        assert!(Submission::new("Jane", "jane@example.com", "Hello", &"x".repeat(1000)).is_ok());
    }

    #[test]
    fn test_empty_submission_reports_every_field() {
        let result = Submission::new("", "", "", "");

        assert_eq!(
            fields(result),
            vec![Field::Name, Field::Email, Field::Subject, Field::Message]
        );
    }

    #[test]
    fn test_field_errors_carry_rule_messages() {
        let errors = Submission::new("A", "jane@example.com", "Hello", "Hello there")
            .expect_err("name is too short");

        assert!(errors.contains(Field::Name));
        assert_eq!(
            errors.errors()[0].message,
            "Name must be between 2 and 50 characters"
        );
    }
}
