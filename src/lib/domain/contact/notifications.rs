//! Notification emails sent for a contact form submission

use askama::Template;
use chrono::{DateTime, Utc};

use crate::domain::{
    communication::email_addresses::EmailAddress,
    contact::{errors::ContactError, Submission},
};

/// The site owner, as presented in outgoing emails
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteOwner {
    /// The owner's display name
    pub name: String,

    /// The owner's role line
    pub role: String,

    /// The owner's institution
    pub affiliation: String,

    /// The public portfolio URL
    pub website: String,

    /// GitHub profile URL
    pub github: String,

    /// LinkedIn profile URL
    pub linkedin: String,

    /// Where admin notifications are delivered
    pub notification_address: EmailAddress,
}

/// A rendered email body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Self-contained HTML with inlined styles
    pub html: String,

    /// Plain text alternative
    pub plain: String,
}

/// Admin notification summarising a submission
#[derive(Debug, Template)]
#[template(path = "emails/contact/admin_notification.html")]
pub struct AdminNotificationTemplate<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message_lines: Vec<&'a str>,
    received_at: String,
    website: &'a str,
}

impl<'a> AdminNotificationTemplate<'a> {
    /// Creates a new `AdminNotificationTemplate`
    pub fn new(owner: &'a SiteOwner, submission: &'a Submission, received_at: DateTime<Utc>) -> Self {
        Self {
            name: submission.name(),
            email: submission.email().as_str(),
            subject: submission.subject(),
            message_lines: submission.message().lines().collect(),
            received_at: received_at
                .format("%A, %B %-d, %Y at %I:%M:%S %p UTC")
                .to_string(),
            website: &owner.website,
        }
    }

    /// The subject line of the notification
    pub fn subject_line(&self) -> String {
        format!("Portfolio Contact: {}", self.subject)
    }

    /// Renders the plain text version of the email
    pub fn render_plain(&self) -> String {
        format!(
            "New message received through your portfolio\n\n\
             Name: {name}\nEmail: {email}\nSubject: {subject}\n\n{message}\n\nReceived: {received_at}\n",
            name = self.name,
            email = self.email,
            subject = self.subject,
            message = self.message_lines.join("\n"),
            received_at = self.received_at,
        )
    }

    /// Renders both bodies of the email
    pub fn render_email(&self) -> Result<RenderedEmail, ContactError> {
        Ok(RenderedEmail {
            html: css_inline::inline(&self.render()?)?,
            plain: self.render_plain(),
        })
    }
}

/// Acknowledgement sent back to the submitter
#[derive(Debug, Template)]
#[template(path = "emails/contact/acknowledgement.html")]
pub struct AcknowledgementTemplate<'a> {
    subject: &'a str,
    message_lines: Vec<&'a str>,
    received_at: String,
    owner: &'a SiteOwner,
}

impl<'a> AcknowledgementTemplate<'a> {
    /// Creates a new `AcknowledgementTemplate`
    pub fn new(owner: &'a SiteOwner, submission: &'a Submission, received_at: DateTime<Utc>) -> Self {
        Self {
            subject: submission.subject(),
            message_lines: submission.message().lines().collect(),
            received_at: received_at.format("%A, %B %-d, %Y at %I:%M %p UTC").to_string(),
            owner,
        }
    }

    /// The subject line of the acknowledgement
    pub fn subject_line(&self) -> String {
        format!("Thank you for contacting me - {}", self.subject)
    }

    /// Renders the plain text version of the email
    pub fn render_plain(&self) -> String {
        format!(
            "Thanks for reaching out! Your message has been received.\n\n\
             Subject: {subject}\nReceived: {received_at}\n\n{message}\n\n\
             I typically respond within 24 hours.\n\n\
             {name}\n{website}\nGitHub: {github}\nLinkedIn: {linkedin}\n",
            subject = self.subject,
            received_at = self.received_at,
            message = self.message_lines.join("\n"),
            name = self.owner.name,
            website = self.owner.website,
            github = self.owner.github,
            linkedin = self.owner.linkedin,
        )
    }

    /// Renders both bodies of the email
    pub fn render_email(&self) -> Result<RenderedEmail, ContactError> {
        Ok(RenderedEmail {
            html: css_inline::inline(&self.render()?)?,
            plain: self.render_plain(),
        })
    }
}

/// Owner details used across tests
#[cfg(test)]
pub fn test_owner() -> SiteOwner {
    SiteOwner {
        name: "Site Owner".to_string(),
        role: "Full-Stack Developer".to_string(),
        affiliation: "Example University".to_string(),
        website: "https://portfolio.example.com".to_string(),
        github: "https://github.com/example".to_string(),
        linkedin: "https://www.linkedin.com/in/example".to_string(),
        notification_address: EmailAddress::new_unchecked("owner@example.com"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use testresult::TestResult;

    use super::*;

    fn received_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 15).unwrap()
    }

    #[test]
    fn test_admin_notification_contains_sender_details() -> TestResult {
        let owner = test_owner();
        let submission = Submission::new(
            "Jane Doe",
            "jane@example.com",
            "Hello",
            "Interested in collaborating.",
        )?;

        let template = AdminNotificationTemplate::new(&owner, &submission, received_at());
        let email = template.render_email()?;

        assert_eq!(template.subject_line(), "Portfolio Contact: Hello");
        assert!(email.html.contains("Jane Doe"));
        assert!(email.html.contains("mailto:jane@example.com"));
        assert!(email.html.contains("Interested in collaborating."));
        assert!(email.html.contains("Monday, January 5, 2026 at 09:30:15 AM UTC"));
        assert!(email.plain.contains("Email: jane@example.com"));

        Ok(())
    }

    #[test]
    fn test_admin_notification_styles_are_inlined() -> TestResult {
        let owner = test_owner();
        let submission =
            Submission::new("Jane Doe", "jane@example.com", "Hello", "Hello there")?;

        let email = AdminNotificationTemplate::new(&owner, &submission, received_at()).render_email()?;

        assert!(!email.html.contains("<style"));
        assert!(email.html.contains("style=\""));

        Ok(())
    }

    #[test]
    fn test_user_input_is_escaped() -> TestResult {
        let owner = test_owner();
        let submission = Submission::new(
            "<b>Mallory</b>",
            "mallory@example.com",
            "<img src=x>",
            "<script>alert(1)</script>",
        )?;

        let html = AdminNotificationTemplate::new(&owner, &submission, received_at()).render()?;

        assert!(!html.contains("<b>Mallory</b>"));
        assert!(!html.contains("<img src=x>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));

        Ok(())
    }

    #[test]
    fn test_message_newlines_become_line_breaks() -> TestResult {
        let owner = test_owner();
        let submission =
            Submission::new("Jane Doe", "jane@example.com", "Hello", "line one\nline two")?;

        let html = AcknowledgementTemplate::new(&owner, &submission, received_at()).render()?;

        assert!(html.contains("line one<br>line two"));

        Ok(())
    }

    #[test]
    fn test_acknowledgement_restates_message_and_links_owner() -> TestResult {
        let owner = test_owner();
        let submission =
            Submission::new("Jane Doe", "jane@example.com", "Hello", "Hello there")?;

        let template = AcknowledgementTemplate::new(&owner, &submission, received_at());
        let email = template.render_email()?;

        assert_eq!(template.subject_line(), "Thank you for contacting me - Hello");
        assert!(email.html.contains("Hello there"));
        assert!(email.html.contains("mailto:owner@example.com"));
        assert!(email.html.contains("https://github.com/example"));
        assert!(email.html.contains("Monday, January 5, 2026 at 09:30 AM UTC"));
        assert!(email.plain.contains("Site Owner"));

        Ok(())
    }
}
