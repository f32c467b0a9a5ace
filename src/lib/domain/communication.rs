//! Outbound communication: email addresses and mail transports

pub mod email_addresses;
pub mod mailer;
