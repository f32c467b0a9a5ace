//! Email Address

use std::fmt;

use lazy_static::lazy_static;
use lettre::message::Mailbox;
use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

use EmailAddressError::*;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$"
    )
    .unwrap();
}

/// Longest address accepted, per RFC 5321 path limits
const MAX_LENGTH: usize = 254;

const GMAIL_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];

const ICLOUD_DOMAINS: &[&str] = &["icloud.com", "me.com"];

const OUTLOOK_DOMAINS: &[&str] = &[
    "hotmail.at", "hotmail.be", "hotmail.ca", "hotmail.cl", "hotmail.co.il", "hotmail.co.nz",
    "hotmail.co.th", "hotmail.co.uk", "hotmail.com", "hotmail.com.ar", "hotmail.com.au",
    "hotmail.com.br", "hotmail.com.gr", "hotmail.com.mx", "hotmail.com.pe", "hotmail.com.tr",
    "hotmail.com.vn", "hotmail.cz", "hotmail.de", "hotmail.dk", "hotmail.es", "hotmail.fr",
    "hotmail.hu", "hotmail.id", "hotmail.ie", "hotmail.in", "hotmail.it", "hotmail.jp",
    "hotmail.kr", "hotmail.lv", "hotmail.my", "hotmail.ph", "hotmail.pt", "hotmail.sa",
    "hotmail.sg", "hotmail.sk", "live.be", "live.co.uk", "live.com", "live.com.ar",
    "live.com.mx", "live.de", "live.es", "live.eu", "live.fr", "live.it", "live.nl", "msn.com",
    "outlook.at", "outlook.be", "outlook.cl", "outlook.co.il", "outlook.co.nz", "outlook.co.th",
    "outlook.com", "outlook.com.ar", "outlook.com.au", "outlook.com.br", "outlook.com.gr",
    "outlook.com.pe", "outlook.com.tr", "outlook.com.vn", "outlook.cz", "outlook.de",
    "outlook.dk", "outlook.es", "outlook.fr", "outlook.hu", "outlook.id", "outlook.ie",
    "outlook.in", "outlook.it", "outlook.jp", "outlook.kr", "outlook.lv", "outlook.my",
    "outlook.ph", "outlook.pt", "outlook.sa", "outlook.sg", "outlook.sk", "passport.com",
];

const YAHOO_DOMAINS: &[&str] = &[
    "rocketmail.com", "yahoo.ca", "yahoo.co.uk", "yahoo.com", "yahoo.de", "yahoo.fr",
    "yahoo.in", "yahoo.it", "ymail.com",
];

const YANDEX_DOMAINS: &[&str] = &[
    "yandex.ru", "yandex.ua", "yandex.kz", "yandex.com", "yandex.by", "ya.ru",
];

/// Mailbox providers that deliver several spellings of a local part to one mailbox
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Provider {
    /// Ignores dots and `+tag` suffixes; `googlemail.com` is an alias
    Gmail,

    /// Ignores `+tag` suffixes
    Outlook,

    /// Ignores `+tag` suffixes
    ICloud,

    /// Ignores the last `-tag` suffix
    Yahoo,

    /// Every regional domain is an alias of `yandex.ru`
    Yandex,
}

impl Provider {
    fn for_domain(domain: &str) -> Option<Self> {
        [
            (GMAIL_DOMAINS, Self::Gmail),
            (OUTLOOK_DOMAINS, Self::Outlook),
            (ICLOUD_DOMAINS, Self::ICloud),
            (YAHOO_DOMAINS, Self::Yahoo),
            (YANDEX_DOMAINS, Self::Yandex),
        ]
        .into_iter()
        .find_map(|(domains, provider)| domains.contains(&domain).then_some(provider))
    }

    /// The canonical `(local, domain)` pair for an address at this provider
    fn canonical(&self, local: &str, domain: &str) -> (String, String) {
        let untagged = |separator: char| local.split(separator).next().unwrap_or(local);

        match self {
            Self::Gmail => (untagged('+').replace('.', ""), "gmail.com".to_string()),
            Self::Outlook | Self::ICloud => (untagged('+').to_string(), domain.to_string()),
            Self::Yahoo => (
                local
                    .rsplit_once('-')
                    .map_or(local, |(untagged, _)| untagged)
                    .to_string(),
                domain.to_string(),
            ),
            Self::Yandex => (local.to_string(), "yandex.ru".to_string()),
        }
    }
}

/// An error that can occur when creating an email address
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    /// The email address is empty
    #[error("email is empty")]
    EmptyEmailAddress,

    /// The email address is invalid
    #[error("email is invalid")]
    InvalidEmailAddress,
}

/// A validated, normalized email address
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address, normalizing it to its canonical form.
    ///
    /// The local part must be a dot-atom, so every accepted address can also be
    /// used as a mailbox by the mail transports.
    pub fn new(raw: &str) -> Result<Self, EmailAddressError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(EmptyEmailAddress);
        }

        if trimmed.len() > MAX_LENGTH || !is_mailbox(trimmed) {
            return Err(InvalidEmailAddress);
        }

        Ok(Self(normalize(trimmed)))
    }

    /// Create an email address without validation or normalization
    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.to_string())
    }

    /// Borrow the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_mailbox(address: &str) -> bool {
    EMAIL_REGEX.is_match(address) && address.parse::<Mailbox>().is_ok()
}

fn normalize(address: &str) -> String {
    let lowered = address.to_lowercase();

    // the regex guarantees exactly one `@`
    let Some((local, domain)) = lowered.split_once('@') else {
        return lowered;
    };

    let Some(provider) = Provider::for_domain(domain) else {
        return lowered;
    };

    let (local, domain) = provider.canonical(local, domain);
    let canonical = format!("{local}@{domain}");

    if is_mailbox(&canonical) {
        canonical
    } else {
        lowered
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl Serialize for EmailAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
