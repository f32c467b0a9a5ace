#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Portfolio site backend: contact form intake, email dispatch and static site serving

pub mod domain;
pub mod infrastructure;
