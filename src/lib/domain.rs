//! Domain modules

pub mod communication;
pub mod contact;
pub mod portfolio;
