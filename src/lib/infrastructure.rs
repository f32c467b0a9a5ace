//! Infrastructure modules

pub mod email;
pub mod http;
