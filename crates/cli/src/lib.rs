//! Command-line front end for the crypto price dashboard.

pub mod args;
pub mod logging;
