//! Contact cleansing REST service: normalizes names, emails and phone numbers.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod status_page;
