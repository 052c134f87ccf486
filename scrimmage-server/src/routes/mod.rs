//! HTTP route handlers

pub mod schedule;
pub mod status;
