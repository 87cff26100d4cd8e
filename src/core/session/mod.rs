//! Payloads and results of the Doc Scan session endpoints.

pub mod configuration;
pub mod create;
pub mod face_capture;
pub mod instructions;
pub mod retrieve;
pub mod support;
