//! Data models for documents, fields, and configuration.

pub mod config;
pub mod document;
pub mod field;
