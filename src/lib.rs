//! Exports a design-token tree as a variables API payload and a
//! token-management plugin document, optionally uploading the payload.

pub mod config;
pub mod export;
pub mod push;
