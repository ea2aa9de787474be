//! Request handlers

pub mod case_files;
pub mod documents;
pub mod stats;
pub mod health;
