//! Request and response bodies

pub mod case_files;
pub mod documents;
pub mod stats;
