pub mod adaptors;
pub mod auth;
pub mod grading;
pub mod import;
pub mod policy;
pub mod workflow;
