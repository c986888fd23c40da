//! Output stage: everything here runs after the split succeeded.
pub mod json;
