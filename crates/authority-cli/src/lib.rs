//! CLI library components for the authority control toolkit.

pub mod logging;
