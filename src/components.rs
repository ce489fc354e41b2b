//! HTML components for standalone output

pub mod layout;
