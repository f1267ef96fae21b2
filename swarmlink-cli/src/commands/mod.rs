//! CLI Commands

pub mod connect;
pub mod presence;
