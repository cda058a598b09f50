//! Utilities shared by the Lectern binaries and their tests.

pub mod logger;
pub mod time;
