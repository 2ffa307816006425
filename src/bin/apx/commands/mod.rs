//! Command implementations

pub mod add;
pub mod clean;
pub mod generate;
pub mod list;
pub mod sync;
pub mod unlink;
