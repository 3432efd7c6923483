pub mod config;
mod entrypoint;
pub mod processor;
pub mod profile;
pub mod utils;

pub use entrypoint::*;
