pub mod cli;
pub mod config;
pub mod control;
pub mod error;
pub mod lessons;
pub mod plot;

pub use error::ControlError;
