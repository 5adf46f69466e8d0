//! Marlin firmware support
//!
//! Command creation and line classification for Marlin delta printers.

pub mod command_creator;
pub mod response_parser;

pub use command_creator::MarlinCommand;
pub use response_parser::{MarlinResponse, MarlinResponseParser};
