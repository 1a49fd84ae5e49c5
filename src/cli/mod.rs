//! Command-line interface components
//!
//! This module contains CLI-specific code for the Top Movies application:
//! argument parsing and the command handlers.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ConfigArgs, DetailsArgs, GlobalArgs, ImageArgs, ListArgs};
pub use commands::{handle_config, handle_details, handle_image, handle_list};
