//! Interactive fallback prompts for clap arguments.
//!
//! Any argument declared through [`PromptParser`] that the user leaves out on
//! the command line is asked for on the terminal instead, with optional
//! defaults, choices and hidden input.

pub mod constants;
pub mod core;
pub mod models;
pub mod system;

pub use crate::core::{
    converter::{BoxError, Converter, PlainValueParser},
    registrar::{ParseError, ParsedArgs, PromptParser, ValueError},
    resolver::{PromptResolver, ResolutionError, render_prompt},
};
pub use crate::models::{Argument, DeclarationError, PromptDefault};
pub use crate::system::{
    prompt_config::{ConfigError, PromptConfig},
    terminal::{ConsoleTerminal, InputChannel, ScriptedTerminal, Terminal},
};
