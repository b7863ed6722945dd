// src/core/mod.rs

//! # Prompting Core
//!
//! - **`flags`**: Validates flag spellings and derives destination names.
//! - **`converter`**: Typed conversion functions and their clap value-parser adapter.
//! - **`resolver`**: Turns a raw value, or the answer to a prompt, into the final value.
//! - **`registrar`**: Registers declarations on a clap command and drives the parse.

pub mod converter;
pub mod flags;
pub mod registrar;
pub mod resolver;
