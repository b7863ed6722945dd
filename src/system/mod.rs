//! # System Interaction Layer
//!
//! The boundary between the prompting logic and the environment it runs in.
//!
//! ## Modules
//!
//! - **`terminal`**: The channels prompts are written to and answers are read from. The
//!   console implementation writes to stderr and reads from stdin, hiding secure input when
//!   stdin is a terminal. A scripted implementation replays canned answers.
//! - **`prompt_config`**: The process-wide prompting policy, read from the environment and an
//!   optional `config.toml` in the user's config directory.

pub mod prompt_config;
pub mod terminal;
