// src/core/resolver.rs

use crate::{
    constants::{CHOICE_SEPARATOR, PROMPT_MARKER},
    core::converter::{BoxError, Converter},
    models::PromptDefault,
    system::terminal::Terminal,
};
use std::{any::Any, fmt, io, sync::Arc};
use thiserror::Error;

/// A resolved value with its type erased, so resolvers of different value
/// types can live in one list.
pub(crate) type AnyValue = Arc<dyn Any + Send + Sync>;

/// Shown instead of the input of a secure argument.
const HIDDEN_VALUE: &str = "<hidden>";

// --- Error Handling ---

/// Why an intercepted argument has no value.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The converter rejected the supplied text, the answer or a textual default.
    #[error("argument '{name}': invalid value '{value}', expected {expected} ({source})")]
    Conversion {
        name: String,
        value: String,
        expected: String,
        #[source]
        source: BoxError,
    },
    /// The terminal failed while prompting or reading.
    #[error("argument '{name}': could not read input ({source})")]
    Input {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl ResolutionError {
    /// The destination name of the argument that failed.
    pub fn argument(&self) -> &str {
        match self {
            Self::Conversion { name, .. } | Self::Input { name, .. } => name,
        }
    }
}

// --- Resolver ---

/// Turns the raw command-line value of one argument into its final value,
/// asking the user when nothing was supplied.
///
/// # Logic:
/// - A non-empty raw value is converted directly; the terminal is never touched.
/// - An empty raw value renders the prompt and reads one answer (without echo
///   when `secure`). With `choices`, non-empty answers outside the list are
///   rejected and the prompt is repeated.
/// - An empty answer falls back to the default. Textual defaults (and the
///   implicit empty string of an `Unset` default) are converted; typed
///   defaults and `Null` are returned as they are.
pub struct PromptResolver<T> {
    name: String,
    help: Option<String>,
    converter: Converter<T>,
    default: PromptDefault<T>,
    secure: bool,
    choices: Option<Vec<String>>,
}

impl<T> fmt::Debug for PromptResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptResolver")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("converter", &self.converter)
            .field("default", &self.default.label())
            .field("secure", &self.secure)
            .field("choices", &self.choices)
            .finish()
    }
}

impl<T: Clone + 'static> PromptResolver<T> {
    /// Creates a resolver. Its name is unknown until the argument has been
    /// registered; see [`PromptResolver::assign_name`].
    pub fn new(
        help: Option<String>,
        converter: Converter<T>,
        default: PromptDefault<T>,
        secure: bool,
        choices: Option<Vec<String>>,
    ) -> Self {
        Self {
            name: String::new(),
            help,
            converter,
            default,
            secure,
            choices,
        }
    }

    /// Sets the destination name used in prompts and errors.
    pub fn assign_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The destination name, empty until assigned.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full prompt as written to the diagnostic stream.
    pub fn prompt_text(&self) -> String {
        render_prompt(
            &self.name,
            self.help.as_deref(),
            self.default.label(),
            self.choices.as_deref(),
        )
    }

    /// Resolves `raw` (empty when nothing was supplied) to the final value.
    /// `None` is only produced by a `Null` default.
    pub fn resolve(
        &self,
        raw: &str,
        terminal: &mut dyn Terminal,
    ) -> Result<Option<T>, ResolutionError> {
        if !raw.is_empty() {
            log::debug!("'{}' was supplied on the command line.", self.name);
            return self.convert(raw).map(Some);
        }

        let answer = self.ask(terminal)?;
        if !answer.is_empty() {
            return self.convert(&answer).map(Some);
        }

        log::debug!("No input for '{}', falling back to its default.", self.name);
        match &self.default {
            PromptDefault::Unset => self.convert("").map(Some),
            PromptDefault::Null => Ok(None),
            PromptDefault::Text(text) => self.convert(text).map(Some),
            PromptDefault::Value { value, .. } => Ok(Some(value.clone())),
        }
    }

    /// Prompts until the answer is empty or, with choices, one of them.
    fn ask(&self, terminal: &mut dyn Terminal) -> Result<String, ResolutionError> {
        let prompt = self.prompt_text();
        loop {
            terminal
                .write_prompt(&prompt)
                .map_err(|e| self.input_error(e))?;

            let answer = if self.secure {
                terminal.read_secure_line()
            } else {
                terminal.read_line()
            }
            .map_err(|e| self.input_error(e))?;

            match &self.choices {
                Some(choices) if !answer.is_empty() && !choices.contains(&answer) => {
                    let shown = if self.secure { HIDDEN_VALUE } else { answer.as_str() };
                    let message = format!(
                        "'{}' is not one of {}, try again\n",
                        shown,
                        choices.join(CHOICE_SEPARATOR)
                    );
                    terminal
                        .write_prompt(&message)
                        .map_err(|e| self.input_error(e))?;
                }
                _ => return Ok(answer),
            }
        }
    }

    fn convert(&self, raw: &str) -> Result<T, ResolutionError> {
        self.converter
            .convert(raw)
            .map_err(|source| ResolutionError::Conversion {
                name: self.name.clone(),
                value: if self.secure {
                    HIDDEN_VALUE.to_string()
                } else {
                    raw.to_string()
                },
                expected: self.converter.expected().to_string(),
                source,
            })
    }

    fn input_error(&self, source: io::Error) -> ResolutionError {
        ResolutionError::Input {
            name: self.name.clone(),
            source,
        }
    }
}

/// Object-safe face of [`PromptResolver`] used by the registrar.
pub(crate) trait ErasedResolver: fmt::Debug {
    fn name(&self) -> &str;

    fn resolve_any(
        &self,
        raw: &str,
        terminal: &mut dyn Terminal,
    ) -> Result<Option<AnyValue>, ResolutionError>;
}

impl<T> ErasedResolver for PromptResolver<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_any(
        &self,
        raw: &str,
        terminal: &mut dyn Terminal,
    ) -> Result<Option<AnyValue>, ResolutionError> {
        Ok(self
            .resolve(raw, terminal)?
            .map(|value| Arc::new(value) as AnyValue))
    }
}

/// Builds `"<name>: <help>\n> (<default>) (<c1>|<c2>): "`.
///
/// The help suffix appears only for non-empty help. The parenthesized
/// segments appear only when configured, and the closing `": "` only when at
/// least one of them does.
pub fn render_prompt(
    name: &str,
    help: Option<&str>,
    default: Option<&str>,
    choices: Option<&[String]>,
) -> String {
    let mut text = String::from(name);
    if let Some(help) = help.filter(|h| !h.is_empty()) {
        text.push_str(": ");
        text.push_str(help);
    }
    text.push('\n');
    text.push_str(PROMPT_MARKER);

    let mut segments = Vec::with_capacity(2);
    if let Some(default) = default {
        segments.push(format!("({})", default));
    }
    if let Some(choices) = choices.filter(|c| !c.is_empty()) {
        segments.push(format!("({})", choices.join(CHOICE_SEPARATOR)));
    }
    if !segments.is_empty() {
        text.push_str(&segments.join(" "));
        text.push_str(": ");
    }
    text
}

// MARK: --- UNIT TESTS ---
