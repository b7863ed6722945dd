// src/models.rs

use crate::core::{
    converter::{BoxError, Converter},
    flags::{self, FlagSpelling},
};
use clap::{Arg, ArgAction};
use std::{fmt, str::FromStr};
use thiserror::Error;

// --- Error Handling ---

/// A declaration the parser cannot register.
#[derive(Error, Debug)]
pub enum DeclarationError {
    /// No spelling at all.
    #[error("An argument needs at least one flag or positional name.")]
    NoFlags,
    /// A spelling like `-ab`, `---x` or one containing whitespace.
    #[error("Invalid flag spelling: '{0}'.")]
    InvalidFlag(String),
    /// A positional name next to flag spellings.
    #[error("A positional name cannot be combined with other spellings: {0}.")]
    MixedPositional(String),
    /// The destination name is taken by an earlier declaration.
    #[error("An argument with destination '{0}' is already declared.")]
    Duplicate(String),
}

// --- Defaults ---

/// The value used when the user supplies nothing at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PromptDefault<T> {
    /// No default was declared. An empty answer is converted as the empty string.
    #[default]
    Unset,
    /// An explicit "no value". An empty answer resolves to nothing.
    Null,
    /// A textual default, run through the converter like typed-in text.
    Text(String),
    /// An already-typed default, returned as-is. `label` is what the prompt shows.
    Value { value: T, label: String },
}

impl<T> PromptDefault<T> {
    /// Whether the declaration named a default (including `Null`).
    pub fn is_declared(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// The rendering shown between parentheses in the prompt, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Value { label, .. } => Some(label),
            Self::Unset | Self::Null => None,
        }
    }

    /// Carries the default over to a declaration with another value type.
    /// Typed defaults fall back to their textual rendering, which the new
    /// converter will parse.
    fn retype<U>(self) -> PromptDefault<U> {
        match self {
            Self::Unset => PromptDefault::Unset,
            Self::Null => PromptDefault::Null,
            Self::Text(text) => PromptDefault::Text(text),
            Self::Value { label, .. } => PromptDefault::Text(label),
        }
    }
}

// --- Declarations ---

/// The declaration of a single command-line argument.
///
/// Built with a fluent API and handed to
/// [`PromptParser::add_argument`](crate::core::registrar::PromptParser::add_argument).
/// A fresh declaration yields `String` values; [`Argument::parse`] or
/// [`Argument::converter`] switch the value type.
///
/// ```
/// use argprompt::{Argument, PromptDefault};
/// use clap::ArgAction;
///
/// let name = Argument::new(["--name", "-n"])
///     .help("Who to greet")
///     .value_name("NAME")
///     .default("Ada");
/// assert_eq!(name.flags(), ["--name", "-n"]);
/// assert_eq!(name.default_spec(), &PromptDefault::Text("Ada".to_string()));
///
/// let verbose = Argument::new(["--verbose"])
///     .action(ArgAction::SetTrue)
///     .required(false);
/// assert_eq!(verbose.default_spec(), &PromptDefault::Unset);
/// ```
pub struct Argument<T> {
    pub(crate) flags: Vec<String>,
    pub(crate) help: Option<String>,
    pub(crate) converter: Converter<T>,
    pub(crate) default: PromptDefault<T>,
    pub(crate) secure: bool,
    pub(crate) choices: Option<Vec<String>>,
    pub(crate) prompt: bool,
    pub(crate) required: bool,
    pub(crate) action: Option<ArgAction>,
    pub(crate) value_name: Option<String>,
}

impl<T> fmt::Debug for Argument<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("flags", &self.flags)
            .field("help", &self.help)
            .field("converter", &self.converter)
            .field("default", &self.default.label())
            .field("secure", &self.secure)
            .field("choices", &self.choices)
            .field("prompt", &self.prompt)
            .field("required", &self.required)
            .field("action", &self.action)
            .finish()
    }
}

impl Argument<String> {
    /// Declares an argument from its spellings, e.g. `["--argument", "-a"]`.
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(Into::into).collect(),
            help: None,
            converter: Converter::identity(),
            default: PromptDefault::Unset,
            secure: false,
            choices: None,
            prompt: true,
            required: false,
            action: None,
            value_name: None,
        }
    }
}

impl<T: 'static> Argument<T> {
    /// Replaces the converter, changing the value type of the declaration.
    pub fn converter<U: 'static>(self, converter: Converter<U>) -> Argument<U> {
        Argument {
            flags: self.flags,
            help: self.help,
            converter,
            default: self.default.retype(),
            secure: self.secure,
            choices: self.choices,
            prompt: self.prompt,
            required: self.required,
            action: self.action,
            value_name: self.value_name,
        }
    }

    /// Shorthand for a converter backed by `U: FromStr`.
    pub fn parse<U>(self) -> Argument<U>
    where
        U: FromStr + 'static,
        U::Err: Into<BoxError>,
    {
        self.converter(Converter::parse())
    }

    /// Help text, shown by clap and in the prompt.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// A textual default. It is converted like typed-in input.
    pub fn default(mut self, text: impl Into<String>) -> Self {
        self.default = PromptDefault::Text(text.into());
        self
    }

    /// A typed default, returned without conversion.
    pub fn default_value(mut self, value: T) -> Self
    where
        T: fmt::Display,
    {
        let label = value.to_string();
        self.default = PromptDefault::Value { value, label };
        self
    }

    /// Declares that an empty answer resolves to no value at all.
    pub fn default_none(mut self) -> Self {
        self.default = PromptDefault::Null;
        self
    }

    /// Reads the interactive answer without echoing it.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Restricts interactively entered values to this list.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// `false` turns the argument into a plain clap argument.
    pub fn prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Forwarded to clap. Prompting arguments are never required there,
    /// since the prompt supplies the value.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The clap action. Only `Set` (the default) can prompt.
    pub fn action(mut self, action: ArgAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Placeholder shown in clap's usage and help output.
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    /// The spellings as declared.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// The declared default.
    pub fn default_spec(&self) -> &PromptDefault<T> {
        &self.default
    }

    /// Help, version, flag and count actions never carry a value to prompt for.
    pub(crate) fn takes_single_value(&self) -> bool {
        matches!(self.action, None | Some(ArgAction::Set))
    }

    pub(crate) fn takes_value(&self) -> bool {
        matches!(
            self.action,
            None | Some(ArgAction::Set) | Some(ArgAction::Append)
        )
    }

    /// The clap argument carrying spellings, help, value name, action and
    /// `required`. Conversion and defaults are added by the registrar.
    pub(crate) fn base_arg(&self, id: &str) -> Result<Arg, DeclarationError> {
        let mut arg = Arg::new(id.to_string());
        let mut has_long = false;
        let mut has_short = false;

        for spelling in flags::parse_flags(&self.flags)? {
            arg = match spelling {
                FlagSpelling::Long(name) if !has_long => {
                    has_long = true;
                    arg.long(name)
                }
                FlagSpelling::Long(name) => arg.visible_alias(name),
                FlagSpelling::Short(c) if !has_short => {
                    has_short = true;
                    arg.short(c)
                }
                FlagSpelling::Short(c) => arg.visible_short_alias(c),
                FlagSpelling::Positional(_) => arg,
            };
        }

        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }
        if let Some(name) = &self.value_name {
            arg = arg.value_name(name.clone());
        }
        if let Some(action) = &self.action {
            arg = arg.action(action.clone());
        }
        Ok(arg.required(self.required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_declaration_defaults() {
        let argument = Argument::new(["--argument", "-a"]);
        assert_eq!(argument.flags(), ["--argument", "-a"]);
        assert_eq!(argument.default_spec(), &PromptDefault::Unset);
        assert!(argument.prompt);
        assert!(!argument.secure);
        assert!(argument.takes_single_value());
    }

    #[test]
    fn test_retyping_keeps_textual_default() {
        let argument = Argument::new(["--count"]).default("5").parse::<u8>();
        assert_eq!(argument.default_spec(), &PromptDefault::Text("5".to_string()));
        assert_eq!(argument.converter.convert("7").unwrap(), 7);
    }

    #[test]
    fn test_retyping_turns_typed_default_into_text() {
        let argument = Argument::new(["--count"])
            .default_value("12".to_string())
            .parse::<u32>();
        assert_eq!(argument.default_spec(), &PromptDefault::Text("12".to_string()));
    }

    #[test]
    fn test_typed_default_label() {
        let argument = Argument::new(["--ratio"]).parse::<f64>().default_value(0.5);
        assert_eq!(argument.default_spec().label(), Some("0.5"));
        assert!(argument.default_spec().is_declared());
    }

    #[test]
    fn test_null_default_has_no_label() {
        let argument = Argument::new(["--argument"]).default_none();
        assert_eq!(argument.default_spec().label(), None);
        assert!(argument.default_spec().is_declared());
    }

    #[test]
    fn test_valueless_actions() {
        let flag = Argument::new(["--verbose"]).action(ArgAction::SetTrue);
        assert!(!flag.takes_value());
        assert!(!flag.takes_single_value());

        let help = Argument::new(["--usage"]).action(ArgAction::Help);
        assert!(!help.takes_value());

        let list = Argument::new(["--tag"]).action(ArgAction::Append);
        assert!(list.takes_value());
        assert!(!list.takes_single_value());
    }

    #[test]
    fn test_base_arg_spellings() {
        let argument = Argument::new(["--argument", "-a", "--arg", "-A"])
            .help("An argument you could provide")
            .required(true);
        let arg = argument.base_arg("argument").unwrap();

        assert_eq!(arg.get_id().as_str(), "argument");
        assert_eq!(arg.get_long(), Some("argument"));
        assert_eq!(arg.get_short(), Some('a'));
        assert_eq!(arg.get_visible_aliases(), Some(vec!["arg"]));
        assert_eq!(arg.get_visible_short_aliases(), Some(vec!['A']));
        assert!(arg.is_required_set());
        assert_eq!(
            arg.get_help().map(ToString::to_string).as_deref(),
            Some("An argument you could provide")
        );
    }

    #[test]
    fn test_base_arg_positional() {
        let arg = Argument::new(["target"]).base_arg("target").unwrap();
        assert!(arg.is_positional());
    }

    #[test]
    fn test_base_arg_rejects_bad_spelling() {
        let result = Argument::new(["-long"]).base_arg("long");
        assert!(matches!(result, Err(DeclarationError::InvalidFlag(_))));
    }
}
