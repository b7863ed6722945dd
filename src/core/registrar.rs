// src/core/registrar.rs

use crate::{
    constants::ERROR_LABEL,
    core::{
        converter::{Converter, PlainValueParser},
        flags,
        resolver::{AnyValue, ErasedResolver, PromptResolver, ResolutionError},
    },
    models::{Argument, DeclarationError, PromptDefault},
    system::{
        prompt_config::PromptConfig,
        terminal::{ConsoleTerminal, Terminal},
    },
};
use clap::{ArgAction, ArgMatches, Command, parser::MatchesError};
use colored::Colorize;
use std::{
    any::{Any, type_name},
    collections::{HashMap, HashSet},
    ffi::OsString,
    mem,
    sync::Arc,
};
use thiserror::Error;

// --- Error Handling ---

/// Why a parse produced no [`ParsedArgs`].
#[derive(Error, Debug)]
pub enum ParseError {
    /// Usage errors, `--help` and `--version`, as reported by clap.
    #[error(transparent)]
    Clap(#[from] clap::Error),
    /// An intercepted argument could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    /// clap's matches did not hold the raw text of an intercepted argument.
    #[error("The raw value of '{name}' could not be read back: {source}")]
    Matches {
        name: String,
        #[source]
        source: MatchesError,
    },
}

impl ParseError {
    /// `1` for failed resolutions; clap decides for its own errors
    /// (`0` for help and version output, `2` for usage errors).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Clap(err) => err.exit_code(),
            Self::Resolution(_) | Self::Matches { .. } => 1,
        }
    }

    /// Prints the diagnostic and terminates the process.
    pub fn exit(&self) -> ! {
        if let Self::Clap(err) = self {
            err.exit();
        }
        eprintln!("{}: {}", ERROR_LABEL.red().bold(), self);
        std::process::exit(self.exit_code());
    }
}

/// A failed lookup in [`ParsedArgs`].
#[derive(Error, Debug)]
pub enum ValueError {
    /// No argument with this destination name.
    #[error("No argument named '{0}' was declared.")]
    UnknownArgument(String),
    /// The value exists but has another type.
    #[error("The value of '{name}' is not a {requested}.")]
    TypeMismatch {
        name: String,
        requested: &'static str,
    },
    /// Any other clap lookup failure.
    #[error("The value of '{name}' could not be read: {source}")]
    Matches {
        name: String,
        #[source]
        source: MatchesError,
    },
}

// --- Parser ---

/// A clap command whose arguments fall back to interactive prompts.
///
/// Arguments are declared with [`PromptParser::add_argument`]. Each one is
/// either handed to clap untouched, or intercepted: clap then only collects
/// its raw text, and a [`PromptResolver`] turns that text (or, when nothing
/// was supplied, the user's answer to a prompt) into the final value.
#[derive(Debug)]
pub struct PromptParser {
    command: Command,
    config: PromptConfig,
    resolvers: Vec<Box<dyn ErasedResolver>>,
    plain_defaults: HashMap<String, Option<AnyValue>>,
    destinations: HashSet<String>,
}

impl PromptParser {
    /// Wraps `command`, reading the prompting policy from the environment once.
    pub fn new(command: Command) -> Self {
        Self::with_config(command, PromptConfig::from_env())
    }

    /// Wraps `command` with an explicit prompting policy.
    pub fn with_config(command: Command, config: PromptConfig) -> Self {
        Self {
            command,
            config,
            resolvers: Vec::new(),
            plain_defaults: HashMap::new(),
            destinations: HashSet::new(),
        }
    }

    /// The policy fixed at construction.
    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    /// The clap command, with every registered argument.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Registers an argument and returns its destination name.
    pub fn add_argument<T>(&mut self, argument: Argument<T>) -> Result<String, DeclarationError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let dest = flags::destination_name(&argument.flags)?;
        if self.destinations.contains(&dest) {
            return Err(DeclarationError::Duplicate(dest));
        }

        let dest = if self.intercepts(&argument) {
            self.register_prompting(argument, &dest)?
        } else {
            self.register_plain(argument, &dest)?
        };

        self.destinations.insert(dest.clone());
        Ok(dest)
    }

    fn intercepts<T: 'static>(&self, argument: &Argument<T>) -> bool {
        if !argument.prompt || !argument.takes_single_value() || self.config.non_interactive {
            return false;
        }
        !(self.config.suppress_prompt_if_default_given && argument.default.is_declared())
    }

    /// The argument goes to clap as a plain string option without default or
    /// `required`: an absent value is what triggers the prompt.
    fn register_prompting<T>(
        &mut self,
        argument: Argument<T>,
        dest: &str,
    ) -> Result<String, DeclarationError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let checked_choices = if self.config.validate_supplied_choices {
            argument.choices.clone()
        } else {
            None
        };
        let raw_parser = PlainValueParser::new(Converter::<String>::identity(), checked_choices);
        let arg = argument
            .base_arg(dest)?
            .action(ArgAction::Set)
            .required(false)
            .value_parser(raw_parser);

        let Argument {
            help,
            converter,
            default,
            secure,
            choices,
            ..
        } = argument;
        let mut resolver = PromptResolver::new(help, converter, default, secure, choices);

        let dest = arg.get_id().as_str().to_string();
        self.command = mem::take(&mut self.command).arg(arg);
        resolver.assign_name(dest.clone());

        log::debug!("Registered '{}' with an interactive fallback.", dest);
        self.resolvers.push(Box::new(resolver));
        Ok(dest)
    }

    /// The argument goes to clap as declared. Defaults clap cannot hold
    /// (typed values, `Null`) are kept here and served by [`ParsedArgs`].
    fn register_plain<T>(
        &mut self,
        argument: Argument<T>,
        dest: &str,
    ) -> Result<String, DeclarationError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut arg = argument.base_arg(dest)?;

        if argument.takes_value() {
            arg = arg.value_parser(PlainValueParser::new(
                argument.converter.clone(),
                argument.choices.clone(),
            ));
            match argument.default {
                PromptDefault::Unset => {}
                PromptDefault::Text(text) => arg = arg.default_value(text),
                PromptDefault::Null => {
                    self.plain_defaults.insert(dest.to_string(), None);
                }
                PromptDefault::Value { value, .. } => {
                    self.plain_defaults
                        .insert(dest.to_string(), Some(Arc::new(value) as AnyValue));
                }
            }
        }

        let dest = arg.get_id().as_str().to_string();
        self.command = mem::take(&mut self.command).arg(arg);

        log::debug!("Registered '{}' without prompting.", dest);
        Ok(dest)
    }

    /// Parses `args` and resolves every intercepted argument in declaration
    /// order, prompting through `terminal` where needed.
    pub fn parse_from_with<I, A>(
        &mut self,
        args: I,
        terminal: &mut dyn Terminal,
    ) -> Result<ParsedArgs, ParseError>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString> + Clone,
    {
        let matches = self.command.try_get_matches_from_mut(args)?;

        let mut resolved = HashMap::with_capacity(self.resolvers.len());
        for resolver in &self.resolvers {
            let name = resolver.name();
            let raw = matches
                .try_get_one::<String>(name)
                .map_err(|source| ParseError::Matches {
                    name: name.to_string(),
                    source,
                })?
                .map_or("", String::as_str);

            let value = resolver.resolve_any(raw, terminal)?;
            resolved.insert(name.to_string(), value);
        }

        Ok(ParsedArgs {
            matches,
            resolved,
            plain_defaults: self.plain_defaults.clone(),
        })
    }

    /// Like [`PromptParser::parse_from_with`], prompting on the console.
    pub fn parse_from<I, A>(&mut self, args: I) -> Result<ParsedArgs, ParseError>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString> + Clone,
    {
        let mut terminal = ConsoleTerminal::stderr();
        self.parse_from_with(args, &mut terminal)
    }

    /// Parses the process arguments.
    pub fn parse(&mut self) -> Result<ParsedArgs, ParseError> {
        self.parse_from(std::env::args_os())
    }

    /// Parses the process arguments, exiting with a diagnostic on failure.
    pub fn parse_or_exit(&mut self) -> ParsedArgs {
        self.parse().unwrap_or_else(|err| err.exit())
    }
}

// --- Results ---

/// The outcome of a parse: clap's matches plus the resolved values of the
/// intercepted arguments.
#[derive(Debug)]
pub struct ParsedArgs {
    matches: ArgMatches,
    resolved: HashMap<String, Option<AnyValue>>,
    plain_defaults: HashMap<String, Option<AnyValue>>,
}

impl ParsedArgs {
    /// The value of `name`, or `None` when the argument has no value.
    pub fn try_get<T>(&self, name: &str) -> Result<Option<&T>, ValueError>
    where
        T: Any + Clone + Send + Sync + 'static,
    {
        if let Some(slot) = self.resolved.get(name) {
            return downcast(name, slot.as_ref());
        }

        match self.matches.try_get_one::<T>(name) {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) => {}
            Err(MatchesError::UnknownArgument { .. }) => {
                return Err(ValueError::UnknownArgument(name.to_string()));
            }
            Err(MatchesError::Downcast { .. }) => {
                return Err(ValueError::TypeMismatch {
                    name: name.to_string(),
                    requested: type_name::<T>(),
                });
            }
            Err(source) => {
                return Err(ValueError::Matches {
                    name: name.to_string(),
                    source,
                });
            }
        }

        match self.plain_defaults.get(name) {
            Some(slot) => downcast(name, slot.as_ref()),
            None => Ok(None),
        }
    }

    /// Like [`ParsedArgs::try_get`], logging and discarding lookup errors.
    pub fn get<T>(&self, name: &str) -> Option<&T>
    where
        T: Any + Clone + Send + Sync + 'static,
    {
        self.try_get(name).unwrap_or_else(|err| {
            log::warn!("{}", err);
            None
        })
    }

    /// Whether the argument ended up with a value, whatever its type.
    pub fn contains(&self, name: &str) -> bool {
        if let Some(slot) = self.resolved.get(name) {
            return slot.is_some();
        }
        self.matches.contains_id(name)
            || self
                .plain_defaults
                .get(name)
                .is_some_and(|slot| slot.is_some())
    }

    /// The underlying clap matches, e.g. for flags and subcommands.
    pub fn matches(&self) -> &ArgMatches {
        &self.matches
    }
}

fn downcast<'a, T: Any>(name: &str, slot: Option<&'a AnyValue>) -> Result<Option<&'a T>, ValueError> {
    match slot {
        None => Ok(None),
        Some(value) => Arc::as_ref(value)
            .downcast_ref::<T>()
            .map(Some)
            .ok_or_else(|| ValueError::TypeMismatch {
                name: name.to_string(),
                requested: type_name::<T>(),
            }),
    }
}

// MARK: --- UNIT TESTS ---
