// src/core/converter.rs

use clap::builder::{PossibleValue, TypedValueParser};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use std::{
    any, convert::Infallible, error::Error as StdError, ffi::OsStr, fmt, str::FromStr, sync::Arc,
};

/// Error type returned by converter functions.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

type ConvertFn<T> = dyn Fn(&str) -> Result<T, BoxError> + Send + Sync;

/// Turns the raw text of an argument into its typed value.
///
/// Carries the name of the expected type so that failures can tell the user
/// what kind of input was wanted.
pub struct Converter<T> {
    expected: Arc<str>,
    func: Arc<ConvertFn<T>>,
}

impl<T> Clone for Converter<T> {
    fn clone(&self) -> Self {
        Self {
            expected: Arc::clone(&self.expected),
            func: Arc::clone(&self.func),
        }
    }
}

impl<T> fmt::Debug for Converter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Converter<T> {
    /// Wraps an arbitrary conversion function.
    pub fn new<F, E>(expected: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let expected: String = expected.into();
        Self {
            expected: Arc::from(expected),
            func: Arc::new(move |raw: &str| func(raw).map_err(Into::into)),
        }
    }
}

impl<T> Converter<T> {
    /// The human-readable name of the type this converter produces.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Applies the conversion to `raw`.
    pub fn convert(&self, raw: &str) -> Result<T, BoxError> {
        (self.func)(raw)
    }
}

impl<T> Converter<T>
where
    T: FromStr + 'static,
    T::Err: Into<BoxError>,
{
    /// A converter backed by the type's `FromStr` implementation.
    pub fn parse() -> Self {
        Self::new(short_type_name::<T>(), |raw: &str| raw.parse::<T>())
    }
}

impl Converter<String> {
    /// The passthrough converter used when a declaration names no converter.
    pub fn identity() -> Self {
        Self::new("text", |raw: &str| Ok::<_, Infallible>(raw.to_string()))
    }
}

/// `i64` instead of `core::primitive::i64`, `PathBuf` instead of `std::path::PathBuf`.
/// Generic types keep their full path since their parameters carry paths too.
fn short_type_name<T>() -> &'static str {
    let full = any::type_name::<T>();
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}

/// Adapts a [`Converter`] to clap's value-parser interface, for arguments that
/// clap converts by itself (everything that is not intercepted for prompting).
///
/// When `choices` is set, values outside it are rejected before conversion and
/// the choices are listed in the generated help.
pub struct PlainValueParser<T> {
    converter: Converter<T>,
    choices: Option<Vec<String>>,
}

impl<T> PlainValueParser<T> {
    /// Creates the adapter.
    pub fn new(converter: Converter<T>, choices: Option<Vec<String>>) -> Self {
        Self { converter, choices }
    }
}

impl<T> Clone for PlainValueParser<T> {
    fn clone(&self) -> Self {
        Self {
            converter: self.converter.clone(),
            choices: self.choices.clone(),
        }
    }
}

impl<T> fmt::Debug for PlainValueParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainValueParser")
            .field("converter", &self.converter)
            .field("choices", &self.choices)
            .finish()
    }
}

impl<T> TypedValueParser for PlainValueParser<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Value = T;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let raw = value
            .to_str()
            .ok_or_else(|| clap::Error::new(ErrorKind::InvalidUtf8).with_cmd(cmd))?;
        let arg_label = arg.map_or_else(|| "...".to_string(), ToString::to_string);

        if let Some(choices) = &self.choices
            && !choices.iter().any(|c| c == raw)
        {
            let mut err = clap::Error::new(ErrorKind::InvalidValue).with_cmd(cmd);
            err.insert(ContextKind::InvalidArg, ContextValue::String(arg_label));
            err.insert(
                ContextKind::InvalidValue,
                ContextValue::String(raw.to_string()),
            );
            err.insert(
                ContextKind::ValidValue,
                ContextValue::Strings(choices.clone()),
            );
            return Err(err);
        }

        self.converter.convert(raw).map_err(|source| {
            clap::Error::raw(
                ErrorKind::ValueValidation,
                format!(
                    "invalid value '{}' for '{}': expected {} ({})\n",
                    raw,
                    arg_label,
                    self.converter.expected(),
                    source
                ),
            )
            .with_cmd(cmd)
        })
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        self.choices.as_ref().map(|choices| {
            Box::new(choices.iter().map(|c| PossibleValue::new(c.clone())))
                as Box<dyn Iterator<Item = PossibleValue> + '_>
        })
    }
}

// MARK: --- UNIT TESTS ---
