// src/core/flags.rs

use crate::models::DeclarationError;

/// One spelling of an argument as written in its declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagSpelling {
    /// `--name`
    Long(String),
    /// `-n`
    Short(char),
    /// A bare word, declared as a positional argument.
    Positional(String),
}

/// Classifies a single flag spelling.
///
/// Single-dash spellings must be exactly one character (`-n`); clap has no
/// notion of single-dash long options.
pub fn parse_flag(spelling: &str) -> Result<FlagSpelling, DeclarationError> {
    let invalid = || DeclarationError::InvalidFlag(spelling.to_string());

    if let Some(name) = spelling.strip_prefix("--") {
        if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
            return Err(invalid());
        }
        return Ok(FlagSpelling::Long(name.to_string()));
    }

    if let Some(rest) = spelling.strip_prefix('-') {
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) if c != '-' && !c.is_whitespace() => Ok(FlagSpelling::Short(c)),
            _ => Err(invalid()),
        };
    }

    if spelling.is_empty() || spelling.contains(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(FlagSpelling::Positional(spelling.to_string()))
}

/// Parses every spelling of a declaration. Positional names cannot be mixed
/// with flags, and at least one spelling is required.
pub fn parse_flags(spellings: &[String]) -> Result<Vec<FlagSpelling>, DeclarationError> {
    if spellings.is_empty() {
        return Err(DeclarationError::NoFlags);
    }

    let parsed = spellings
        .iter()
        .map(|s| parse_flag(s))
        .collect::<Result<Vec<_>, _>>()?;

    let positional_count = parsed
        .iter()
        .filter(|f| matches!(f, FlagSpelling::Positional(_)))
        .count();
    if positional_count > 0 && parsed.len() != 1 {
        return Err(DeclarationError::MixedPositional(spellings.join(", ")));
    }

    Ok(parsed)
}

/// Derives the destination identifier of a declaration.
///
/// The first long flag wins (`--dry-run` becomes `dry_run`), then the first
/// short flag, then the positional name. Dashes are normalized to underscores.
pub fn destination_name(spellings: &[String]) -> Result<String, DeclarationError> {
    let parsed = parse_flags(spellings)?;

    let long = parsed.iter().find_map(|f| match f {
        FlagSpelling::Long(name) | FlagSpelling::Positional(name) => Some(name.as_str()),
        FlagSpelling::Short(_) => None,
    });

    let dest = match long {
        Some(name) => name.replace('-', "_"),
        None => parsed
            .iter()
            .find_map(|f| match f {
                FlagSpelling::Short(c) => Some(c.to_string()),
                _ => None,
            })
            .ok_or(DeclarationError::NoFlags)?,
    };

    Ok(dest)
}
