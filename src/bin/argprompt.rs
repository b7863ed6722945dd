// src/bin/argprompt.rs

use anyhow::{Context, Result};
use argprompt::{Argument, ParseError, PromptConfig, PromptParser};
use clap::{ArgAction, Command, crate_version};
use colored::*;

/// A small greeter that asks for whatever was not given on the command line.
///
/// Try `argprompt`, `argprompt --name Ada -c red`, or
/// `ARGPARSE_PROMPT_AUTO=1 argprompt` for the non-interactive behaviour.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli() {
        // --- Centralized Error Handling ---
        // Parse failures carry their own exit code and formatting (clap usage errors,
        // `--help`, or a value that could not be converted).
        if let Some(parse_err) = e.downcast_ref::<ParseError>() {
            parse_err.exit();
        }

        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_parser() -> Result<PromptParser> {
    let config = PromptConfig::load().context("Failed to load the prompt configuration")?;
    log::debug!("Prompt configuration: {:?}", config);

    let command = Command::new("argprompt")
        .version(crate_version!())
        .about("Greets you, asking for anything you left out.");
    let mut parser = PromptParser::with_config(command, config);

    parser.add_argument(Argument::new(["--name", "-n"]).help("Who to greet"))?;
    parser.add_argument(
        Argument::new(["--age"])
            .help("Your age in years")
            .parse::<u32>()
            .default_value(30),
    )?;
    parser.add_argument(
        Argument::new(["--color", "-c"])
            .help("Your favourite colour")
            .choices(["red", "green", "blue"])
            .default("blue"),
    )?;
    parser.add_argument(
        Argument::new(["--token"])
            .help("An access token, never echoed")
            .secure(true)
            .default_none(),
    )?;
    parser.add_argument(
        Argument::new(["--shout"])
            .help("Print the greeting in bold")
            .action(ArgAction::SetTrue),
    )?;

    Ok(parser)
}

fn run_cli() -> Result<()> {
    let mut parser = build_parser()?;
    let args = parser.parse()?;
    log::debug!("Parsed arguments: {:?}", args);

    let name = args.get::<String>("name").map_or("", String::as_str);
    let age = args.get::<u32>("age").copied().unwrap_or_default();
    let color = args.get::<String>("color").map_or("", String::as_str);

    let greeting = format!("Hello {}, age {}. Favourite colour: {}.", name, age, color);
    if args.get::<bool>("shout").copied().unwrap_or(false) {
        println!("{}", greeting.bold());
    } else {
        println!("{}", greeting);
    }

    if let Some(token) = args.get::<String>("token") {
        let notice = format!("A token of {} characters was received.", token.chars().count());
        println!("{}", notice.dimmed());
    }
    Ok(())
}
