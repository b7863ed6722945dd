// src/constants.rs

/// Environment variable that disables every prompt when set to a truthy value.
pub const PROMPT_AUTO_ENV: &str = "ARGPARSE_PROMPT_AUTO";

/// Values of [`PROMPT_AUTO_ENV`] that still count as "off".
pub const FALSY_ENV_VALUES: &[&str] = &["0", "false", "no", "off"];

/// Directory name (under the system config dir) holding the optional config file.
pub const CONFIG_DIR_NAME: &str = "argprompt";

/// Name of the optional configuration file inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILENAME: &str = "config.toml";

/// Marker that opens the input line of every prompt.
pub const PROMPT_MARKER: &str = "> ";

/// Separator used when listing the allowed choices.
pub const CHOICE_SEPARATOR: &str = "|";

/// Label printed before a fatal parse error.
pub const ERROR_LABEL: &str = "error";

/// Logged when a secure value has to be read from non-terminal input.
pub const INSECURE_INPUT_WARNING: &str =
    "Input is not a terminal; the secure value will be read without hiding it.";
