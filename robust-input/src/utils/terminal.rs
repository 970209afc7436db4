//! # Terminal Input Helper
//!
//! Entry points for asking the user something. [`Terminal::ask`] picks the interactive
//! raw-mode editor when stdin is a terminal and the line-based fallback otherwise, and
//! keeps asking until the answer passes the config's [`ValidatorChain`].
//!
//! ## Features
//! - In-place editing with arrow keys, Home/End and Backspace
//! - Password masking
//! - Typed results ([`InputValue`])
//! - Ready-made prompts for passwords, bounded integers, choices and IPv4 addresses
//!
//! ## Usage
//!
//! ### Example 1: Boolean input
//! ```rust,no_run
//! use robust_input::utils::{DesiredType, InputConfig};
//!
//! let answer = InputConfig::builder("Do you like Rust? (yes/no)")
//!     .target(DesiredType::Bool)
//!     .allow_empty(false)
//!     .ask()
//!     .unwrap();
//!
//! println!("The input: {:?}", answer.as_bool());
//! ```
//!
//! ### Example 2: Restricted string input
//! ```rust,no_run
//! use robust_input::utils::get_choice;
//!
//! let scan = get_choice("Scan type", &["quick", "deep"], Some("quick")).unwrap();
//! println!("The input: {}", scan);
//! ```
use crate::utils::{
    config::{ConfigError, InputConfig, InputConfigBuilder},
    editor::LineEditor,
    fallback::NonTerminalFallback,
    ip::is_ipv4_dotted_quad,
    sanitize::{CastError, DesiredType, InputValue, ValidatorChain},
};
use std::{
    error::Error,
    fmt::Display,
    io::{self, IsTerminal},
};

/// Everything that can end an input request without a value.
#[derive(Debug)]
pub enum InputError {
    Config(ConfigError),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// The fallback gave up after this many rejected lines.
    AttemptsExhausted(usize),
    /// Input ended and the configured default did not validate.
    DefaultRejected(String),
    /// Input ended and there was no default to fall back on.
    EndOfInput,
    Cast(CastError),
    Io(io::Error),
}

impl Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Invalid input configuration: {}", e),
            Self::Interrupted => write!(f, "Input interrupted"),
            Self::AttemptsExhausted(n) => {
                write!(f, "Maximum validation attempts ({}) exceeded", n)
            }
            Self::DefaultRejected(d) => write!(f, "Default value '{}' failed validation", d),
            Self::EndOfInput => write!(f, "End of input reached"),
            Self::Cast(e) => write!(f, "{}", e),
            Self::Io(e) => write!(f, "{}", e),
        }
    }
}

impl Error for InputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Cast(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for InputError {
    fn from(value: ConfigError) -> Self {
        InputError::Config(value)
    }
}

impl From<CastError> for InputError {
    fn from(value: CastError) -> Self {
        InputError::Cast(value)
    }
}

impl From<io::Error> for InputError {
    fn from(value: io::Error) -> Self {
        InputError::Io(value)
    }
}

/// A helper for asking the user for input until it passes the config's checks.
pub struct Terminal;

impl Terminal {
    /// Prompts for `config` and returns the accepted, converted answer.
    ///
    /// # Errors
    ///
    /// [`InputError::Interrupted`] on Ctrl-C. Without a terminal, the fallback errors
    /// described on [`NonTerminalFallback::run`].
    pub fn ask(config: &InputConfig) -> Result<InputValue, InputError> {
        let chain = ValidatorChain::from_config(config);

        if !io::stdin().is_terminal() {
            tracing::debug!(prompt = config.prompt(), "stdin is not a terminal, reading lines");
            let stdin = io::stdin();
            return NonTerminalFallback::new(config, &chain, stdin.lock(), io::stdout())
                .run(config.max_attempts());
        }

        Self::ask_interactive(config, &chain)
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        use crate::utils::raw_mode::{RawMode, StdinKeys};

        impl Terminal {
            fn ask_interactive(
                config: &InputConfig,
                chain: &ValidatorChain,
            ) -> Result<InputValue, InputError> {
                let validated = {
                    let _raw = RawMode::enable()?;
                    let stdout = io::stdout();
                    LineEditor::new(config, chain, StdinKeys::new(), stdout.lock()).run()?
                };
                Ok(validated.cast()?)
            }
        }
    } else {
        use crate::utils::console::{ConsoleKeys, ConsoleRawMode};

        impl Terminal {
            fn ask_interactive(
                config: &InputConfig,
                chain: &ValidatorChain,
            ) -> Result<InputValue, InputError> {
                let validated = {
                    let _raw = ConsoleRawMode::enable()?;
                    let stdout = io::stdout();
                    LineEditor::new(config, chain, ConsoleKeys::new(), stdout.lock()).run()?
                };
                Ok(validated.cast()?)
            }
        }
    }
}

/// Asks for `config` on the terminal. Same as [`Terminal::ask`].
///
/// # Errors
///
/// See [`Terminal::ask`].
pub fn get_input(config: &InputConfig) -> Result<InputValue, InputError> {
    Terminal::ask(config)
}

fn expect_string(value: InputValue) -> Result<String, InputError> {
    match value {
        InputValue::String(s) => Ok(s),
        other => Err(InputError::Cast(CastError {
            input: format!("{:?}", other),
            target: DesiredType::String.to_string(),
        })),
    }
}

/// Masked input that must not be empty.
pub fn password_config(prompt: impl Into<String>) -> InputConfigBuilder {
    InputConfig::builder(prompt)
        .password(true)
        .allow_empty(false)
        .target(DesiredType::String)
        .error_message("Invalid password. Please try again.")
}

/// # Errors
///
/// See [`Terminal::ask`].
pub fn get_password(prompt: impl Into<String>) -> Result<String, InputError> {
    expect_string(password_config(prompt).ask()?)
}

/// Integer input within the inclusive bounds that are set.
pub fn integer_config(
    prompt: impl Into<String>,
    default: Option<i64>,
    min: Option<i64>,
    max: Option<i64>,
) -> InputConfigBuilder {
    let mut constraints = Vec::new();
    if let Some(min) = min {
        constraints.push(format!("minimum: {}", min));
    }
    if let Some(max) = max {
        constraints.push(format!("maximum: {}", max));
    }
    let message = if constraints.is_empty() {
        "Please enter a valid integer.".to_string()
    } else {
        format!("Please enter a valid integer ({}).", constraints.join(", "))
    };

    let mut builder = InputConfig::builder(prompt)
        .target(DesiredType::Int)
        .allow_empty(false)
        .error_message(message)
        .custom_validator(move |input| {
            input.parse::<i64>().is_ok_and(|n| {
                min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max)
            })
        });
    if let Some(default) = default {
        builder = builder.default(default.to_string());
    }
    builder
}

/// # Errors
///
/// See [`Terminal::ask`].
pub fn get_integer(
    prompt: impl Into<String>,
    default: Option<i64>,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<i64, InputError> {
    let value = integer_config(prompt, default, min, max).ask()?;
    value.as_int().ok_or_else(|| {
        InputError::Cast(CastError {
            input: format!("{:?}", value),
            target: DesiredType::Int.to_string(),
        })
    })
}

/// One of a fixed set of strings.
pub fn choice_config(
    prompt: impl Into<String>,
    choices: &[&str],
    default: Option<&str>,
) -> InputConfigBuilder {
    let mut builder = InputConfig::builder(prompt)
        .allow_empty(false)
        .target(DesiredType::String)
        .choices(choices.iter().copied())
        .error_message(format!("Please enter one of: {}.", choices.join(", ")));
    if let Some(default) = default {
        builder = builder.default(default);
    }
    builder
}

/// # Errors
///
/// See [`Terminal::ask`]. An empty `choices` slice is a [`ConfigError::EmptyChoices`].
pub fn get_choice(
    prompt: impl Into<String>,
    choices: &[&str],
    default: Option<&str>,
) -> Result<String, InputError> {
    expect_string(choice_config(prompt, choices, default).ask()?)
}

/// A dotted-quad IPv4 address.
pub fn ip_address_config(prompt: impl Into<String>, default: Option<&str>) -> InputConfigBuilder {
    let mut builder = InputConfig::builder(prompt)
        .allow_empty(false)
        .target(DesiredType::String)
        .error_message("Please enter a valid IP address (e.g., 192.168.1.1).")
        .custom_validator(is_ipv4_dotted_quad);
    if let Some(default) = default {
        builder = builder.default(default);
    }
    builder
}

/// # Errors
///
/// See [`Terminal::ask`].
pub fn get_ip_address(
    prompt: impl Into<String>,
    default: Option<&str>,
) -> Result<String, InputError> {
    expect_string(ip_address_config(prompt, default).ask()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::editor::tests::ScriptedKeys;

    fn submit(builder: InputConfigBuilder, bytes: &[u8]) -> Result<InputValue, InputError> {
        let config = builder.prompt_style(Vec::new()).build()?;
        let chain = ValidatorChain::from_config(&config);
        let validated =
            LineEditor::new(&config, &chain, ScriptedKeys::new(bytes), Vec::new()).run()?;
        Ok(validated.cast()?)
    }

    #[test]
    fn test_password_preset() {
        let config = password_config("Password").build().unwrap();
        assert!(config.is_password());
        assert!(!config.allow_empty());
        assert_eq!(config.error_message(), "Invalid password. Please try again.");

        let value = submit(password_config("Password"), b"\rpw\r").unwrap();
        assert_eq!(value, InputValue::String("pw".into()));
    }

    #[test]
    fn test_integer_preset_message() {
        let config = integer_config("Age", None, Some(1), Some(120)).build().unwrap();
        assert_eq!(
            config.error_message(),
            "Please enter a valid integer (minimum: 1, maximum: 120)."
        );
        let config = integer_config("Any", None, None, None).build().unwrap();
        assert_eq!(config.error_message(), "Please enter a valid integer.");
        let config = integer_config("Low", None, None, Some(3)).build().unwrap();
        assert_eq!(config.error_message(), "Please enter a valid integer (maximum: 3).");
    }

    #[test]
    fn test_integer_preset_range() {
        let value = submit(integer_config("Age", None, Some(1), Some(120)), b"0\r121\r77\r");
        assert_eq!(value.unwrap(), InputValue::Int(77));

        let value = submit(integer_config("Age", Some(30), Some(1), Some(120)), b"\r");
        assert_eq!(value.unwrap(), InputValue::Int(30));
    }

    #[test]
    fn test_choice_preset() {
        let config = choice_config("Color", &["red", "blue"], None).build().unwrap();
        assert_eq!(config.error_message(), "Please enter one of: red, blue.");

        let value = submit(choice_config("Color", &["red", "blue"], None), b"green\rblue\r");
        assert_eq!(value.unwrap(), InputValue::String("blue".into()));
    }

    #[test]
    fn test_choice_preset_requires_choices() {
        let err = choice_config("Color", &[], None).build().unwrap_err();
        assert_eq!(err, ConfigError::EmptyChoices);
    }

    #[test]
    fn test_ip_preset() {
        let value = submit(ip_address_config("IP", None), b"192.168.01.1\r10.0.0.1\r");
        assert_eq!(value.unwrap(), InputValue::String("10.0.0.1".into()));

        let value = submit(ip_address_config("IP", Some("127.0.0.1")), b"\r");
        assert_eq!(value.unwrap(), InputValue::String("127.0.0.1".into()));
    }

    #[test]
    fn test_input_error_display() {
        assert_eq!(
            InputError::AttemptsExhausted(10).to_string(),
            "Maximum validation attempts (10) exceeded"
        );
        assert_eq!(
            InputError::DefaultRejected("x".into()).to_string(),
            "Default value 'x' failed validation"
        );
        let err = InputError::from(ConfigError::EmptyPrompt);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_expect_string_rejects_other_values() {
        assert!(expect_string(InputValue::Int(1)).is_err());
        assert_eq!(expect_string(InputValue::String("s".into())).unwrap(), "s");
    }
}
