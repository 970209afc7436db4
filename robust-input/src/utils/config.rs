//! # Input Configuration
//!
//! [`InputConfig`] describes one input request: what to show, what to accept and what
//! to convert the answer into. It is put together through [`InputConfigBuilder`], which
//! checks its parameters in [`InputConfigBuilder::build`] so a malformed request fails
//! before any prompt reaches the terminal.
//!
//! ```rust
//! use robust_input::utils::{ConfigError, InputConfig};
//!
//! let err = InputConfig::builder("Name")
//!     .min_length(5)
//!     .max_length(2)
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, ConfigError::LengthBounds { min: 5, max: 2 }));
//! ```
use crate::utils::{
    pattern_cache::{PatternCache, SharedPatternCache},
    sanitize::{DesiredType, InputValue, Predicate},
    style::{Style, apply_style},
    terminal::{InputError, Terminal},
};
use std::{error::Error, fmt::Display, sync::Arc};

pub const DEFAULT_ERROR_MESSAGE: &str = "Invalid input. Please try again.";
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Problems found while building an [`InputConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyPrompt,
    LengthBounds { min: usize, max: usize },
    InvalidPattern { pattern: String, reason: String },
    EmptyChoices,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPrompt => write!(f, "prompt must be a non-empty string"),
            Self::LengthBounds { min, max } => write!(
                f,
                "min_length ({}) cannot be greater than max_length ({})",
                min, max
            ),
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern {}: {}", pattern, reason)
            }
            Self::EmptyChoices => write!(f, "choices must be a non-empty list"),
        }
    }
}

impl Error for ConfigError {}

/// An immutable, validated input request.
#[derive(Clone)]
pub struct InputConfig {
    prompt: String,
    default: Option<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    allow_empty: bool,
    target: DesiredType,
    pattern: Option<String>,
    choices: Option<Vec<String>>,
    is_password: bool,
    prompt_style: Vec<Style>,
    input_style: Vec<Style>,
    error_style: Vec<Style>,
    error_message: String,
    custom_validator: Option<Predicate>,
    max_attempts: usize,
    pattern_cache: SharedPatternCache,
    styled_prompt: String,
}

impl std::fmt::Debug for InputConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputConfig")
            .field("prompt", &self.prompt)
            .field("default", &self.default)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("allow_empty", &self.allow_empty)
            .field("target", &self.target)
            .field("pattern", &self.pattern)
            .field("choices", &self.choices)
            .field("is_password", &self.is_password)
            .field("error_message", &self.error_message)
            .field("custom_validator", &self.custom_validator.is_some())
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl InputConfig {
    pub fn builder(prompt: impl Into<String>) -> InputConfigBuilder {
        InputConfigBuilder::new(prompt)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn allow_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn target(&self) -> &DesiredType {
        &self.target
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    pub fn is_password(&self) -> bool {
        self.is_password
    }

    pub fn prompt_style(&self) -> &[Style] {
        &self.prompt_style
    }

    pub fn input_style(&self) -> &[Style] {
        &self.input_style
    }

    pub fn error_style(&self) -> &[Style] {
        &self.error_style
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn custom_validator(&self) -> Option<&Predicate> {
        self.custom_validator.as_ref()
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn pattern_cache(&self) -> &SharedPatternCache {
        &self.pattern_cache
    }

    /// `"<prompt> [<default>]: "` wrapped in the prompt styles.
    pub fn styled_prompt(&self) -> &str {
        &self.styled_prompt
    }

    /// The error message wrapped in the error styles.
    pub fn styled_error(&self) -> String {
        apply_style(&self.error_message, &self.error_style)
    }
}

/// Collects the options of an [`InputConfig`].
pub struct InputConfigBuilder {
    prompt: String,
    default: Option<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    allow_empty: bool,
    target: DesiredType,
    pattern: Option<String>,
    choices: Option<Vec<String>>,
    is_password: bool,
    prompt_style: Option<Vec<Style>>,
    input_style: Option<Vec<Style>>,
    error_style: Option<Vec<Style>>,
    error_message: Option<String>,
    custom_validator: Option<Predicate>,
    max_attempts: usize,
    pattern_cache: Option<SharedPatternCache>,
}

impl InputConfigBuilder {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            default: None,
            min_length: None,
            max_length: None,
            allow_empty: true,
            target: DesiredType::String,
            pattern: None,
            choices: None,
            is_password: false,
            prompt_style: None,
            input_style: None,
            error_style: None,
            error_message: None,
            custom_validator: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            pattern_cache: None,
        }
    }

    /// Substituted when the user submits an empty line.
    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Also caps how many characters the editor accepts.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    pub fn target(mut self, target: DesiredType) -> Self {
        self.target = target;
        self
    }

    /// Matched from the first character; add `$` to anchor the end.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn password(mut self, is_password: bool) -> Self {
        self.is_password = is_password;
        self
    }

    /// Replaces the default styling. An empty list means an unstyled prompt.
    pub fn prompt_style(mut self, styles: impl Into<Vec<Style>>) -> Self {
        self.prompt_style = Some(styles.into());
        self
    }

    pub fn input_style(mut self, styles: impl Into<Vec<Style>>) -> Self {
        self.input_style = Some(styles.into());
        self
    }

    pub fn error_style(mut self, styles: impl Into<Vec<Style>>) -> Self {
        self.error_style = Some(styles.into());
        self
    }

    /// An empty message keeps the default one.
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn custom_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.custom_validator = Some(Arc::new(validator));
        self
    }

    /// Attempt ceiling for the line-based fallback used without a terminal.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn pattern_cache(mut self, cache: SharedPatternCache) -> Self {
        self.pattern_cache = Some(cache);
        self
    }

    /// Checks the options and freezes them into an [`InputConfig`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty prompt, inverted length bounds, a pattern
    /// that does not compile or an empty choice list.
    pub fn build(self) -> Result<InputConfig, ConfigError> {
        if self.prompt.is_empty() {
            return Err(ConfigError::EmptyPrompt);
        }

        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(ConfigError::LengthBounds { min, max });
            }
        }

        if self.choices.as_ref().is_some_and(|c| c.is_empty()) {
            return Err(ConfigError::EmptyChoices);
        }

        let pattern_cache = self.pattern_cache.unwrap_or_else(PatternCache::shared);
        if let Some(pattern) = &self.pattern {
            pattern_cache
                .lock()
                .get_or_compile(pattern)
                .map_err(|e| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
        }

        let prompt_style = self.prompt_style.unwrap_or_else(|| vec![Style::GREEN]);
        let input_style = self.input_style.unwrap_or_else(|| vec![Style::CYAN]);
        let error_style = self.error_style.unwrap_or_else(|| vec![Style::RED]);

        let display_prompt = match &self.default {
            Some(default) => format!("{} [{}]: ", self.prompt, default),
            None => format!("{}: ", self.prompt),
        };
        let styled_prompt = apply_style(&display_prompt, &prompt_style);

        Ok(InputConfig {
            prompt: self.prompt,
            default: self.default,
            min_length: self.min_length,
            max_length: self.max_length,
            allow_empty: self.allow_empty,
            target: self.target,
            pattern: self.pattern,
            choices: self.choices,
            is_password: self.is_password,
            prompt_style,
            input_style,
            error_style,
            error_message: self
                .error_message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            custom_validator: self.custom_validator,
            max_attempts: self.max_attempts,
            pattern_cache,
            styled_prompt,
        })
    }

    /// Builds the config and asks for it on the terminal.
    ///
    /// # Errors
    ///
    /// See [`Terminal::ask`].
    pub fn ask(self) -> Result<InputValue, InputError> {
        let config = self.build()?;
        Terminal::ask(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InputConfig::builder("Name").build().unwrap();
        assert!(config.allow_empty());
        assert!(!config.is_password());
        assert!(matches!(config.target(), DesiredType::String));
        assert_eq!(config.error_message(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(config.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.input_style(), &[Style::CYAN]);
        assert_eq!(config.error_style(), &[Style::RED]);
    }

    #[test]
    fn test_styled_prompt_without_default() {
        let config = InputConfig::builder("Name").build().unwrap();
        assert_eq!(config.styled_prompt(), "\x1b[32mName: \x1b[0m");
    }

    #[test]
    fn test_styled_prompt_with_default_and_style() {
        let config = InputConfig::builder("Port")
            .default("8080")
            .prompt_style([Style::CYAN, Style::BOLD])
            .build()
            .unwrap();
        assert_eq!(config.styled_prompt(), "\x1b[36m\x1b[1mPort [8080]: \x1b[0m");
    }

    #[test]
    fn test_empty_style_list_leaves_prompt_plain() {
        let config = InputConfig::builder("Plain")
            .prompt_style(Vec::new())
            .build()
            .unwrap();
        assert_eq!(config.styled_prompt(), "Plain: ");
    }

    #[test]
    fn test_empty_error_message_keeps_default() {
        let config = InputConfig::builder("Name")
            .error_message("")
            .error_style(Vec::new())
            .build()
            .unwrap();
        assert_eq!(config.error_message(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(config.styled_error(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let err = InputConfig::builder("").build().unwrap_err();
        assert_eq!(err, ConfigError::EmptyPrompt);
    }

    #[test]
    fn test_length_bounds() {
        assert!(
            InputConfig::builder("x")
                .min_length(3)
                .max_length(3)
                .build()
                .is_ok()
        );
        let err = InputConfig::builder("x")
            .min_length(4)
            .max_length(3)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "min_length (4) cannot be greater than max_length (3)");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let cache = PatternCache::new_shared();
        let err = InputConfig::builder("x")
            .pattern("([a-z]")
            .pattern_cache(cache.clone())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        assert!(cache.lock().is_empty());
    }

    #[test]
    fn test_valid_pattern_warms_cache() {
        let cache = PatternCache::new_shared();
        InputConfig::builder("x")
            .pattern("^[a-z]+$")
            .pattern_cache(cache.clone())
            .build()
            .unwrap();
        assert!(cache.lock().contains("^[a-z]+$"));
    }

    #[test]
    fn test_empty_choices_rejected() {
        let err = InputConfig::builder("x")
            .choices(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyChoices);
    }

    #[test]
    fn test_styled_error() {
        let config = InputConfig::builder("x")
            .error_message("nope")
            .error_style([Style::YELLOW])
            .build()
            .unwrap();
        assert_eq!(config.styled_error(), "\x1b[33mnope\x1b[0m");
    }
}
