//! # Input Sanitization & Validation
//!
//! This module holds the validation pipeline that every submitted line goes through
//! before it is handed back to the caller. A [`ValidatorChain`] is compiled once from an
//! [`InputConfig`] and runs its filters ([`Sanitize`]) in a fixed order, stopping at the
//! first one that rejects the candidate:
//!
//! 1. empty check (unless empty input is allowed)
//! 2. [`Sanitize::IsLength`]
//! 3. [`Sanitize::IsType`]
//! 4. [`Sanitize::MatchPattern`]
//! 5. [`Sanitize::MatchStrings`]
//! 6. [`Sanitize::Custom`]
//!
//! Accepted candidates come back as a [`Validated`] token which is the in-order way of
//! turning text into an [`InputValue`].
//!
//! ## Examples
//!
//! ```rust
//! use robust_input::utils::{DesiredType, InputConfig, InputValue, ValidatorChain};
//!
//! let config = InputConfig::builder("Retries")
//!     .target(DesiredType::Int)
//!     .max_length(2)
//!     .build()
//!     .unwrap();
//! let chain = ValidatorChain::from_config(&config);
//!
//! assert!(!chain.validate("abc"));
//! assert!(!chain.validate("100"));
//!
//! let value = chain.accept("42").unwrap().cast().unwrap();
//! assert_eq!(value, InputValue::Int(42));
//! ```
use crate::utils::config::InputConfig;
use regex::Regex;
use std::{
    any::Any,
    error::Error,
    fmt::{Debug, Display},
    sync::Arc,
};

/// A caller supplied check. Its answer is final.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

type Constructor = Arc<dyn Fn(&str) -> Result<Box<dyn Any + Send>, String> + Send + Sync>;

const TRUTHY: [&str; 5] = ["true", "yes", "t", "y", "1"];
const FALSY: [&str; 5] = ["false", "no", "f", "n", "0"];

/// Maps a boolean token to its value, ignoring case.
/// Validation and casting both go through this table.
pub fn parse_bool_token(input: &str) -> Option<bool> {
    let lower = input.to_ascii_lowercase();
    if TRUTHY.contains(&lower.as_str()) {
        Some(true)
    } else if FALSY.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Yields `true` when `$input` parses into `$t`.
macro_rules! parses_as {
    ($input:expr, $t:ty) => {
        $input.parse::<$t>().is_ok()
    };
}

/// The type a validated candidate is converted into.
#[derive(Clone, Default)]
pub enum DesiredType {
    #[default]
    String,
    Bool,
    Int,
    Float,
    Custom(CustomType),
}

/// A user-defined target type: a name for messages and a string constructor.
#[derive(Clone)]
pub struct CustomType {
    name: String,
    construct: Constructor,
}

impl CustomType {
    pub fn new<F, T>(name: impl Into<String>, construct: F) -> Self
    where
        F: Fn(&str) -> Result<T, String> + Send + Sync + 'static,
        T: Any + Send,
    {
        Self {
            name: name.into(),
            construct: Arc::new(move |input: &str| {
                construct(input).map(|value| Box::new(value) as Box<dyn Any + Send>)
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl DesiredType {
    /// A custom target built from any [`std::str::FromStr`] type.
    ///
    /// ```rust
    /// use std::net::SocketAddr;
    /// use robust_input::utils::DesiredType;
    ///
    /// let target = DesiredType::from_str_type::<SocketAddr>("socket address");
    /// assert!(target.cast("127.0.0.1:80").is_ok());
    /// ```
    pub fn from_str_type<T>(name: impl Into<String>) -> Self
    where
        T: std::str::FromStr + Any + Send,
        T::Err: Display,
    {
        DesiredType::Custom(CustomType::new(name, |input: &str| {
            input.parse::<T>().map_err(|e| e.to_string())
        }))
    }

    fn accepts(&self, input: &str) -> bool {
        if input.is_empty() && !matches!(self, DesiredType::String) {
            return false;
        }

        match self {
            DesiredType::String => true,
            DesiredType::Bool => parse_bool_token(input).is_some(),
            DesiredType::Int => parses_as!(input, i64),
            DesiredType::Float => parses_as!(input, f64),
            DesiredType::Custom(custom) => (custom.construct)(input).is_ok(),
        }
    }

    /// Converts `input` into the target type.
    ///
    /// Meant for candidates that already passed validation; anything else comes back as
    /// a [`CastError`].
    pub fn cast(&self, input: &str) -> Result<InputValue, CastError> {
        let fail = || CastError {
            input: input.to_string(),
            target: self.to_string(),
        };

        match self {
            DesiredType::String => Ok(InputValue::String(input.to_string())),
            DesiredType::Bool => parse_bool_token(input).map(InputValue::Bool).ok_or_else(fail),
            DesiredType::Int => input.parse().map(InputValue::Int).map_err(|_| fail()),
            DesiredType::Float => input.parse().map(InputValue::Float).map_err(|_| fail()),
            DesiredType::Custom(custom) => (custom.construct)(input)
                .map(InputValue::Custom)
                .map_err(|_| fail()),
        }
    }
}

impl Display for DesiredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Custom(custom) => write!(f, "{}", custom.name),
        }
    }
}

impl Debug for DesiredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(custom) => f.debug_tuple("Custom").field(&custom.name).finish(),
            other => write!(f, "{}", other),
        }
    }
}

/// A typed result of a successful prompt.
pub enum InputValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Custom(Box<dyn Any + Send>),
}

impl InputValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InputValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InputValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            InputValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            InputValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            InputValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Unboxes a [`DesiredType::Custom`] result.
    pub fn into_custom<T: Any>(self) -> Option<T> {
        match self {
            InputValue::Custom(boxed) => boxed.downcast::<T>().ok().map(|value| *value),
            _ => None,
        }
    }
}

impl Debug for InputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Custom values are opaque and never compare equal.
impl PartialEq for InputValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            _ => false,
        }
    }
}

/// Raised when a candidate cannot be converted into its target type.
#[derive(Debug)]
pub struct CastError {
    pub input: String,
    pub target: String,
}

impl Display for CastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot convert '{}' to {}", self.input, self.target)
    }
}

impl Error for CastError {}

/// A single validation filter.
///
/// - `IsLength`: the character count lies within the given bounds.
/// - `IsType`: the input can be converted into a [`DesiredType`].
/// - `MatchPattern`: the regex matches starting at the first character. `None` marks a
///   pattern that failed to compile and never matches.
/// - `MatchStrings`: the input is one of the given options.
/// - `Custom`: a caller supplied predicate.
#[derive(Clone)]
pub enum Sanitize {
    IsLength {
        min: Option<usize>,
        max: Option<usize>,
    },
    IsType(DesiredType),
    MatchPattern {
        source: String,
        regex: Option<Regex>,
    },
    MatchStrings(Vec<String>),
    Custom(Predicate),
}

impl Debug for Sanitize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IsLength { min, max } => f
                .debug_struct("IsLength")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::IsType(t) => f.debug_tuple("IsType").field(t).finish(),
            Self::MatchPattern { source, .. } => {
                f.debug_tuple("MatchPattern").field(source).finish()
            }
            Self::MatchStrings(v) => f.debug_tuple("MatchStrings").field(v).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Any type that implements this can check a candidate and explain a rejection.
trait Validate {
    fn validate(&self, input: &str) -> Result<(), Rejection>;
}

impl Validate for Sanitize {
    fn validate(&self, input: &str) -> Result<(), Rejection> {
        match self {
            Sanitize::IsLength { min, max } => {
                let len = input.chars().count();
                let too_short = min.is_some_and(|min| len < min);
                let too_long = max.is_some_and(|max| len > max);
                if too_short || too_long {
                    Err(Rejection::Length {
                        min: *min,
                        max: *max,
                    })
                } else {
                    Ok(())
                }
            }
            Sanitize::IsType(ty) => {
                if ty.accepts(input) {
                    Ok(())
                } else {
                    Err(Rejection::Type(ty.to_string()))
                }
            }
            Sanitize::MatchPattern { source, regex } => {
                let matched = regex
                    .as_ref()
                    .and_then(|r| r.find(input))
                    .is_some_and(|m| m.start() == 0);
                if matched {
                    Ok(())
                } else {
                    Err(Rejection::Pattern(source.clone()))
                }
            }
            Sanitize::MatchStrings(options) => {
                if options.iter().any(|option| option == input) {
                    Ok(())
                } else {
                    Err(Rejection::Choices(options.clone()))
                }
            }
            Sanitize::Custom(predicate) => {
                if predicate(input) {
                    Ok(())
                } else {
                    Err(Rejection::Custom)
                }
            }
        }
    }
}

/// Why a candidate was turned down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    Type(String),
    Pattern(String),
    Choices(Vec<String>),
    Custom,
}

impl Rejection {
    /// Short name of the failing check, used in log records.
    pub fn check(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Length { .. } => "length",
            Self::Type(_) => "type",
            Self::Pattern(_) => "pattern",
            Self::Choices(_) => "choices",
            Self::Custom => "custom",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "The value is empty, try again!"),
            Self::Length { min, max } => match (min, max) {
                (Some(min), Some(max)) => write!(
                    f,
                    "The value length is not between {} and {}, try again!",
                    min, max
                ),
                (Some(min), None) => {
                    write!(f, "The value is shorter than {}, try again!", min)
                }
                (None, Some(max)) => write!(f, "The value is longer than {}, try again!", max),
                (None, None) => write!(f, "The value length is invalid, try again!"),
            },
            Self::Type(t) => write!(f, "The value is not a {}, try again!", t),
            Self::Pattern(p) => write!(f, "The value doesn't match the pattern {}, try again!", p),
            Self::Choices(v) => write!(
                f,
                "The value doesn't match with the options: {}, try again!",
                v.join(", ")
            ),
            Self::Custom => write!(f, "The value was refused by the custom validator, try again!"),
        }
    }
}

impl Error for Rejection {}

/// The ordered set of checks a candidate must pass.
#[derive(Debug, Clone)]
pub struct ValidatorChain {
    allow_empty: bool,
    filters: Vec<Sanitize>,
    target: DesiredType,
}

impl ValidatorChain {
    /// Compiles the chain for a config. Patterns go through the config's cache.
    pub fn from_config(config: &InputConfig) -> Self {
        let mut filters = Vec::new();

        if config.min_length().is_some() || config.max_length().is_some() {
            filters.push(Sanitize::IsLength {
                min: config.min_length(),
                max: config.max_length(),
            });
        }

        filters.push(Sanitize::IsType(config.target().clone()));

        if let Some(pattern) = config.pattern() {
            let regex = config.pattern_cache().lock().get_or_compile(pattern).ok();
            filters.push(Sanitize::MatchPattern {
                source: pattern.to_string(),
                regex,
            });
        }

        if let Some(choices) = config.choices() {
            filters.push(Sanitize::MatchStrings(choices.to_vec()));
        }

        if let Some(predicate) = config.custom_validator() {
            filters.push(Sanitize::Custom(Arc::clone(predicate)));
        }

        Self {
            allow_empty: config.allow_empty(),
            filters,
            target: config.target().clone(),
        }
    }

    /// Builds a chain out of hand-picked filters.
    pub fn new(allow_empty: bool, target: DesiredType, filters: Vec<Sanitize>) -> Self {
        Self {
            allow_empty,
            filters,
            target,
        }
    }

    /// Runs every filter, stopping at the first rejection.
    pub fn check(&self, candidate: &str) -> Result<(), Rejection> {
        if !self.allow_empty && candidate.is_empty() {
            return Err(Rejection::Empty);
        }

        for filter in &self.filters {
            filter.validate(candidate)?;
        }
        Ok(())
    }

    pub fn validate(&self, candidate: &str) -> bool {
        self.check(candidate).is_ok()
    }

    /// Hands out a [`Validated`] token for candidates that pass.
    pub fn accept(&self, candidate: &str) -> Option<Validated<'_>> {
        match self.check(candidate) {
            Ok(()) => Some(Validated {
                candidate: candidate.to_string(),
                target: &self.target,
            }),
            Err(rejection) => {
                tracing::debug!(check = rejection.check(), "candidate rejected");
                None
            }
        }
    }

    pub fn filters(&self) -> &[Sanitize] {
        &self.filters
    }

    pub fn target(&self) -> &DesiredType {
        &self.target
    }
}

/// A candidate that passed its chain and is ready to be cast.
#[derive(Debug)]
pub struct Validated<'c> {
    candidate: String,
    target: &'c DesiredType,
}

impl Validated<'_> {
    pub fn as_str(&self) -> &str {
        &self.candidate
    }

    pub fn cast(self) -> Result<InputValue, CastError> {
        self.target.cast(&self.candidate)
    }
}
