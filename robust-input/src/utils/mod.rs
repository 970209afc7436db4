pub mod style;
pub use style::{Style, apply_style};

pub mod pattern_cache;
pub use pattern_cache::{PatternCache, SharedPatternCache};

pub mod sanitize;
pub use sanitize::{
    CastError, CustomType, DesiredType, InputValue, Predicate, Rejection, Sanitize, Validated,
    ValidatorChain, parse_bool_token,
};

pub mod config;
pub use config::{ConfigError, InputConfig, InputConfigBuilder};

pub mod ip;
pub use ip::{is_hostname, is_ipv4_dotted_quad};

pub mod editor;
pub use editor::{EditBuffer, KeySource, LineEditor};

pub mod console;
pub use console::{ConsoleKeys, ConsoleRawMode};

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        pub mod raw_mode;
        pub use raw_mode::{RawMode, StdinKeys};
    }
}

pub mod fallback;
pub use fallback::NonTerminalFallback;

pub mod terminal;
pub use terminal::{
    InputError, Terminal, choice_config, get_choice, get_input, get_integer, get_ip_address,
    get_password, integer_config, ip_address_config, password_config,
};
