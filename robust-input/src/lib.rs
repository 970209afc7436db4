//! # Robust Input
//!
//! A Rust library for asking users things on the command line and getting back values
//! you can trust: an in-place line editor running in raw terminal mode, a composable
//! validation chain, and conversion into typed results.
//!
//! ## Features
//!
//! - **Line editing** - Cursor movement with arrow keys, Home/End, Backspace, inserting in
//!   the middle of the line
//! - **Validation chain** - Length, type, regex pattern, allowed choices and custom
//!   predicates, evaluated in a fixed order
//! - **Typed results** - Strings, booleans, integers, floats or any `FromStr` type
//! - **Password masking** - Input echoed as `*`
//! - **Styling** - Opaque ANSI style tokens for the prompt, the typed text and errors
//! - **Non-terminal fallback** - Piped input is read line by line with a bounded number of
//!   attempts
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! robust-input = "0.1"
//! ```
//!
//! ## Usage Examples
//!
//! ### Typed input with a default
//!
//! ```rust,no_run
//! use robust_input::utils::{DesiredType, InputConfig, Style};
//!
//! let port = InputConfig::builder("Port Number")
//!     .target(DesiredType::Int)
//!     .default("8080")
//!     .custom_validator(|s| s.parse::<u16>().is_ok_and(|p| p >= 1024))
//!     .prompt_style([Style::CYAN, Style::BOLD])
//!     .error_message("Port must be between 1024-65535")
//!     .ask()
//!     .unwrap();
//!
//! println!("Port: {:?}", port.as_int());
//! ```
//!
//! ### Ready-made prompts
//!
//! ```rust,no_run
//! use robust_input::utils::{get_integer, get_ip_address, get_password};
//!
//! let threads = get_integer("Worker threads", Some(4), Some(1), Some(64)).unwrap();
//! let address = get_ip_address("Bind address", Some("127.0.0.1")).unwrap();
//! let secret = get_password("Admin password").unwrap();
//! # let _ = (threads, address, secret);
//! ```
//!
//! ### Validating without a terminal
//!
//! ```rust
//! use robust_input::utils::{InputConfig, ValidatorChain};
//!
//! let config = InputConfig::builder("Hostname")
//!     .pattern(r"^[a-zA-Z0-9.-]+$")
//!     .min_length(3)
//!     .build()
//!     .unwrap();
//! let chain = ValidatorChain::from_config(&config);
//!
//! assert!(chain.validate("localhost"));
//! assert!(!chain.validate("no spaces"));
//! ```
//!
//! ## Architecture
//!
//! - **`utils::config`** - [`utils::InputConfig`] and its builder
//! - **`utils::sanitize`** - Validation filters, target types and casting
//! - **`utils::editor`** - The keystroke state machine
//! - **`utils::raw_mode`** - Scoped raw mode and bounded-wait reads (unix)
//! - **`utils::console`** - The same through crossterm, for consoles without termios
//! - **`utils::fallback`** - Line-based input for pipes and redirected stdin
//! - **`utils::terminal`** - [`utils::Terminal::ask`] and the ready-made prompts
//!
//! ## Error Handling
//!
//! Configuration mistakes surface as [`utils::ConfigError`] before anything is printed.
//! Rejected answers are handled inside the prompt loop. Everything else ends the request
//! with an [`utils::InputError`]:
//!
//! ```rust,no_run
//! use robust_input::utils::{InputConfig, InputError};
//!
//! match InputConfig::builder("Name").allow_empty(false).ask() {
//!     Ok(name) => println!("Hello {:?}", name.as_str()),
//!     Err(InputError::Interrupted) => eprintln!("Cancelled"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! ## License
//!
//! This project is licensed under the MIT License.

pub mod utils;
