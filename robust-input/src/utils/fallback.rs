//! # Line-based fallback
//!
//! Used when stdin is not an interactive terminal (piped input, CI, redirected files).
//! Whole lines are read instead of keystrokes, the same [`ValidatorChain`] decides, and
//! the number of attempts is capped so a script feeding bad data cannot loop forever.
use crate::utils::{
    config::InputConfig,
    sanitize::{InputValue, ValidatorChain},
    terminal::InputError,
};
use std::io::{self, BufRead, Write};

pub struct NonTerminalFallback<'a, R, W> {
    config: &'a InputConfig,
    chain: &'a ValidatorChain,
    reader: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> NonTerminalFallback<'a, R, W> {
    pub fn new(config: &'a InputConfig, chain: &'a ValidatorChain, reader: R, out: W) -> Self {
        Self {
            config,
            chain,
            reader,
            out,
        }
    }

    /// Prompts line by line until a line is accepted.
    ///
    /// # Errors
    ///
    /// - [`InputError::AttemptsExhausted`] after `max_attempts` rejected lines
    /// - [`InputError::DefaultRejected`] when input ends and the default does not validate
    /// - [`InputError::EndOfInput`] when input ends without a default
    /// - [`InputError::Interrupted`] when the read is interrupted
    pub fn run(&mut self, max_attempts: usize) -> Result<InputValue, InputError> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            if attempts > max_attempts {
                tracing::debug!(max_attempts, "fallback attempts exhausted");
                return Err(InputError::AttemptsExhausted(max_attempts));
            }

            let Some(line) = self.read_line()? else {
                return self.end_of_input();
            };

            let candidate = match self.config.default_value() {
                Some(default) if line.is_empty() => default.to_string(),
                _ => line,
            };

            match self.chain.accept(&candidate) {
                Some(validated) => return Ok(validated.cast()?),
                None => {
                    tracing::debug!(attempt = attempts, "fallback input rejected");
                    self.show_error()?;
                }
            }
        }
    }

    /// `Ok(None)` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, InputError> {
        if self.config.is_password() {
            write!(self.out, "{}: ", self.config.prompt())?;
        } else {
            self.out.write_all(self.config.styled_prompt().as_bytes())?;
        }
        self.out.flush()?;

        let Some(mut line) = self.next_line()? else {
            return Ok(None);
        };
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        if self.config.is_password() {
            // Nothing was echoed, so end the prompt line ourselves.
            self.out.write_all(b"\n")?;
        }
        Ok(Some(line))
    }

    /// One line including its terminator. `BufRead::read_line` retries on
    /// `ErrorKind::Interrupted`, so the buffer is walked by hand to surface it.
    fn next_line(&mut self) -> Result<Option<String>, InputError> {
        let mut bytes = Vec::new();

        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    tracing::debug!("fallback read interrupted");
                    return Err(InputError::Interrupted);
                }
                Err(e) => return Err(e.into()),
            };
            if available.is_empty() {
                break;
            }

            match available.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    bytes.extend_from_slice(&available[..=i]);
                    self.reader.consume(i + 1);
                    break;
                }
                None => {
                    let n = available.len();
                    bytes.extend_from_slice(available);
                    self.reader.consume(n);
                }
            }
        }

        if bytes.is_empty() {
            return Ok(None);
        }
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    fn end_of_input(&mut self) -> Result<InputValue, InputError> {
        let Some(default) = self.config.default_value() else {
            return Err(InputError::EndOfInput);
        };

        match self.chain.accept(default) {
            Some(validated) => Ok(validated.cast()?),
            None => Err(InputError::DefaultRejected(default.to_string())),
        }
    }

    fn show_error(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x1b[K")?;
        self.out.write_all(self.config.styled_error().as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{DesiredType, pattern_cache::PatternCache};
    use std::io::Cursor;

    fn run(config: &InputConfig, input: &str) -> (Result<InputValue, InputError>, String) {
        let chain = ValidatorChain::from_config(config);
        let mut out = Vec::new();
        let result = NonTerminalFallback::new(config, &chain, Cursor::new(input), &mut out)
            .run(config.max_attempts());
        (result, String::from_utf8_lossy(&out).into_owned())
    }

    fn plain(prompt: &str) -> crate::utils::InputConfigBuilder {
        InputConfig::builder(prompt)
            .prompt_style(Vec::new())
            .error_style(Vec::new())
            .pattern_cache(PatternCache::new_shared())
    }

    #[test]
    fn test_accepts_first_valid_line() {
        let config = plain("Count").target(DesiredType::Int).build().unwrap();
        let (result, out) = run(&config, "nope\n12\n");
        assert_eq!(result.unwrap(), InputValue::Int(12));
        assert_eq!(out.matches("Count: ").count(), 2);
        assert!(out.contains("Invalid input. Please try again."));
    }

    #[test]
    fn test_crlf_is_stripped() {
        let config = plain("Name").build().unwrap();
        let (result, _) = run(&config, "alice\r\n");
        assert_eq!(result.unwrap(), InputValue::String("alice".into()));
    }

    #[test]
    fn test_empty_line_uses_default() {
        let config = plain("Ssl")
            .target(DesiredType::Bool)
            .default("no")
            .build()
            .unwrap();
        let (result, _) = run(&config, "\n");
        assert_eq!(result.unwrap(), InputValue::Bool(false));
    }

    #[test]
    fn test_attempts_exhausted() {
        let config = plain("Count")
            .target(DesiredType::Int)
            .max_attempts(3)
            .build()
            .unwrap();
        let (result, out) = run(&config, "a\nb\nc\nd\n");
        assert!(matches!(result, Err(InputError::AttemptsExhausted(3))));
        assert_eq!(out.matches("Invalid input").count(), 3);
    }

    #[test]
    fn test_eof_without_default() {
        let config = plain("Name").build().unwrap();
        let (result, _) = run(&config, "");
        assert!(matches!(result, Err(InputError::EndOfInput)));
    }

    #[test]
    fn test_eof_with_valid_default() {
        let config = plain("Port")
            .target(DesiredType::Int)
            .default("8080")
            .build()
            .unwrap();
        let (result, _) = run(&config, "oops\n");
        assert_eq!(result.unwrap(), InputValue::Int(8080));
    }

    #[test]
    fn test_eof_with_invalid_default() {
        let config = plain("Port")
            .target(DesiredType::Int)
            .default("eighty")
            .build()
            .unwrap();
        let (result, _) = run(&config, "");
        match result {
            Err(InputError::DefaultRejected(default)) => assert_eq!(default, "eighty"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_password_prompt_is_plain_and_not_echoed() {
        let config = InputConfig::builder("Password")
            .password(true)
            .allow_empty(false)
            .pattern_cache(PatternCache::new_shared())
            .build()
            .unwrap();
        let (result, out) = run(&config, "s3cret\n");
        assert_eq!(result.unwrap(), InputValue::String("s3cret".into()));
        assert!(out.starts_with("Password: "));
        assert!(!out.contains("s3cret"));
    }

    /// Fails the first `fill_buf` with `ErrorKind::Interrupted`, then serves `data`.
    struct InterruptedOnce {
        interrupted: bool,
        data: Cursor<&'static [u8]>,
    }

    impl io::Read for InterruptedOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            io::Read::read(&mut self.data, buf)
        }
    }

    impl BufRead for InterruptedOnce {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.data.fill_buf()
        }

        fn consume(&mut self, amount: usize) {
            self.data.consume(amount);
        }
    }

    #[test]
    fn test_interrupted_read_stops_the_prompt() {
        let config = plain("Name").build().unwrap();
        let chain = ValidatorChain::from_config(&config);
        let reader = InterruptedOnce {
            interrupted: false,
            data: Cursor::new(&b"bob\n"[..]),
        };
        let mut out = Vec::new();
        let result = NonTerminalFallback::new(&config, &chain, reader, &mut out).run(10);
        assert!(matches!(result, Err(InputError::Interrupted)));
    }

    #[test]
    fn test_last_line_without_newline() {
        let config = plain("Name").build().unwrap();
        let (result, _) = run(&config, "carol");
        assert_eq!(result.unwrap(), InputValue::String("carol".into()));
    }

    #[test]
    fn test_invalid_utf8_is_an_io_error() {
        let config = plain("Name").build().unwrap();
        let chain = ValidatorChain::from_config(&config);
        let mut out = Vec::new();
        let result = NonTerminalFallback::new(&config, &chain, &b"\xff\xfe\n"[..], &mut out)
            .run(10);
        assert!(matches!(result, Err(InputError::Io(e)) if e.kind() == io::ErrorKind::InvalidData));
    }

    #[test]
    fn test_empty_line_rejected_without_default() {
        let config = plain("Name").allow_empty(false).max_attempts(2).build().unwrap();
        let (result, _) = run(&config, "\n\n\n");
        assert!(matches!(result, Err(InputError::AttemptsExhausted(2))));
    }
}
