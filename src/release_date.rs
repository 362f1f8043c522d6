//! Release date resolution
//!
//! Resolves the timestamp stamped into the descriptor. The operator is
//! prompted for a `DD.MM.YYYY hh:mm` date unless the configuration skips the
//! prompt; an empty answer means "now". Malformed answers are reported and
//! the prompt repeats until a valid date or an empty line arrives.
//!
//! The two sources produce different precisions: the current time carries
//! two fractional-second digits, an entered date carries three. Existing
//! descriptor consumers depend on both shapes.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use regex_lite::Regex;
use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

/// Prompt written before each read
pub const PROMPT: &str = "Enter Release date (DD.MM.YYYY hh:mm) :";

/// Accepted operator input format
pub const INPUT_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Exact shape of operator input; chrono alone accepts single digits,
/// signed years and arbitrary whitespace
const INPUT_PATTERN: &str = r"^\d{2}\.\d{2}\.\d{4} \d{2}:\d{2}$";

static INPUT_RE: OnceLock<Regex> = OnceLock::new();

/// Output format for an operator-entered date
pub const ENTERED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Resolver state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverState {
    Initial,
    AwaitingInput,
    Resolved(String),
}

/// Errors while resolving the release date
#[derive(Debug, thiserror::Error)]
pub enum ReleaseDateError {
    #[error("Console I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Input closed before a release date was entered")]
    InputClosed,
}

/// Why an operator line was rejected
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("expected DD.MM.YYYY hh:mm, got {0:?}")]
    Shape(String),

    #[error("{0}")]
    Calendar(#[from] chrono::ParseError),
}

/// Format an instant as `YYYY-MM-DDThh:mm:ss.ffZ`
///
/// The fraction is truncated, not rounded.
pub fn format_now(now: DateTime<Utc>) -> String {
    let centis = now.nanosecond() % 1_000_000_000 / 10_000_000;
    format!("{}.{:02}Z", now.format("%Y-%m-%dT%H:%M:%S"), centis)
}

/// Parse one operator line (line terminator already removed)
pub fn parse_entered(line: &str) -> Result<String, EntryError> {
    let shape = INPUT_RE.get_or_init(|| Regex::new(INPUT_PATTERN).expect("valid input pattern"));
    if !shape.is_match(line) {
        return Err(EntryError::Shape(line.to_string()));
    }
    let parsed = NaiveDateTime::parse_from_str(line, INPUT_FORMAT)?;
    Ok(parsed.and_utc().format(ENTERED_FORMAT).to_string())
}

/// Interactive release date resolver
#[derive(Debug)]
pub struct ReleaseDateResolver<C: Clock = SystemClock> {
    clock: C,
    state: ResolverState,
    attempts: u32,
}

impl ReleaseDateResolver<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ReleaseDateResolver<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ReleaseDateResolver<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            state: ResolverState::Initial,
            attempts: 0,
        }
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    /// Number of prompts shown so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Drive the state machine to `Resolved` and return the timestamp
    ///
    /// With `skip` set no prompt is written and `input` is never read.
    pub fn resolve<R, W>(
        &mut self,
        skip: bool,
        mut input: R,
        mut output: W,
    ) -> Result<String, ReleaseDateError>
    where
        R: BufRead,
        W: Write,
    {
        loop {
            match &self.state {
                ResolverState::Resolved(date) => return Ok(date.clone()),
                ResolverState::Initial => {
                    self.state = if skip {
                        tracing::debug!("release date prompt skipped");
                        ResolverState::Resolved(format_now(self.clock.now()))
                    } else {
                        ResolverState::AwaitingInput
                    };
                }
                ResolverState::AwaitingInput => {
                    self.state = self.prompt_once(&mut input, &mut output)?;
                }
            }
        }
    }

    fn prompt_once<R, W>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<ResolverState, ReleaseDateError>
    where
        R: BufRead,
        W: Write,
    {
        self.attempts += 1;
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ReleaseDateError::InputClosed);
        }
        let line = line.trim_end_matches(['\n', '\r']);

        if line.is_empty() {
            return Ok(ResolverState::Resolved(format_now(self.clock.now())));
        }

        match parse_entered(line) {
            Ok(date) => Ok(ResolverState::Resolved(date)),
            Err(e) => {
                tracing::warn!(input = line, "wrong date input: {}", e);
                Ok(ResolverState::AwaitingInput)
            }
        }
    }
}
