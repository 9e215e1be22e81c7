//! Run domain: the run clock and `M:SS.mmm` time formatting.

/// Start and final timestamps for one run, in milliseconds of virtual time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunClock {
    start_ms: Option<f64>,
    final_ms: Option<f64>,
}

impl RunClock {
    pub fn start_ms(&self) -> Option<f64> {
        self.start_ms
    }

    pub fn final_ms(&self) -> Option<f64> {
        self.final_ms
    }

    /// Record the start time. Returns false if the clock was already started.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.start_ms.is_some() {
            return false;
        }
        self.start_ms = Some(now_ms);
        true
    }

    /// Whether a usable start time has been recorded.
    pub fn has_valid_start(&self) -> bool {
        self.start_ms.is_some_and(|start| start >= 0.0)
    }

    /// Time since start, while the clock is running.
    pub fn elapsed_ms(&self, now_ms: f64) -> Option<f64> {
        if self.final_ms.is_some() {
            return None;
        }
        self.start_ms.map(|start| now_ms - start)
    }

    /// Freeze the final time. Only the first call has an effect.
    pub fn freeze(&mut self, now_ms: f64) -> Option<f64> {
        if self.final_ms.is_some() || !self.has_valid_start() {
            return None;
        }
        let final_ms = now_ms - self.start_ms?;
        self.final_ms = Some(final_ms);
        Some(final_ms)
    }
}

/// Error returned when a displayed time cannot be parsed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockParseError {
    pub input: String,
    pub reason: &'static str,
}

impl std::fmt::Display for ClockParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid time '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for ClockParseError {}

/// Format milliseconds as `M:SS.mmm`. Negative values show as zero and
/// fractions of a millisecond are dropped.
pub fn format_time_ms(ms: f64) -> String {
    let clamped = if ms.is_finite() { ms.max(0.0).floor() as u64 } else { 0 };
    let minutes = clamped / 60_000;
    let seconds = (clamped % 60_000) / 1000;
    let millis = clamped % 1000;

    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}

/// Parse a `M:SS.mmm` string produced by [`format_time_ms`].
pub fn parse_time_ms(text: &str) -> Result<u64, ClockParseError> {
    let err = |reason| ClockParseError {
        input: text.to_string(),
        reason,
    };

    let (minutes, rest) = text.split_once(':').ok_or_else(|| err("missing ':'"))?;
    let (seconds, millis) = rest.split_once('.').ok_or_else(|| err("missing '.'"))?;

    if seconds.len() != 2 || millis.len() != 3 {
        return Err(err("expected SS.mmm"));
    }
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(minutes) || !all_digits(seconds) || !all_digits(millis) {
        return Err(err("non-digit characters"));
    }

    let minutes: u64 = minutes.parse().map_err(|_| err("minutes out of range"))?;
    let seconds: u64 = seconds.parse().map_err(|_| err("bad seconds"))?;
    let millis: u64 = millis.parse().map_err(|_| err("bad milliseconds"))?;

    if seconds >= 60 {
        return Err(err("seconds must be below 60"));
    }

    minutes
        .checked_mul(60_000)
        .and_then(|m| m.checked_add(seconds * 1000 + millis))
        .ok_or_else(|| err("minutes out of range"))
}
