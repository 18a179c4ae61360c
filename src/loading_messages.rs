use rand::Rng;
use std::time::{Duration, Instant};

/// Copy shown under the spinner while insights load
pub const LOADING_MESSAGES: &[&str] = &[
    "Consulting the digital oracle...",
    "Gathering intelligence from the ether...",
    "Convincing the model to share its secrets...",
    "Reading the entire internet (briefly)...",
    "Connecting the dots...",
    "Brewing some fresh insights...",
    "Decoding the matrix...",
    "Asking the experts (virtual ones)...",
];

/// Spinner frames, one per tick
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_ASCII: &[&str] = &["|", "/", "-", "\\"];

/// Rotates loading messages on a fixed interval, never showing the same
/// message twice in a row
#[derive(Debug, Clone)]
pub struct LoadingTicker {
    interval: Duration,
    started: Option<Instant>,
    last_change: Option<Instant>,
    current: usize,
}

impl LoadingTicker {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs.max(1)),
            started: None,
            last_change: None,
            current: 0,
        }
    }

    /// Begin a loading period, picking a starting message
    pub fn start(&mut self, now: Instant) {
        self.current = rand::thread_rng().gen_range(0..LOADING_MESSAGES.len());
        self.started = Some(now);
        self.last_change = Some(now);
    }

    pub fn stop(&mut self) {
        self.started = None;
        self.last_change = None;
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Advance to another message once the interval has passed.
    /// Returns true when the message changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_change else {
            return false;
        };
        if now.duration_since(last) < self.interval {
            return false;
        }

        // A non-zero step never lands on the current message
        let step = rand::thread_rng().gen_range(1..LOADING_MESSAGES.len());
        self.current = (self.current + step) % LOADING_MESSAGES.len();
        self.last_change = Some(now);
        true
    }

    pub fn message(&self) -> &'static str {
        LOADING_MESSAGES[self.current]
    }

    /// Spinner frame for the elapsed time
    pub fn spinner(&self, now: Instant, use_glyphs: bool) -> &'static str {
        let frames = if use_glyphs { SPINNER } else { SPINNER_ASCII };
        let elapsed = self
            .started
            .map(|s| now.duration_since(s).as_millis() / 100)
            .unwrap_or(0);
        frames[elapsed as usize % frames.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_never_repeats() {
        let mut ticker = LoadingTicker::new(5);
        let start = Instant::now();
        ticker.start(start);

        let mut previous = ticker.message();
        for n in 1..50u64 {
            assert!(ticker.tick(start + Duration::from_secs(5 * n)));
            assert_ne!(ticker.message(), previous);
            previous = ticker.message();
        }
    }

    #[test]
    fn test_restart_picks_a_valid_message() {
        let mut ticker = LoadingTicker::new(5);
        let now = Instant::now();
        for _ in 0..100 {
            ticker.start(now);
            assert!(LOADING_MESSAGES.contains(&ticker.message()));
            assert!(ticker.is_running());
            ticker.stop();
        }
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let mut ticker = LoadingTicker::new(5);
        let start = Instant::now();
        assert!(!ticker.tick(start));

        ticker.start(start);
        assert!(!ticker.tick(start + Duration::from_secs(4)));
        assert!(ticker.tick(start + Duration::from_secs(5)));

        ticker.stop();
        assert!(!ticker.is_running());
        assert!(!ticker.tick(start + Duration::from_secs(60)));
    }
}
