/// Persisted history is capped to avoid unbounded storage growth.
pub const HISTORY_LIMIT: usize = 100;

/// Fixed generation budget for every provider call.
pub const MAX_OUTPUT_TOKENS: usize = 500;

/// Fixed sampling temperature, not user-tunable.
pub const TEMPERATURE: f32 = 0.7;

/// Wall-clock ceiling for a single provider call.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Delay before the single retry of a failed status relay.
pub const RELAY_RETRY_DELAY_MS: u64 = 200;

/// Error messages longer than this are truncated for display.
pub const ERROR_DISPLAY_LIMIT: usize = 200;

/// Input text is shortened to this many chars in the text export.
pub const EXPORT_INPUT_LIMIT: usize = 500;

/// Context snippet length recorded alongside a submitted question.
pub const QUESTION_CONTEXT_SNIPPET: usize = 100;

pub const TEST_PROMPT: &str = "Say 'Hello! API is working correctly.' in a friendly way.";

pub const LOG_FILE_PATH: &str = "/tmp/sidekick.log";
