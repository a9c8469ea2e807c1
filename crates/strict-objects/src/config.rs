use std::sync::OnceLock;

const MAX_SEQUENCE_LEN_VAR: &str = "STRICT_MAX_SEQUENCE_LEN";

fn usize_from_env(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<usize>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("ignoring {}={:?}: {}", key, raw, err);
            None
        }
    }
}

/// Knobs the evaluator hands to every container operation through the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectModelOptions {
    /// Upper bound on the length of a sequence produced by concatenation or
    /// repetition. `None` leaves bounding to the evaluator.
    pub max_sequence_len: Option<usize>,
}

impl ObjectModelOptions {
    pub fn from_env() -> Self {
        Self {
            max_sequence_len: usize_from_env(MAX_SEQUENCE_LEN_VAR),
        }
    }

    pub fn with_max_sequence_len(mut self, max: usize) -> Self {
        self.max_sequence_len = Some(max);
        self
    }

    /// Whether a sequence of `len` elements may be built.
    pub fn allows_len(&self, len: usize) -> bool {
        self.max_sequence_len.map_or(true, |max| len <= max)
    }
}

/// Process-wide defaults, read from the environment once.
pub fn default_options() -> ObjectModelOptions {
    static DEFAULTS: OnceLock<ObjectModelOptions> = OnceLock::new();
    *DEFAULTS.get_or_init(ObjectModelOptions::from_env)
}
