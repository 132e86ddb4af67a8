use crate::error::{KvError, KvResult};

/// Largest page a single list call may return; also the default.
pub const MAX_LIST_KEYS: usize = 1000;

/// Longest key or prefix, in UTF-8 bytes.
pub const MAX_KEY_SIZE: usize = 512;

/// Validated parameters of one list call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListOptions {
    pub prefix: Option<String>,
    pub cursor: Option<String>,
    pub limit: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            cursor: None,
            limit: MAX_LIST_KEYS,
        }
    }
}

impl ListOptions {
    /// Build options from raw request parameters.
    ///
    /// A missing `limit` means [`MAX_LIST_KEYS`]. Out-of-range or
    /// non-numeric limits are rejected, never clamped.
    pub fn parse(
        limit: Option<&str>,
        prefix: Option<String>,
        cursor: Option<String>,
    ) -> KvResult<Self> {
        let limit = match limit {
            None => MAX_LIST_KEYS,
            Some(raw) => parse_limit(raw)?,
        };
        let options = Self {
            prefix,
            cursor,
            limit,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn validate(&self) -> KvResult<()> {
        if self.limit < 1 {
            return Err(invalid_limit(
                self.limit.to_string(),
                "Please specify an integer greater than 0.",
            ));
        }
        if self.limit > MAX_LIST_KEYS {
            return Err(invalid_limit(
                self.limit.to_string(),
                format!("Please specify an integer less than {MAX_LIST_KEYS}."),
            ));
        }
        if let Some(prefix) = &self.prefix {
            if prefix.len() > MAX_KEY_SIZE {
                return Err(KvError::KeyTooLong {
                    length: prefix.len(),
                    max: MAX_KEY_SIZE,
                });
            }
        }
        Ok(())
    }
}

fn parse_limit(raw: &str) -> KvResult<usize> {
    let trimmed = raw.trim();
    if let Some(digits) = trimmed.strip_prefix('-') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid_limit(raw, "Please specify an integer greater than 0."));
        }
    }
    match trimmed.parse::<usize>() {
        Ok(limit) => Ok(limit),
        // All digits but too large for usize.
        Err(_) if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => Err(
            invalid_limit(raw, format!("Please specify an integer less than {MAX_LIST_KEYS}.")),
        ),
        Err(_) => Err(invalid_limit(raw, "Please specify an integer.")),
    }
}

fn invalid_limit(value: impl Into<String>, reason: impl Into<String>) -> KvError {
    KvError::InvalidLimit {
        value: value.into(),
        reason: reason.into(),
    }
}
