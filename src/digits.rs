//! The target sequence the player recalls, and where it comes from.
//!
//! The sequence ships inside the binary and can be overridden with a file
//! on disk. A missing or corrupted resource never stops the game: callers
//! go through [`load_or_fallback`] and get a short built-in sequence instead.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use include_dir::{include_dir, Dir};
use tracing::{debug, warn};

use crate::error::{Error, Result};

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/data");

pub const DIGITS_FILE: &str = "pi_digits.txt";

/// Every valid resource starts with this
pub const EXPECTED_PREFIX: &str = "3.14";

/// Used when the resource cannot be found or read
pub const MISSING_FALLBACK: &str = "3.14159";

/// Used when the resource exists but its content is wrong
pub const INVALID_FALLBACK: &str = "3.1415926535";

/// Ordered, immutable run of digits with at most one decimal point
#[derive(Clone, PartialEq, Eq)]
pub struct DigitSequence {
    symbols: Arc<str>,
}

impl DigitSequence {
    /// Validates `raw` after trimming surrounding whitespace
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::ResourceInvalid("sequence is empty".into()));
        }
        if let Some(bad) = trimmed.chars().find(|c| !is_symbol(*c)) {
            return Err(Error::ResourceInvalid(format!(
                "unexpected character {bad:?}"
            )));
        }
        if trimmed.matches('.').count() > 1 {
            return Err(Error::ResourceInvalid(
                "more than one decimal point".into(),
            ));
        }
        Ok(Self {
            symbols: Arc::from(trimmed),
        })
    }

    /// Like [`DigitSequence::new`], additionally requiring the leading `3.14`
    pub fn parse_pi(raw: &str) -> Result<Self> {
        let seq = Self::new(raw)?;
        if !seq.as_str().starts_with(EXPECTED_PREFIX) {
            return Err(Error::ResourceInvalid(format!(
                "does not start with {EXPECTED_PREFIX}"
            )));
        }
        Ok(seq)
    }

    fn builtin(symbols: &'static str) -> Self {
        Self {
            symbols: Arc::from(symbols),
        }
    }

    /// Symbol at `index`, or None past the end
    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.as_bytes().get(index).map(|b| *b as char)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed sequence
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.symbols
    }

    /// Number of decimals after the point
    pub fn decimals(&self) -> usize {
        match self.symbols.find('.') {
            Some(pos) => self.len() - pos - 1,
            None => 0,
        }
    }
}

impl fmt::Debug for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.symbols.chars().take(12).collect();
        f.debug_struct("DigitSequence")
            .field("len", &self.len())
            .field("starts", &preview)
            .finish()
    }
}

pub fn is_symbol(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

pub trait DigitSequenceProvider {
    fn load(&self) -> Result<DigitSequence>;

    /// Where the digits come from, for log lines
    fn describe(&self) -> String;
}

/// Digits compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedDigits;

impl DigitSequenceProvider for EmbeddedDigits {
    fn load(&self) -> Result<DigitSequence> {
        let file = DATA_DIR
            .get_file(DIGITS_FILE)
            .ok_or_else(|| Error::ResourceMissing(DIGITS_FILE.to_string()))?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| Error::ResourceInvalid("not valid UTF-8".into()))?;
        DigitSequence::parse_pi(text)
    }

    fn describe(&self) -> String {
        format!("embedded {DIGITS_FILE}")
    }
}

/// Digits read from a plain-text file
#[derive(Debug, Clone)]
pub struct FileDigits {
    path: PathBuf,
}

impl FileDigits {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl DigitSequenceProvider for FileDigits {
    fn load(&self) -> Result<DigitSequence> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(Error::ResourceInvalid("not valid UTF-8".into()))
            }
            Err(e) => {
                debug!("reading {}: {}", self.path.display(), e);
                return Err(Error::ResourceMissing(self.path.display().to_string()));
            }
        };
        DigitSequence::parse_pi(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Load from `provider`, substituting a built-in sequence on failure
pub fn load_or_fallback(provider: &dyn DigitSequenceProvider) -> DigitSequence {
    match provider.load() {
        Ok(seq) => {
            debug!(
                "loaded {} decimals from {}",
                seq.decimals(),
                provider.describe()
            );
            seq
        }
        Err(e @ Error::ResourceInvalid(_)) => {
            warn!("{} ({}), using {}", e, provider.describe(), INVALID_FALLBACK);
            DigitSequence::builtin(INVALID_FALLBACK)
        }
        Err(e) => {
            warn!("{} ({}), using {}", e, provider.describe(), MISSING_FALLBACK);
            DigitSequence::builtin(MISSING_FALLBACK)
        }
    }
}
