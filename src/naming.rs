//! Filename and short-identifier derivation for stored posters.

use chrono::{DateTime, Utc};

pub const FILENAME_HASH_LEN: usize = 6;
pub const DEFAULT_HASH_LEN: usize = 8;
const TIMESTAMP_FORMAT: &str = "%m%d%H%M%S";

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Hash function producing a lowercase hexadecimal digest.
pub trait Digester: Send + Sync {
    fn hex_digest(&self, input: &[u8]) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Digester;

impl Digester for Md5Digester {
    fn hex_digest(&self, input: &[u8]) -> String {
        format!("{:x}", md5::compute(input))
    }
}

/// First `length` hex characters of the digest of `text`.
pub fn short_hash_with(digester: &dyn Digester, text: &str, length: usize) -> String {
    let mut digest = digester.hex_digest(text.as_bytes());
    digest.truncate(length);
    digest
}

pub fn short_hash(text: &str, length: usize) -> String {
    short_hash_with(&Md5Digester, text, length)
}

pub fn compact_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Derives object keys and display identifiers.
pub struct FilenameDeriver {
    clock: Box<dyn Clock>,
    digester: Box<dyn Digester>,
}

impl Default for FilenameDeriver {
    fn default() -> Self {
        Self::new(Box::new(SystemClock), Box::new(Md5Digester))
    }
}

impl FilenameDeriver {
    pub fn new(clock: Box<dyn Clock>, digester: Box<dyn Digester>) -> Self {
        Self { clock, digester }
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self::new(Box::new(clock), Box::new(Md5Digester))
    }

    /// `img-<hash>.png`, hashing the prompt together with the current timestamp.
    pub fn filename(&self, prompt: &str) -> String {
        let seed = format!("{}{}", prompt, compact_timestamp(self.clock.now()));
        let hash = short_hash_with(self.digester.as_ref(), &seed, FILENAME_HASH_LEN);
        format!("img-{}.png", hash)
    }

    pub fn short_id(&self, filename: &str) -> String {
        short_hash_with(self.digester.as_ref(), filename, DEFAULT_HASH_LEN)
    }
}

pub fn is_valid_filename(name: &str) -> bool {
    name.strip_prefix("img-")
        .and_then(|rest| rest.strip_suffix(".png"))
        .map_or(false, |hash| {
            hash.len() == FILENAME_HASH_LEN
                && hash.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        })
}
