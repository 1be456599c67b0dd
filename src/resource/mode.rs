use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

use crate::error::MessageError;

/// fopen-style access mode of a resource (`r`, `w+`, `a+b`, ...).
///
/// The first character picks the base access; a `+` adds the missing
/// direction, and `b`/`t` flags are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    raw: String,
    base: char,
    plus: bool,
}

impl Mode {
    pub fn parse(mode: &str) -> Result<Self, MessageError> {
        let mut chars = mode.chars();
        let base = match chars.next() {
            Some(c @ ('r' | 'w' | 'a' | 'x' | 'c')) => c,
            _ => return Err(MessageError::InvalidMode(mode.to_string())),
        };

        let mut plus = false;
        for c in chars {
            match c {
                '+' if !plus => plus = true,
                'b' | 't' => {}
                _ => return Err(MessageError::InvalidMode(mode.to_string())),
            }
        }

        Ok(Self {
            raw: mode.to_string(),
            base,
            plus,
        })
    }

    /// `rb`, the mode of one-way sources.
    pub fn read_only() -> Self {
        Self {
            raw: "rb".to_string(),
            base: 'r',
            plus: false,
        }
    }

    /// `w+b`, the mode of scratch buffers.
    pub fn read_write() -> Self {
        Self {
            raw: "w+b".to_string(),
            base: 'w',
            plus: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_readable(&self) -> bool {
        self.base == 'r' || self.plus
    }

    pub fn is_writable(&self) -> bool {
        self.base != 'r' || self.plus
    }

    pub fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.is_readable());

        match self.base {
            'r' => {
                options.write(self.plus);
            }
            'w' => {
                options.write(true).create(true).truncate(true);
            }
            'a' => {
                options.append(true).create(true);
            }
            'x' => {
                options.write(true).create_new(true);
            }
            // 'c'
            _ => {
                options.write(true).create(true);
            }
        }

        options
    }
}

impl FromStr for Mode {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::parse(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
