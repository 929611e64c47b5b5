//! Parse options and their validated form

use crate::error::{Error, Result};
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// User-facing parse options, as read from code, flags, or a JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Field delimiter (one character)
    pub separator: String,
    /// Quoting character (one character)
    pub quote: String,
    /// Literal boundary between lines
    pub line_terminator: String,
    /// Whether the first parsed row is the header
    pub has_header: bool,
    /// Whether lines starting with `#` are dropped
    pub skip_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            quote: "\"".to_string(),
            line_terminator: "\r\n".to_string(),
            has_header: true,
            skip_comments: true,
        }
    }
}

impl ParseOptions {
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = quote.into();
        self
    }

    pub fn with_line_terminator(mut self, line_terminator: impl Into<String>) -> Self {
        self.line_terminator = line_terminator.into();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_skip_comments(mut self, skip_comments: bool) -> Self {
        self.skip_comments = skip_comments;
        self
    }

    /// Load options from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save options to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check the options and resolve them into a [`Dialect`]
    pub fn validate(&self) -> Result<Dialect> {
        let separator = single_char("separator", &self.separator)?;
        let quote = single_char("quote", &self.quote)?;
        if self.line_terminator.is_empty() {
            return Err(Error::InvalidConfig {
                option: "line_terminator",
                value: String::new(),
                reason: "must not be empty",
            });
        }

        Ok(Dialect {
            separator,
            quote,
            line_terminator: self.line_terminator.clone(),
            has_header: self.has_header,
            skip_comments: self.skip_comments,
        })
    }
}

fn single_char(option: &'static str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::InvalidConfig {
            option,
            value: value.to_string(),
            reason: "must be exactly one character",
        }),
    }
}

/// Validated parse options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    separator: char,
    quote: char,
    line_terminator: String,
    has_header: bool,
    skip_comments: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            separator: ',',
            quote: '"',
            line_terminator: "\r\n".to_string(),
            has_header: true,
            skip_comments: true,
        }
    }
}

impl Dialect {
    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn quote(&self) -> char {
        self.quote
    }

    pub fn line_terminator(&self) -> &str {
        &self.line_terminator
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn skip_comments(&self) -> bool {
        self.skip_comments
    }

    /// Tokenize one line with this dialect's separator and quote
    pub fn tokenize(&self, line: &str) -> Vec<String> {
        tokenize(line, self.separator, self.quote)
    }

    /// Whether a raw line is dropped before tokenizing
    pub fn is_skipped(&self, line: &str) -> bool {
        line.is_empty() || (self.skip_comments && line.starts_with('#'))
    }
}

impl From<&Dialect> for ParseOptions {
    fn from(dialect: &Dialect) -> Self {
        Self {
            separator: dialect.separator.to_string(),
            quote: dialect.quote.to_string(),
            line_terminator: dialect.line_terminator.clone(),
            has_header: dialect.has_header,
            skip_comments: dialect.skip_comments,
        }
    }
}
