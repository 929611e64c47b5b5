//! Line tokenizer: splits one line of text into unquoted fields
//!
//! A quote character toggles quoted mode wherever it appears, not only at the
//! start of a field, so `a"b,c"d` is the single field `ab,cd`. Inside quoted
//! mode a doubled quote decodes to one literal quote. Separators split fields
//! only outside quoted mode.

/// What the scanner does with the lookahead character after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Lookahead is left for the next step
    Keep,
    /// Lookahead was consumed as part of this step
    Consume,
}

/// Scan state for a single line
#[derive(Debug)]
struct Scanner {
    separator: char,
    quote: char,
    in_quote: bool,
    field: String,
    fields: Vec<String>,
}

impl Scanner {
    fn new(separator: char, quote: char) -> Self {
        Self {
            separator,
            quote,
            in_quote: false,
            field: String::new(),
            fields: Vec::new(),
        }
    }

    /// Feed one character together with the character that follows it
    fn step(&mut self, c: char, next: Option<char>) -> Step {
        if c == self.separator {
            if self.in_quote {
                self.field.push(c);
            } else {
                self.fields.push(std::mem::take(&mut self.field));
            }
        } else if c == self.quote {
            if !self.in_quote {
                self.in_quote = true;
            } else if next == Some(self.quote) {
                self.field.push(c);
                return Step::Consume;
            } else {
                self.in_quote = false;
            }
        } else {
            self.field.push(c);
        }
        Step::Keep
    }

    fn finish(mut self) -> Vec<String> {
        self.fields.push(self.field);
        self.fields
    }
}

/// Split `line` into fields.
///
/// Never fails. An empty line yields no fields; any other line yields at
/// least one.
pub fn tokenize(line: &str, separator: char, quote: char) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }

    let mut scanner = Scanner::new(separator, quote);
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if scanner.step(c, chars.peek().copied()) == Step::Consume {
            chars.next();
        }
    }
    scanner.finish()
}
