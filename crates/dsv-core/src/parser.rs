//! Table builder: splits a document into lines and assembles a Table

use crate::error::{Error, Result};
use crate::options::{Dialect, ParseOptions};
use crate::table::Table;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

type Mapper<T> = Box<dyn Fn(String) -> T + Send + Sync>;

/// Parses documents with a fixed dialect and optional header/value mappers
pub struct Parser<H = String, V = String> {
    dialect: Dialect,
    header_mapper: Mapper<H>,
    value_mapper: Mapper<V>,
}

impl Parser {
    /// Validate `options` and build a parser with identity mappers
    pub fn new(options: &ParseOptions) -> Result<Self> {
        Ok(Self::from_dialect(options.validate()?))
    }

    pub fn from_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            header_mapper: Box::new(|s| s),
            value_mapper: Box::new(|s| s),
        }
    }
}

impl<H, V> Parser<H, V> {
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Transform each header name after parsing
    pub fn with_header_mapper<T, F>(self, f: F) -> Parser<T, V>
    where
        F: Fn(String) -> T + Send + Sync + 'static,
    {
        Parser {
            dialect: self.dialect,
            header_mapper: Box::new(f),
            value_mapper: self.value_mapper,
        }
    }

    /// Transform each data cell after parsing
    pub fn with_value_mapper<U, F>(self, f: F) -> Parser<H, U>
    where
        F: Fn(String) -> U + Send + Sync + 'static,
    {
        Parser {
            dialect: self.dialect,
            header_mapper: self.header_mapper,
            value_mapper: Box::new(f),
        }
    }

    /// Parse a whole document
    pub fn parse(&self, input: &str) -> Result<Table<H, V>> {
        let mut rows: Vec<Vec<String>> = split_lines(input, &self.dialect)
            .map(|line| self.dialect.tokenize(line))
            .collect();

        let width = rows.first().map_or(0, Vec::len);
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Error::InconsistentShape {
                expected: width,
                found: cells.len(),
                row,
            });
        }

        let header = if self.dialect.has_header() && !rows.is_empty() {
            rows.remove(0)
        } else {
            (0..width).map(|i| format!("col_{}", i)).collect()
        };

        debug!(
            columns = width,
            rows = rows.len(),
            has_header = self.dialect.has_header(),
            "parsed table"
        );

        Ok(Table { header, rows }
            .map_header(|name| (self.header_mapper)(name))
            .map_values(|value| (self.value_mapper)(value)))
    }

    /// Parse raw bytes, which must be UTF-8 text
    pub fn parse_bytes(&self, input: &[u8]) -> Result<Table<H, V>> {
        let text = std::str::from_utf8(input).map_err(|e| Error::InvalidInput { source: e })?;
        self.parse(text)
    }

    /// Read and parse a file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Table<H, V>> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read input file");
        self.parse_bytes(&bytes)
    }
}

impl<H, V> std::fmt::Debug for Parser<H, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

/// Split `input` on the line terminator and drop blank and comment lines
pub fn split_lines<'a>(input: &'a str, dialect: &'a Dialect) -> impl Iterator<Item = &'a str> + 'a {
    input
        .split(dialect.line_terminator())
        .enumerate()
        .filter_map(move |(index, line)| {
            if dialect.is_skipped(line) {
                trace!(line = index, "skipping line");
                None
            } else {
                Some(line)
            }
        })
}

/// Parse with default options
pub fn parse_str(input: &str) -> Result<Table> {
    Parser::from_dialect(Dialect::default()).parse(input)
}

/// Parse with the given options
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Table> {
    Parser::new(options)?.parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn no_header() -> ParseOptions {
        ParseOptions::default().with_header(false)
    }

    #[test]
    fn test_parse_simple() {
        let table = parse_str("ID,Name,Value\r\n1,foo,100\r\n2,bar,200\r\n").unwrap();

        assert_eq!(table.header(), strings(&["ID", "Name", "Value"]).as_slice());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0], strings(&["1", "foo", "100"]));
        assert_eq!(table.rows()[1], strings(&["2", "bar", "200"]));
    }

    #[test]
    fn test_skip_comment_lines() {
        let table = parse_with("#comment\r\na,b\r\n", &no_header()).unwrap();
        assert_eq!(table.header(), strings(&["col_0", "col_1"]).as_slice());
        assert_eq!(table.rows(), &[strings(&["a", "b"])]);
    }

    #[test]
    fn test_keep_comment_lines() {
        let options = no_header().with_skip_comments(false);
        let table = parse_with("#comment,x\r\na,b\r\n", &options).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0], strings(&["#comment", "x"]));
    }

    #[test]
    fn test_synthesized_header_keeps_first_row() {
        let table = parse_with("x,y\r\n1,2\r\n", &no_header()).unwrap();
        assert_eq!(table.header(), strings(&["col_0", "col_1"]).as_slice());
        assert_eq!(table.rows(), &[strings(&["x", "y"]), strings(&["1", "2"])]);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = parse_str("a,b\r\nc\r\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentShape);
        assert!(matches!(
            err,
            Error::InconsistentShape {
                expected: 2,
                found: 1,
                row: 1
            }
        ));
    }

    #[test]
    fn test_empty_document() {
        let table = parse_str("").unwrap();
        assert!(table.header().is_empty());
        assert!(table.is_empty());

        let table = parse_with("\r\n\r\n", &no_header()).unwrap();
        assert_eq!(table.column_count(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_header_only() {
        let table = parse_str("a,b\r\n").unwrap();
        assert_eq!(table.header(), strings(&["a", "b"]).as_slice());
        assert!(table.is_empty());
    }

    #[test]
    fn test_line_terminator_is_literal() {
        // With the default terminator a bare \n is data
        let table = parse_with("a\nb", &no_header()).unwrap();
        assert_eq!(table.rows(), &[strings(&["a\nb"])]);

        let options = no_header().with_line_terminator("\n");
        let table = parse_with("a\r\nb\n", &options).unwrap();
        assert_eq!(table.rows(), &[strings(&["a\r"]), strings(&["b"])]);

        let options = no_header().with_line_terminator("||");
        let table = parse_with("1,2||3,4", &options).unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_quoted_fields_in_document() {
        let input = "name,quote\r\n\"Smith, J\",\"said \"\"hi\"\"\"\r\n";
        let table = parse_str(input).unwrap();
        assert_eq!(table.rows()[0], strings(&["Smith, J", "said \"hi\""]));
    }

    #[test]
    fn test_invalid_config_fails_before_parsing() {
        let err = parse_with("a,b", &ParseOptions::default().with_separator("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_parse_bytes_rejects_non_utf8() {
        let parser = Parser::new(&ParseOptions::default()).unwrap();
        let err = parser.parse_bytes(&[b'a', b',', 0xff, 0xfe]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let table = parser.parse_bytes(b"a,b\r\n1,2").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_mappers_touch_only_their_part() {
        let parser = Parser::new(&ParseOptions::default())
            .unwrap()
            .with_header_mapper(|h| h.to_uppercase())
            .with_value_mapper(|v| v.parse::<i64>().unwrap_or(-1));

        let table = parser.parse("id,qty\r\n1,10\r\n2,x\r\n").unwrap();
        assert_eq!(table.header(), strings(&["ID", "QTY"]).as_slice());
        assert_eq!(table.rows(), &[vec![1i64, 10], vec![2, -1]]);
    }

    #[test]
    fn test_mappers_called_once_per_element() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let header_calls = Arc::new(AtomicUsize::new(0));
        let value_calls = Arc::new(AtomicUsize::new(0));
        let (h, v) = (Arc::clone(&header_calls), Arc::clone(&value_calls));

        let parser = Parser::new(&ParseOptions::default())
            .unwrap()
            .with_header_mapper(move |s| {
                h.fetch_add(1, Ordering::SeqCst);
                s
            })
            .with_value_mapper(move |s| {
                v.fetch_add(1, Ordering::SeqCst);
                s
            });

        parser.parse("a,b,c\r\n1,2,3\r\n4,5,6\r\n").unwrap();
        assert_eq!(header_calls.load(Ordering::SeqCst), 3);
        assert_eq!(value_calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a;b\n1;2\n").unwrap();

        let options = ParseOptions::default()
            .with_separator(";")
            .with_line_terminator("\n");
        let table = Parser::new(&options).unwrap().parse_file(&path).unwrap();
        assert_eq!(table.header(), strings(&["a", "b"]).as_slice());
        assert_eq!(table.rows(), &[strings(&["1", "2"])]);

        let err = Parser::new(&options)
            .unwrap()
            .parse_file(dir.path().join("missing.csv"))
            .unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_split_lines_drops_blank_and_comments() {
        let dialect = Dialect::default();
        let lines: Vec<&str> = split_lines("a\r\n\r\n# c\r\nb", &dialect).collect();
        assert_eq!(lines, vec!["a", "b"]);
    }
}
