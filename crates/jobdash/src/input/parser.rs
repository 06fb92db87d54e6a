//! Delimited file reader with encoding fallback and delimiter detection.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

use super::source::{RawTable, SourceMetadata};
use crate::error::{DashError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Encoding tried first.
    pub encoding: &'static Encoding,
    /// Single-byte encoding tried when the primary one fails to decode.
    pub fallback_encoding: Option<&'static Encoding>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
            fallback_encoding: Some(WINDOWS_1252),
            quote: b'"',
        }
    }
}

impl ParserConfig {
    /// Use the encoding with the given WHATWG label (e.g. "utf-8", "latin1").
    pub fn with_encoding_label(mut self, label: &str) -> Result<Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| DashError::Config(format!("Unknown encoding: {}", label)))?;
        Ok(self)
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}

/// Parses delimited text files.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a file and return the raw table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(RawTable, SourceMetadata)> {
        let path = path.as_ref();

        let contents = std::fs::read(path).map_err(|e| DashError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (text, encoding) = self.decode(path, &contents)?;

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&text)?,
        };

        let table = self.parse_text(&text, delimiter)?;

        let metadata = SourceMetadata::new(
            path.display().to_string(),
            &contents,
            format_name(delimiter),
            encoding.name(),
            &table,
        );

        Ok((table, metadata))
    }

    /// Decode with the primary encoding, retrying with the fallback on failure.
    fn decode<'a>(
        &self,
        path: &Path,
        contents: &'a [u8],
    ) -> Result<(Cow<'a, str>, &'static Encoding)> {
        let primary = self.config.encoding;
        let body = if primary == UTF_8 {
            contents.strip_prefix(UTF8_BOM).unwrap_or(contents)
        } else {
            contents
        };

        if let Some(text) = primary.decode_without_bom_handling_and_without_replacement(body) {
            return Ok((text, primary));
        }

        if let Some(fallback) = self.config.fallback_encoding {
            debug!(
                path = %path.display(),
                primary = primary.name(),
                fallback = fallback.name(),
                "primary decode failed, retrying with fallback encoding"
            );
            if let Some(text) = fallback.decode_without_bom_handling_and_without_replacement(contents)
            {
                return Ok((text, fallback));
            }
        }

        Err(DashError::Decode {
            path: path.to_path_buf(),
            encoding: primary.name().to_string(),
        })
    }

    /// Parse decoded text.
    pub(crate) fn parse_text(&self, text: &str, delimiter: u8) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(DashError::EmptyData("No columns found".to_string()));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(RawTable::new(headers, rows))
    }
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(text: &str) -> Result<u8> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    if lines.is_empty() {
        return Err(DashError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs rarely appear inside values.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = "a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = "a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted_commas() {
        let data = "Job Title;Project Value\n\"Roof, east wing\";\"$1,000\"\n";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let parser = Parser::new();
        let table = parser
            .parse_text("Job Title,Location,Project Value\nRoof,Austin\n", b',')
            .unwrap();

        assert_eq!(table.headers, vec!["Job Title", "Location", "Project Value"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.get(0, 2), Some(""));
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let parser = Parser::new();
        let table = parser.parse_text("Job Title,Project Value\n", b',').unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_latin1_fallback() {
        let mut file = NamedTempFile::new().unwrap();
        // "Café" with a latin-1 é (0xE9) is invalid UTF-8.
        file.write_all(b"Job Title,Location\nCaf\xE9 remodel,Austin\n")
            .unwrap();

        let (table, metadata) = Parser::new().parse_file(file.path()).unwrap();
        assert_eq!(table.get(0, 0), Some("Café remodel"));
        assert_eq!(metadata.encoding, "windows-1252");
        assert_eq!(metadata.format, "csv");
    }

    #[test]
    fn test_no_fallback_reports_decode_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Job Title\nCaf\xE9\n").unwrap();

        let config = ParserConfig {
            fallback_encoding: None,
            ..ParserConfig::default()
        };
        let err = Parser::with_config(config).parse_file(file.path()).unwrap_err();
        assert!(matches!(err, DashError::Decode { .. }));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFFavorite,Job Title\nTRUE,Roof\n")
            .unwrap();

        let (table, _) = Parser::new().parse_file(file.path()).unwrap();
        assert_eq!(table.headers[0], "Favorite");
    }

    #[test]
    fn test_encoding_label() {
        let config = ParserConfig::default().with_encoding_label("latin1").unwrap();
        assert_eq!(config.encoding, WINDOWS_1252);
        assert!(ParserConfig::default().with_encoding_label("klingon").is_err());
    }

    #[test]
    fn test_empty_file_is_error() {
        let file = NamedTempFile::new().unwrap();
        let err = Parser::new().parse_file(file.path()).unwrap_err();
        assert!(matches!(err, DashError::EmptyData(_)));
    }
}
