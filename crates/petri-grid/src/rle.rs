//! Run-length-encoded pattern loader.
//!
//! The loader is deliberately lenient. Lines starting with `#` are comments
//! wherever they appear. The first non-comment line, if it starts with `x`,
//! is the size header (`x = 3, y = 3, rule = B3/S23`). Everything else is
//! body text over the alphabet `{digits, b, o, $}`; any other character,
//! including the `!` terminator, is ignored.
//!
//! Body semantics, starting from row 0, column 0:
//!
//! | token | effect |
//! |-------|--------|
//! | `n` (digits) | run count for the next token (absent or `0` means 1) |
//! | `b` | advance the column by the count |
//! | `o` | set `count` cells alive from the column, advancing past them |
//! | `$` | advance the row by the count and return to column 0 |
//!
//! The run count carries across line breaks and saturates rather than
//! overflowing. Malformed content never fails: only I/O errors from the
//! underlying reader propagate out of [`read_rle`].

use std::io::{self, BufRead};

use crate::grid::SparseBoolGrid;

/// Size header parsed from the `x = .., y = ..` line.
///
/// Each field is `None` when it is missing or unparseable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RleHeader {
    /// Declared pattern width (`x`).
    pub width: Option<u32>,
    /// Declared pattern height (`y`).
    pub height: Option<u32>,
    /// Rule string, verbatim (e.g. `B3/S23`).
    pub rule: Option<String>,
}

/// A loaded pattern: the live cells plus everything read around them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RlePattern {
    /// The header line, if one was present.
    pub header: Option<RleHeader>,
    /// Comment lines in file order, without the leading `#`.
    pub comments: Vec<String>,
    /// Live cells, row 0 at the top.
    pub grid: SparseBoolGrid,
}

/// Parse RLE text into a grid, discarding header and comments.
///
/// ```
/// let grid = petri_grid::parse_rle("x = 3, y = 3\nbo$2bo$3o!");
/// let cells: Vec<(i32, i32)> = grid.cells().map(Into::into).collect();
/// assert_eq!(cells, [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
/// ```
pub fn parse_rle(text: &str) -> SparseBoolGrid {
    parse_rle_pattern(text).grid
}

/// Parse RLE text, keeping header and comments.
pub fn parse_rle_pattern(text: &str) -> RlePattern {
    let mut parser = Parser::default();
    for line in text.lines() {
        parser.line(line);
    }
    parser.finish()
}

/// Read an RLE pattern line by line.
///
/// Only errors from `reader` are returned; the content itself is never
/// rejected. Bytes that are not valid UTF-8 decode lossily.
pub fn read_rle(mut reader: impl BufRead) -> io::Result<RlePattern> {
    let mut parser = Parser::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        parser.line(line.trim_end_matches(['\n', '\r']));
    }
    Ok(parser.finish())
}

#[derive(Default)]
struct Parser {
    pattern: RlePattern,
    /// Set once the first non-comment line has been seen.
    past_header: bool,
    row: i32,
    col: i32,
    /// Pending run count; zero means "no count", i.e. one.
    count: u32,
}

impl Parser {
    fn line(&mut self, line: &str) {
        if let Some(comment) = line.strip_prefix('#') {
            self.pattern.comments.push(comment.trim_end().to_owned());
            return;
        }
        if !self.past_header {
            self.past_header = true;
            if line.starts_with('x') {
                self.pattern.header = Some(parse_header(line));
                return;
            }
        }
        for c in line.chars() {
            self.token(c);
        }
    }

    fn token(&mut self, c: char) {
        if let Some(d) = c.to_digit(10) {
            self.count = self.count.saturating_mul(10).saturating_add(d);
            return;
        }
        let run = self.count.max(1);
        match c {
            'b' => self.col = advance(self.col, run),
            'o' => {
                for _ in 0..run {
                    self.pattern.grid.set(self.col, self.row, true);
                    match self.col.checked_add(1) {
                        Some(next) => self.col = next,
                        None => break,
                    }
                }
            }
            '$' => {
                self.row = advance(self.row, run);
                self.col = 0;
            }
            _ => return,
        }
        self.count = 0;
    }

    fn finish(self) -> RlePattern {
        self.pattern
    }
}

fn advance(at: i32, run: u32) -> i32 {
    at.saturating_add(i32::try_from(run).unwrap_or(i32::MAX))
}

fn parse_header(line: &str) -> RleHeader {
    let mut header = RleHeader::default();
    for field in line.split(',') {
        let Some((key, value)) = field.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "x" => header.width = value.parse().ok(),
            "y" => header.height = value.parse().ok(),
            "rule" if !value.is_empty() => header.rule = Some(value.to_owned()),
            _ => {}
        }
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(grid: &SparseBoolGrid) -> Vec<(i32, i32)> {
        grid.cells().map(Into::into).collect()
    }

    #[test]
    fn glider_with_header() {
        let g = parse_rle("x = 3, y = 3\nbo$2bo$3o!");
        // The leading `b` skips column 0, so row 0 starts at (1, 0).
        assert_eq!(cells(&g), vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn header_fields_are_parsed() {
        let p = parse_rle_pattern("x = 3, y = 4, rule = B36/S23\no!");
        assert_eq!(
            p.header,
            Some(RleHeader {
                width: Some(3),
                height: Some(4),
                rule: Some("B36/S23".to_owned()),
            })
        );
    }

    #[test]
    fn unparseable_header_values_become_none() {
        let p = parse_rle_pattern("x = wide, y=2\no");
        let h = p.header.unwrap();
        assert_eq!(h.width, None);
        assert_eq!(h.height, Some(2));
        assert_eq!(h.rule, None);
    }

    #[test]
    fn missing_header_is_body() {
        let p = parse_rle_pattern("2o$2o!");
        assert_eq!(p.header, None);
        assert_eq!(cells(&p.grid), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn comments_are_collected_anywhere() {
        let text = "#N Block\n#C two lines\nx = 2, y = 2\n2o$\n#C mid-body\n2o!";
        let p = parse_rle_pattern(text);
        assert_eq!(p.comments, vec!["N Block", "C two lines", "C mid-body"]);
        assert_eq!(cells(&p.grid), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn only_first_content_line_can_be_header() {
        // The second line starts with `x` but is body text; `x` is ignored.
        let g = parse_rle("o$\nxo");
        assert_eq!(cells(&g), vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn run_counts_apply_to_b_o_and_dollar() {
        let g = parse_rle("3b2o2$o");
        assert_eq!(cells(&g), vec![(3, 0), (4, 0), (0, 2)]);
    }

    #[test]
    fn zero_count_means_one() {
        let g = parse_rle("0b0o");
        assert_eq!(cells(&g), vec![(1, 0)]);
    }

    #[test]
    fn count_carries_across_line_breaks() {
        let g = parse_rle("1\n2o");
        assert_eq!(g.len(), 12);
    }

    #[test]
    fn unknown_characters_are_ignored() {
        let g = parse_rle("o z!\r\n\tb o");
        assert_eq!(cells(&g), vec![(0, 0), (2, 0)]);
    }

    #[test]
    fn huge_counts_saturate() {
        let g = parse_rle("99999999999999999999b$o");
        assert_eq!(cells(&g), vec![(0, 1)]);
        let g = parse_rle("99999999999999999999bo");
        assert_eq!(cells(&g), vec![(i32::MAX, 0)]);
    }

    #[test]
    fn empty_input_is_empty_pattern() {
        let p = parse_rle_pattern("");
        assert_eq!(p, RlePattern::default());
    }

    #[test]
    fn reader_and_str_agree() {
        let text = "#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n";
        let from_reader = read_rle(text.as_bytes()).unwrap();
        assert_eq!(from_reader, parse_rle_pattern(text));
    }

    #[test]
    fn reader_decodes_invalid_utf8_lossily() {
        let bytes: &[u8] = b"#C Caf\xE9\r\nx = 3, y = 3\r\nbo$2bo$3o!\r\n";
        let p = read_rle(bytes).unwrap();
        assert_eq!(p.comments, vec!["C Caf\u{FFFD}".to_owned()]);
        assert_eq!(p.header.map(|h| h.width), Some(Some(3)));
        assert_eq!(cells(&p.grid), vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn reader_errors_propagate() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }
        let err = read_rle(io::BufReader::new(Broken)).unwrap_err();
        assert_eq!(err.to_string(), "disk on fire");
    }
}
