//! Line-oriented input and field decoding.

use crate::error::Error;
use crate::error::ErrorKind;
use crate::tag::Tag;
use std::borrow::Cow;
use std::io;
use std::str;

/// Width of the floating point columns of coordinate and scale records.
pub const FLOAT_WIDTH: usize = 25;

/// Width of the integer columns of vertex headers.
pub const INTEGER_WIDTH: usize = 10;

/// Forward-only line reader that keeps count of the lines it handed out.
pub struct Lines<R> {
    input: R,
    buf: String,
    lineno: usize,
}

impl<R> Lines<R>
where
    R: io::BufRead,
{
    pub fn new(input: R) -> Self {
        Self {
            input,
            buf: String::new(),
            lineno: 0,
        }
    }

    /// Number of lines read so far.
    pub fn lineno(&self) -> usize {
        self.lineno
    }

    /// Reads the next line, without its line terminator.
    pub fn next_line(&mut self) -> Result<Option<Line<'_>>, Error> {
        let lineno = self.lineno + 1;
        self.buf.clear();
        let n = self
            .input
            .read_line(&mut self.buf)
            .map_err(|err| Error::at(lineno, err))?;
        if n == 0 {
            return Ok(None);
        }
        self.lineno = lineno;

        if self.buf.ends_with('\n') {
            self.buf.pop();
        }
        if self.buf.ends_with('\r') {
            if cfg!(windows) {
                self.buf.pop();
            } else {
                return Err(Error::at(lineno, ErrorKind::IncompatibleLineEndings));
            }
        }

        Ok(Some(Line {
            text: &self.buf,
            lineno,
        }))
    }

    /// Like [`Lines::next_line`], but end of input is an error.
    pub fn expect_line(&mut self, expected: &'static str) -> Result<Line<'_>, Error> {
        let lineno = self.lineno + 1;
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(Error::at(lineno, ErrorKind::UnexpectedEof { expected })),
        }
    }

    /// Consumes lines up to and including the next separator.
    pub fn skip_section(&mut self) -> Result<(), Error> {
        while let Some(line) = self.next_line()? {
            if line.is_separator() {
                break;
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Line<'a> {
    text: &'a str,
    lineno: usize,
}

impl<'a> Line<'a> {
    pub fn text(self) -> &'a str {
        self.text
    }

    pub fn lineno(self) -> usize {
        self.lineno
    }

    pub fn tag(self) -> Tag {
        Tag::classify(self.text)
    }

    pub fn is_separator(self) -> bool {
        self.tag() == Tag::Separator
    }

    pub fn error(self, kind: impl Into<ErrorKind>) -> Error {
        Error::at(self.lineno, kind)
    }

    pub fn fields(self) -> str::SplitWhitespace<'a> {
        self.text.split_whitespace()
    }

    /// First whitespace-delimited token, or the empty string on a blank line.
    pub fn first_token(self) -> &'a str {
        self.fields().next().unwrap_or("")
    }

    pub fn parse<T>(self, token: &str) -> Result<T, Error>
    where
        T: str::FromStr,
        ErrorKind: From<T::Err>,
    {
        token.parse::<T>().map_err(|err| self.error(err))
    }

    /// Parses the `index`-th whitespace-separated field.
    pub fn field<T>(self, index: usize, expected: &'static str) -> Result<T, Error>
    where
        T: str::FromStr,
        ErrorKind: From<T::Err>,
    {
        let token = self
            .fields()
            .nth(index)
            .ok_or_else(|| self.error(ErrorKind::MissingField { expected }))?;
        self.parse(token)
    }

    pub fn last_field<T>(self, expected: &'static str) -> Result<T, Error>
    where
        T: str::FromStr,
        ErrorKind: From<T::Err>,
    {
        let token = self
            .fields()
            .last()
            .ok_or_else(|| self.error(ErrorKind::MissingField { expected }))?;
        self.parse(token)
    }

    /// Returns the `index`-th fixed-width column, clipped to the line length.
    pub fn column(self, index: usize, width: usize) -> Option<&'a str> {
        let start = index * width;
        let end = usize::min(start + width, self.text.len());
        if end <= start {
            return None;
        }
        self.text.get(start..end)
    }

    pub fn integer_column<T>(self, index: usize, expected: &'static str) -> Result<T, Error>
    where
        T: str::FromStr,
        ErrorKind: From<T::Err>,
    {
        let column = self
            .column(index, INTEGER_WIDTH)
            .ok_or_else(|| self.error(ErrorKind::MissingField { expected }))?;
        self.parse(column.trim())
    }

    pub fn float_column(self, index: usize, expected: &'static str) -> Result<f64, Error> {
        let column = self
            .column(index, FLOAT_WIDTH)
            .ok_or_else(|| self.error(ErrorKind::MissingField { expected }))?;
        parse_float(column).map_err(|err| self.error(err))
    }
}

/// Parses a floating point number, accepting Fortran's `D` exponent marker.
pub fn parse_float(s: &str) -> Result<f64, std::num::ParseFloatError> {
    let s = s.trim();
    let s = if s.contains(['D', 'd']) {
        Cow::Owned(s.replace(['D', 'd'], "E"))
    } else {
        Cow::Borrowed(s)
    };
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn test_line_numbers() {
        let mut lines = Lines::new("a\nb\n\nc".as_bytes());
        assert_eq!(lines.next_line().unwrap().unwrap().text(), "a");
        let line = lines.next_line().unwrap().unwrap();
        assert_eq!((line.text(), line.lineno()), ("b", 2));
        assert_eq!(lines.next_line().unwrap().unwrap().text(), "");
        let line = lines.next_line().unwrap().unwrap();
        assert_eq!((line.text(), line.lineno()), ("c", 4));
        assert!(lines.next_line().unwrap().is_none());
        assert_eq!(lines.lineno(), 4);
    }

    #[test]
    fn test_expect_line_at_eof() {
        let mut lines = Lines::new("only\n".as_bytes());
        lines.expect_line("first").unwrap();
        let err = lines.expect_line("second").unwrap_err();
        assert_eq!(err.lineno(), Some(2));
        assert!(matches!(
            err.kind(),
            ErrorKind::UnexpectedEof {
                expected: "second"
            }
        ));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_crlf_rejected() {
        let mut lines = Lines::new("    -1\r\n   164\r\n".as_bytes());
        let err = lines.next_line().unwrap_err();
        assert_eq!(err.lineno(), Some(1));
        assert!(matches!(err.kind(), ErrorKind::IncompatibleLineEndings));
    }

    #[test]
    fn test_skip_section() {
        let mut lines = Lines::new("  2420\nfoo\n    -1\n  2411\n".as_bytes());
        lines.skip_section().unwrap();
        assert_eq!(lines.lineno(), 3);
        assert_eq!(lines.next_line().unwrap().unwrap().tag(), Tag::Vertices);
    }

    #[test]
    fn test_fields() {
        let line = Line {
            text: "        12       115         2         1         7         8",
            lineno: 1,
        };
        assert_eq!(line.field::<u64>(0, "id").unwrap(), 12);
        assert_eq!(line.field::<u32>(1, "descriptor").unwrap(), 115);
        assert_eq!(line.last_field::<usize>("count").unwrap(), 8);
        let err = line.field::<u64>(6, "seventh").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingField {
                expected: "seventh"
            }
        ));
    }

    #[test]
    fn test_bad_integer() {
        let line = Line {
            text: "  12  x4",
            lineno: 9,
        };
        let err = line.field::<u64>(1, "id").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::BadInteger(_)));
        assert_eq!(err.lineno(), Some(9));
    }

    #[test]
    fn test_columns() {
        let line = Line {
            text: "   1.0000000000000000E+00  -2.5000000000000000E-01   3.0000000000000000D+02",
            lineno: 1,
        };
        assert_ulps_eq!(line.float_column(0, "x").unwrap(), 1.0);
        assert_ulps_eq!(line.float_column(1, "y").unwrap(), -0.25);
        assert_ulps_eq!(line.float_column(2, "z").unwrap(), 300.0);
        assert!(line.float_column(3, "w").is_err());
    }

    #[test]
    fn test_short_last_column() {
        let line = Line {
            text: "         5         1         1        11",
            lineno: 1,
        };
        assert_eq!(line.integer_column::<u64>(0, "id").unwrap(), 5);
        assert_eq!(line.integer_column::<u64>(3, "color").unwrap(), 11);

        let line = Line {
            text: "   1.5",
            lineno: 1,
        };
        assert_ulps_eq!(line.float_column(0, "x").unwrap(), 1.5);
        assert!(line.float_column(1, "y").is_err());
    }

    #[test]
    fn test_parse_float() {
        assert_ulps_eq!(parse_float(" 1.5D-01 ").unwrap(), 0.15);
        assert_ulps_eq!(parse_float("2.0d+00").unwrap(), 2.0);
        assert_ulps_eq!(parse_float("-7e2").unwrap(), -700.0);
        assert!(parse_float("").is_err());
        assert!(parse_float("abc").is_err());
    }
}
