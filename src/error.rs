use crate::id::FileId;
use crate::id::IdSpace;
use std::error;
use std::fmt;
use std::io;
use std::num;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ErrorKind {
    FileNotFound(PathBuf),
    NotARegularFile(PathBuf),
    /// The input uses CRLF line endings on a platform that expects LF.
    IncompatibleLineEndings,
    UnexpectedEof {
        expected: &'static str,
    },
    /// A line ended before the field holding `expected`.
    MissingField {
        expected: &'static str,
    },
    BadInteger(num::ParseIntError),
    BadFloat(num::ParseFloatError),
    UnknownElementType(u32),
    /// A record references an id that no vertex or element record declared.
    MissingRemapKey {
        space: IdSpace,
        id: FileId,
    },
    Io(io::Error),
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    lineno: usize,
}

impl Error {
    pub(crate) fn at(lineno: usize, kind: impl Into<ErrorKind>) -> Error {
        Error {
            kind: kind.into(),
            lineno,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The 1-based line the error was raised on, if known.
    pub fn lineno(&self) -> Option<usize> {
        if self.lineno == 0 {
            None
        } else {
            Some(self.lineno)
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::FileNotFound(path) => write!(f, "{} does not exist", path.display()),
            ErrorKind::NotARegularFile(path) => {
                write!(f, "{} is not a regular file", path.display())
            }
            ErrorKind::IncompatibleLineEndings => write!(
                f,
                "file has Windows line endings, convert it to UNIX line endings"
            ),
            ErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of file, expected {expected}")
            }
            ErrorKind::MissingField { expected } => write!(f, "missing field {expected}"),
            ErrorKind::BadInteger(err) => write!(f, "when parsing integer: {}", err),
            ErrorKind::BadFloat(err) => write!(f, "when parsing float: {}", err),
            ErrorKind::UnknownElementType(code) => {
                write!(f, "unknown element descriptor {code}")
            }
            ErrorKind::MissingRemapKey { space, id } => {
                write!(f, "reference to undeclared {space} {id}")
            }
            ErrorKind::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lineno() {
            Some(lineno) => write!(f, "at line {}: {}", lineno, self.kind),
            None => self.kind.fmt(f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::BadInteger(err) => Some(err),
            ErrorKind::BadFloat(err) => Some(err),
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, lineno: 0 }
    }
}

impl From<io::Error> for ErrorKind {
    fn from(err: io::Error) -> ErrorKind {
        ErrorKind::Io(err)
    }
}

impl From<num::ParseIntError> for ErrorKind {
    fn from(err: num::ParseIntError) -> ErrorKind {
        ErrorKind::BadInteger(err)
    }
}

impl From<num::ParseFloatError> for ErrorKind {
    fn from(err: num::ParseFloatError) -> ErrorKind {
        ErrorKind::BadFloat(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::from(ErrorKind::Io(err))
    }
}

impl From<num::ParseIntError> for Error {
    fn from(err: num::ParseIntError) -> Error {
        Error::from(ErrorKind::BadInteger(err))
    }
}

impl From<num::ParseFloatError> for Error {
    fn from(err: num::ParseFloatError) -> Error {
        Error::from(ErrorKind::BadFloat(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
