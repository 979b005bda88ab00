use std::fmt;
use std::num::ParseIntError;
use std::str::SplitWhitespace;

/// Marker of an insertion command: `k <key>`.
pub const INSERT_MARKER: &str = "k";
/// Marker of a range query command: `q <lo> <hi>`.
pub const QUERY_MARKER: &str = "q";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Insert(i64),
    Query { lo: i64, hi: i64 },
}

/// A malformed command. `position` is the 1-based index of the offending token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandError {
    UnknownMarker { position: usize, token: String },
    MissingOperand { position: usize, marker: &'static str },
    InvalidOperand { position: usize, token: String, source: ParseIntError },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownMarker { position, token } => write!(
                f,
                "token {position}: expected `{INSERT_MARKER}` or `{QUERY_MARKER}`, found `{token}`"
            ),
            CommandError::MissingOperand { position, marker } => {
                write!(f, "token {position}: input ended before the operands of `{marker}`")
            }
            CommandError::InvalidOperand { position, token, .. } => {
                write!(f, "token {position}: `{token}` is not an integer")
            }
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::InvalidOperand { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parses whitespace-delimited commands, yielding each as soon as it is complete.
///
/// Parsing stops after the first error.
pub struct Commands<'a> {
    tokens: SplitWhitespace<'a>,
    position: usize,
    failed: bool,
}

impl<'a> Commands<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: input.split_whitespace(),
            position: 0,
            failed: false,
        }
    }

    fn operand(&mut self, marker: &'static str) -> Result<i64, CommandError> {
        let Some(token) = self.tokens.next() else {
            return Err(CommandError::MissingOperand {
                position: self.position + 1,
                marker,
            });
        };
        self.position += 1;
        token.parse().map_err(|source| CommandError::InvalidOperand {
            position: self.position,
            token: token.to_owned(),
            source,
        })
    }

    fn command(&mut self, marker: &str) -> Result<Command, CommandError> {
        match marker {
            INSERT_MARKER => Ok(Command::Insert(self.operand(INSERT_MARKER)?)),
            QUERY_MARKER => {
                let lo = self.operand(QUERY_MARKER)?;
                let hi = self.operand(QUERY_MARKER)?;
                Ok(Command::Query { lo, hi })
            }
            _ => Err(CommandError::UnknownMarker {
                position: self.position,
                token: marker.to_owned(),
            }),
        }
    }
}

impl Iterator for Commands<'_> {
    type Item = Result<Command, CommandError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let marker = self.tokens.next()?;
        self.position += 1;

        let command = self.command(marker);
        self.failed = command.is_err();
        Some(command)
    }
}
