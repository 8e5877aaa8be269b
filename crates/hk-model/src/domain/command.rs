use std::{fmt, str::FromStr};

use crate::ModelError;

/// Producer command split into program and arguments.
///
/// Tokenization is plain whitespace splitting: there is no quoting or
/// escaping, so `echo "a b"` yields the arguments `"a` and `b"`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Split `line` on whitespace. The first token is the program.
    pub fn parse(line: &str) -> Result<Self, ModelError> {
        let mut tokens = line.split_whitespace().map(str::to_owned);
        let program = tokens.next().ok_or(ModelError::EmptyCommand)?;
        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }

    #[inline]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl FromStr for CommandLine {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
