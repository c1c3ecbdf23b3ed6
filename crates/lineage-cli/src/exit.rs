//! Process exit codes and the failures that carry them.

use std::fmt::Display;
use std::io;
use std::process::ExitCode;

use colored::Colorize;

/// Exit status of a `lineage` invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Code {
    Success = 0,
    /// The query ran but had no positive answer.
    NotFound = 1,
    NotImplemented = 9,
    WrongSyntax = 11,
    NotARepository = 12,
    BadRevision = 13,
    Traversal = 14,
    CommitNotFound = 15,
    Unexpected = 16,
    /// A known failure mode, such as a refused merge.
    Failed = 17,
}

impl From<Code> for ExitCode {
    fn from(code: Code) -> Self {
        ExitCode::from(code as u8)
    }
}

/// An error paired with the exit code it maps to.
#[derive(Debug)]
pub struct Failure {
    pub code: Code,
    pub error: anyhow::Error,
}

impl Failure {
    pub fn new(code: Code, error: anyhow::Error) -> Self {
        Self { code, error }
    }

    /// A failure with no underlying cause.
    pub fn message(code: Code, message: impl Display) -> Self {
        Self::new(code, anyhow::anyhow!("{message}"))
    }

    /// Print the message and its causes to stderr.
    pub fn report(&self) {
        eprintln!("{}", format!("error: {}", self.error).red());
        for cause in self.error.chain().skip(1) {
            eprintln!("  {cause}");
        }
    }
}

impl From<io::Error> for Failure {
    fn from(err: io::Error) -> Self {
        Self::new(
            Code::Unexpected,
            anyhow::Error::new(err).context("could not write output"),
        )
    }
}

/// Attach an exit code and a message to an error.
pub trait ExitContext<T> {
    fn exit_with<M, F>(self, code: Code, message: F) -> Result<T, Failure>
    where
        M: Display + Send + Sync + 'static,
        F: FnOnce() -> M;
}

impl<T, E> ExitContext<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn exit_with<M, F>(self, code: Code, message: F) -> Result<T, Failure>
    where
        M: Display + Send + Sync + 'static,
        F: FnOnce() -> M,
    {
        self.map_err(|err| Failure::new(code, err.into().context(message())))
    }
}
