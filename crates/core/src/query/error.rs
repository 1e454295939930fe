//! Refusals reported back to the console.

use thiserror::Error;

/// Reasons an invocation is refused before any entity is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Fewer tokens than a criterion plus a command.
    #[error("not enough arguments")]
    NotEnoughArguments,
    /// Criteria were given but no command follows them.
    #[error("missing command after match criteria")]
    MissingCommand,
    /// An operator with nothing after it, e.g. `speed>`.
    #[error("missing value after operator in '{0}'")]
    MissingOperand(String),
    /// The criterion key names a match that does not apply to this target.
    #[error("invalid match type '{0}' for this query")]
    InapplicableMatch(String),
    /// The command name is unknown or an ambiguous prefix.
    #[error("invalid command '{0}'")]
    UnknownCommand(String),
    /// The command needs more parameters than were supplied.
    #[error("command '{command}' requires {required} additional parameter(s)")]
    MissingParameters {
        /// Canonical command name.
        command: &'static str,
        /// Parameters the command needs.
        required: usize,
    },
    /// The command exists but not for this target.
    #[error("the command '{command}' cannot be applied to {noun}")]
    InapplicableCommand {
        /// Canonical command name.
        command: &'static str,
        /// Target noun, e.g. `road vehicle`.
        noun: &'static str,
    },
    /// Vehicle commands act on the operator's own fleet.
    #[error("you have to own a company to make use of this command")]
    NoCompany,
    /// Command restricted to the scenario editor.
    #[error("command '{0}' can be used only in scenario editor")]
    EditorOnly(&'static str),
    /// Deleting entities is refused while other players are connected.
    #[error("deleting a {0} is not allowed in a networked game")]
    NetworkedDelete(&'static str),
    /// The first token is not a query keyword.
    #[error("unknown target '{0}'")]
    UnknownTarget(String),
}

impl QueryError {
    /// Whether the front-end should print usage after reporting this error.
    pub fn reprint_usage(&self) -> bool {
        matches!(
            self,
            QueryError::NotEnoughArguments
                | QueryError::MissingCommand
                | QueryError::UnknownCommand(_)
        )
    }
}
