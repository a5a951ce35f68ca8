//! @file error.rs
//! @brief Failure kinds surfaced by tokenization and macro expansion.
//!
//! Every failure aborts the enclosing `macro_expand` call; there is no
//! partial-output mode and no recovery. The directive table itself is left
//! unchanged by a failed expansion.

use thiserror::Error;

/// Errors produced while tokenizing input or replacing macros.
///
/// Diagnostics are plain human-readable strings; callers that only need a
/// message can rely on the `Display` implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// The scanner could not advance on a character (unterminated literal,
    /// bad escape sequence, and the like).
    #[error("invalid preprocessing token at byte offset {0}")]
    InvalidToken(usize),

    /// A replacement list begins or ends with `##`.
    #[error("'##' cannot appear at either end of a replacement list")]
    PasteAtEdge,

    /// A `#` operator is not followed by a macro parameter name.
    #[error("'#' is not followed by a macro parameter")]
    StringifyWithoutParameter,

    /// `__VA_ARGS__` appears in the replacement of a non-variadic macro.
    #[error("'__VA_ARGS__' may only appear in a variadic macro replacement")]
    UnexpectedVaArgs,

    /// A function-like invocation ran off the end of the input before its
    /// closing parenthesis.
    #[error("missing ')' in invocation of macro '{0}'")]
    MissingClosingParen(String),

    /// More arguments were supplied than the macro declares.
    #[error("too many arguments in invocation of macro '{0}'")]
    TooManyArguments(String),

    /// Fewer arguments were supplied than the macro declares.
    #[error("insufficient arguments in invocation of macro '{0}'")]
    InsufficientArguments(String),

    /// `##` produced text that does not re-lex to exactly one token.
    #[error("pasting produced '{0}', which is not a valid preprocessing token")]
    InvalidPaste(String),

    /// A `##` operator survived replacement and reached serialization.
    /// Possible when an object-like body carries a `##` whose paste was
    /// deferred as invalid and no later context consumed it.
    #[error("a '##' operator survived macro replacement")]
    DanglingPaste,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ExpandError>;
