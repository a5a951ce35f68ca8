//! @file tokenizer_logic.rs
//! @brief Context-sensitive tokenization into preprocessing tokens.
//!
//! This module turns a character sequence into the token list consumed by
//! the expansion driver. Two context flags decide how the `#` family is
//! interpreted:
//!
//! - `replacement` false: `#` and `##` are ordinary punctuators (`Other`).
//! - `replacement` true, `func_like` false: `#` collapses to `Other` while
//!   `##` stays a `Paste` operator (object-like macros may paste but may
//!   not stringify).
//! - `replacement` true, `func_like` true: `#` is `Stringify`, `##` is
//!   `Paste`.
//!
//! @version 1.0

use super::scanner::scan_pp_token;
use super::token::{Token, TokenKind};
use crate::modules::error::Result;
use log::debug;

/// Tokenizes `input` into a vector of preprocessing tokens.
///
/// The end-of-input sentinel never enters the returned list; the list just
/// ends. Trailing whitespace is consumed and attached to no token.
///
/// # Arguments
/// * `input` - The character sequence to split.
/// * `func_like` - Whether `input` is the replacement of a function-like
///   macro (enables `#` as the stringify operator).
/// * `replacement` - Whether `input` is any macro replacement (enables
///   `##` as the paste operator).
///
/// # Returns
/// * `Ok(Vec<Token>)` with one entry per preprocessing token.
/// * `Err(ExpandError::InvalidToken)` when the scanner refuses to advance.
pub fn tokenize(input: &str, func_like: bool, replacement: bool) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(scanned) = scan_pp_token(input, pos)? {
        pos = scanned.end;
        let text = &input[scanned.start..scanned.end];
        let token = match scanned.kind {
            TokenKind::Stringify if replacement && func_like => {
                Token::operator(TokenKind::Stringify, scanned.ws)
            }
            TokenKind::Paste if replacement => Token::operator(TokenKind::Paste, scanned.ws),
            // Outside the context that makes them operators, `#` and `##`
            // are ordinary tokens carrying their spelling.
            TokenKind::Stringify | TokenKind::Paste => {
                Token::new(TokenKind::Other, text, scanned.ws)
            }
            kind => Token::new(kind, text, scanned.ws),
        };
        tokens.push(token);
    }

    debug!(
        "tokenize: {} tokens from {:?} (func_like={}, replacement={})",
        tokens.len(),
        input,
        func_like,
        replacement
    );
    Ok(tokens)
}
