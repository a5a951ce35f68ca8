//! @file token.rs
//! @brief Defines the `Token` structure and kind enum for preprocessing tokens.
//!
//! This module provides the `Token` structure, the smallest meaningful unit
//! handled by the macro expander, together with the `TokenKind` enum that
//! classifies it.
//!
//! @details
//! Besides its kind and literal text, a token carries three pieces of
//! expansion state: the `ws` flag (was the token preceded by whitespace in
//! its source), the `noexpand` flag (this particular token instance has been
//! painted blue and must never be expanded again), and the `pop` counter
//! (how many blacklist frames to release when the expansion driver advances
//! past this token). The end-of-input sentinel is not represented here; the
//! tokenizer reports it by ending the token sequence instead.

/// Classifies a preprocessing token.
///
/// # Variants
/// * `Identifier` - `[_A-Za-z][_A-Za-z0-9]*`; the only kind eligible for
///   macro replacement.
/// * `Stringify` - The `#` operator inside a function-like replacement list.
/// * `Paste` - The `##` operator inside any replacement list.
/// * `Placemarker` - Synthetic empty token that makes `##` well-defined for
///   empty arguments; never survives to output.
/// * `Other` - Everything else: pp-numbers, literals, punctuators, and any
///   stray non-whitespace character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Stringify,
    Paste,
    Placemarker,
    Other,
}

/// Represents one preprocessing token.
///
/// # Fields
/// * `kind` - The classification of the token, see `TokenKind`.
/// * `text` - The literal text; empty for `Stringify`, `Paste`, and
///   `Placemarker` tokens.
/// * `ws` - Whether at least one whitespace character preceded the token.
/// * `noexpand` - Whether this token instance is permanently excluded from
///   further macro replacement.
/// * `pop` - Number of blacklist frames to release when the expansion
///   cursor crosses this token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub ws: bool,
    pub noexpand: bool,
    pub pop: usize,
}

impl Token {
    /// Creates a new token with the given kind, text, and whitespace flag.
    ///
    /// # Arguments
    /// * `kind` - The token classification.
    /// * `text` - The literal text of the token.
    /// * `ws` - Whether whitespace preceded the token.
    ///
    /// # Returns
    /// * A token with clear `noexpand` state and a zero `pop` count.
    ///
    /// # Example
    /// ```rust
    /// use cpp_macro_expander::modules::tokenizer::token::{Token, TokenKind};
    ///
    /// let token = Token::new(TokenKind::Identifier, "foo", true);
    /// assert_eq!(token.text, "foo");
    /// assert!(token.ws);
    /// assert!(!token.noexpand);
    /// ```
    pub fn new(kind: TokenKind, text: &str, ws: bool) -> Self {
        Self {
            kind,
            text: text.to_string(),
            ws,
            noexpand: false,
            pop: 0,
        }
    }

    /// Creates a text-less operator token (`Stringify` or `Paste`).
    ///
    /// The `#` and `##` operators carry no literal text once recognized;
    /// their spelling is implied by the kind.
    pub fn operator(kind: TokenKind, ws: bool) -> Self {
        Self::new(kind, "", ws)
    }

    /// Creates a placemarker token.
    ///
    /// Placemarkers stand in for empty arguments on either side of `##`
    /// and are swept from the buffer once pasting is complete.
    pub fn placemarker(ws: bool) -> Self {
        Self::new(TokenKind::Placemarker, "", ws)
    }

    /// Releases this token's deferred blacklist frames.
    ///
    /// Pops `self.pop` names off `blacklist` and zeroes the counter; called
    /// exactly once per token as an expansion cursor crosses it.
    pub fn release_pops(&mut self, blacklist: &mut Vec<String>) {
        if self.pop > 0 {
            let keep = blacklist.len().saturating_sub(self.pop);
            blacklist.truncate(keep);
            self.pop = 0;
        }
    }
}
