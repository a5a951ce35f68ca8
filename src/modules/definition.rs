//! @file definition.rs
//! @brief Macro definitions: parsing, parameter lookup, and validation.
//!
//! @details
//! A definition string arrives in the DWARF `.debug_macro` convention, with
//! the leading `#define ` already stripped:
//!
//! - `NAME`: object-like macro with an empty replacement.
//! - `NAME replacement`: object-like macro with a body.
//! - `NAME(p1,p2) replacement`: function-like macro.
//!
//! An absent parameter list (object-like) is an empty parameter vector; an
//! empty parameter list (`NAME()`) is a one-element vector holding the
//! empty string. A variadic macro has the literal `...` as its last
//! parameter, and `__VA_ARGS__` in the replacement binds to it.

use std::cell::Cell;

use super::error::{ExpandError, Result};
use super::tokenizer::{tokenize, TokenKind};
use log::debug;

/// One macro definition: name, parameters, and raw replacement text.
///
/// The replacement stays a string until an expansion needs it; validation
/// of the replacement list happens on first use and is memoized in the
/// `checked` cell, so a table full of definitions only pays for the ones
/// actually expanded.
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    pub params: Vec<String>,
    pub repl: String,
    checked: Cell<bool>,
}

impl Definition {
    /// Creates a definition from already-separated pieces.
    pub fn new(name: &str, params: Vec<String>, repl: &str) -> Self {
        Self {
            name: name.to_string(),
            params,
            repl: repl.to_string(),
            checked: Cell::new(false),
        }
    }

    /// Parses a DWARF-style definition string.
    ///
    /// The first space separates the macro name (and parameter list, if
    /// any) from the replacement text; a `)` immediately before that space
    /// signals a parameter list, which is split on `,` up to the first `)`.
    /// Parameter names may be empty.
    ///
    /// # Arguments
    /// * `def` - The definition string, e.g. `"MAX(a,b) ((a)>(b)?(a):(b))"`.
    ///
    /// # Returns
    /// * The parsed `Definition`. No validation of the replacement list
    ///   happens here; see `check`.
    ///
    /// # Example
    /// ```rust
    /// use cpp_macro_expander::modules::definition::Definition;
    ///
    /// let def = Definition::parse("A(x,y) {x}{y}");
    /// assert_eq!(def.name, "A");
    /// assert_eq!(def.params, vec!["x".to_string(), "y".to_string()]);
    /// assert_eq!(def.repl, "{x}{y}");
    /// ```
    pub fn parse(def: &str) -> Self {
        // First space (if any) separates name and parameters from the
        // replacement text.
        let space = match def.find(' ') {
            Some(space) => space,
            // A bare name: object-like, empty replacement.
            None => return Self::new(def, Vec::new(), ""),
        };

        let repl = &def[space + 1..];
        let mut params = Vec::new();
        let name;

        if space > 0 && def.as_bytes()[space - 1] == b')' {
            // A parameter list is present; it runs from the first `(` to
            // the first `)`.
            let paren = def.find('(').unwrap_or(space);
            let close = def[paren..].find(')').map_or(space - 1, |i| paren + i);
            for piece in def[paren + 1..close].split(',') {
                params.push(piece.to_string());
            }
            name = &def[..paren];
        } else {
            name = &def[..space];
        }

        Self::new(name, params, repl)
    }

    /// Whether the last declared parameter is the literal `...`.
    pub fn is_variadic(&self) -> bool {
        self.params.last().map_or(false, |p| p == "...")
    }

    /// Resolves an identifier to a parameter position.
    ///
    /// `__VA_ARGS__` resolves to the trailing `...` parameter of a variadic
    /// macro; every other name must match a declared parameter exactly.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        if let Some(index) = self.params.iter().position(|p| p == name) {
            return Some(index);
        }
        if name == "__VA_ARGS__" && self.is_variadic() {
            return Some(self.params.len() - 1);
        }
        None
    }

    /// Validates the replacement list, memoizing success.
    ///
    /// Performed on first use of the definition rather than at insertion,
    /// and cached so rescans do not re-tokenize the replacement. Rejects:
    /// `##` at either end of the replacement, `#` not followed by a
    /// parameter name (function-like only; object-like `#` is an ordinary
    /// token), and `__VA_ARGS__` outside a variadic macro.
    ///
    /// # Returns
    /// * `Ok(())` when the replacement list is well-formed.
    /// * The specific `ExpandError` otherwise; the memo stays unset so the
    ///   error is reported again on the next use.
    pub fn check(&self) -> Result<()> {
        if self.checked.get() {
            return Ok(());
        }

        let tokens = tokenize(&self.repl, !self.params.is_empty(), true)?;
        if tokens.first().map_or(false, |t| t.kind == TokenKind::Paste)
            || tokens.last().map_or(false, |t| t.kind == TokenKind::Paste)
        {
            debug!("check: '##' at an end of the replacement of {}", self.name);
            return Err(ExpandError::PasteAtEdge);
        }

        let variadic = self.is_variadic();
        for (index, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Stringify => {
                    let names_param = tokens
                        .get(index + 1)
                        .filter(|t| t.kind == TokenKind::Identifier)
                        .map_or(false, |t| self.param_index(&t.text).is_some());
                    if !names_param {
                        debug!("check: stray '#' in the replacement of {}", self.name);
                        return Err(ExpandError::StringifyWithoutParameter);
                    }
                }
                TokenKind::Identifier if token.text == "__VA_ARGS__" && !variadic => {
                    debug!("check: '__VA_ARGS__' in non-variadic {}", self.name);
                    return Err(ExpandError::UnexpectedVaArgs);
                }
                _ => {}
            }
        }

        self.checked.set(true);
        Ok(())
    }
}
