//! @file arguments.rs
//! @brief Collects the arguments of a function-like macro invocation.
//!
//! @details
//! Starting from the opening `(`, the gatherer slices the token buffer at
//! level-1 commas into per-argument token lists, until the parenthesis
//! nesting level returns to zero. Once a variadic invocation has reached
//! its trailing parameter, further level-1 commas belong to the argument
//! text instead of separating arguments.
//!
//! Every token passed over has its deferred blacklist pops applied first,
//! so the blacklist reflects the position of the gathering cursor; the
//! copies stored into the argument lists carry a zero `pop` count.

use super::definition::Definition;
use super::error::{ExpandError, Result};
use super::tokenizer::{Token, TokenKind};
use log::debug;

/// Gathers the arguments of an invocation of `def`.
///
/// # Arguments
/// * `buffer` - The working token buffer.
/// * `open` - Index of the opening `(` of the invocation.
/// * `def` - The definition being invoked; supplies the parameter count,
///   the variadic flag, and the name used in diagnostics.
/// * `blacklist` - The shared blacklist stack; deferred pops of every
///   token crossed are applied to it.
///
/// # Returns
/// * `Ok((args, end))` where `args` holds one token list per argument
///   (empty arguments included, an implicit empty `__VA_ARGS__` appended
///   when a variadic invocation omits it) and `end` is the buffer index
///   just past the closing `)`.
/// * `Err(...)` when the closing parenthesis is missing or the argument
///   count does not satisfy the definition.
pub fn gather_arguments(
    buffer: &mut [Token],
    open: usize,
    def: &Definition,
    blacklist: &mut Vec<String>,
) -> Result<(Vec<Vec<Token>>, usize)> {
    let named = def.params.len();
    let variadic = def.is_variadic();
    let mut args: Vec<Vec<Token>> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut level = 0usize;
    let mut pos = open;

    loop {
        let Some(token) = buffer.get_mut(pos) else {
            return Err(ExpandError::MissingClosingParen(def.name.clone()));
        };
        token.release_pops(blacklist);

        if token.kind == TokenKind::Other {
            match token.text.as_str() {
                "(" => {
                    level += 1;
                    if level == 1 {
                        // The invocation's own parenthesis opens the first
                        // argument slice but is part of none.
                        pos += 1;
                        continue;
                    }
                }
                ")" => {
                    level -= 1;
                    if level == 0 {
                        args.push(current);
                        pos += 1;
                        break;
                    }
                }
                "," if level == 1 => {
                    // Commas stop separating once a variadic invocation is
                    // inside its trailing parameter.
                    if !(variadic && args.len() + 1 == named) {
                        args.push(std::mem::take(&mut current));
                        pos += 1;
                        continue;
                    }
                }
                _ => {}
            }
        }

        current.push(token.clone());
        pos += 1;
    }

    debug!(
        "gather_arguments: {} argument(s) for {} (named {}, variadic {})",
        args.len(),
        def.name,
        named,
        variadic
    );

    if variadic {
        if args.len() + 1 < named {
            return Err(ExpandError::InsufficientArguments(def.name.clone()));
        }
        if args.len() + 1 == named {
            // `__VA_ARGS__` was omitted entirely; it expands to nothing.
            args.push(Vec::new());
        }
    } else if named == 1 && def.params[0].is_empty() {
        // A `FOO()` macro takes exactly one empty argument.
        if args.len() > 1 || !args[0].is_empty() {
            return Err(ExpandError::TooManyArguments(def.name.clone()));
        }
    } else if args.len() < named {
        return Err(ExpandError::InsufficientArguments(def.name.clone()));
    } else if args.len() > named {
        return Err(ExpandError::TooManyArguments(def.name.clone()));
    }

    Ok((args, pos))
}
