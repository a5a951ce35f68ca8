//! @file substitution.rs
//! @brief Parameter substitution and the `#` stringify operator.
//!
//! @details
//! Works on a fresh function-like tokenization of a replacement list.
//! Parameters adjacent to a `##` operator substitute "raw": the argument
//! tokens splice in unexpanded, and an empty argument leaves a placemarker
//! so pasting stays well-defined. Every other parameter substitutes
//! "expanded": a copy of the argument is run through the full expansion
//! driver first, with the blacklist depth restored afterwards so pushes
//! made inside the argument cannot leak out.
//!
//! Stringification always works on the unexpanded argument.

use super::definition::Definition;
use super::error::{ExpandError, Result};
use super::expander::expand;
use super::macro_table::MacroTable;
use super::tokenizer::{Token, TokenKind};
use log::debug;

/// Converts an unexpanded argument token list into a string-literal token
/// text, per the `#` operator rules.
///
/// Token texts are joined with a single space wherever the right-hand
/// token carries the whitespace flag; the first token never produces a
/// leading space. Inside string-literal and character-constant tokens
/// every `\` and `"` is escaped. Operator tokens that traveled into the
/// argument spell themselves (`#`, `##`); placemarkers spell nothing.
pub fn stringify_argument(arg: &[Token]) -> String {
    let mut literal = String::from("\"");
    let mut first = true;

    for token in arg {
        if token.kind == TokenKind::Placemarker {
            continue;
        }
        if !first && token.ws {
            literal.push(' ');
        }
        match token.kind {
            TokenKind::Stringify => literal.push('#'),
            TokenKind::Paste => literal.push_str("##"),
            _ => {
                if token.text.starts_with('"') || token.text.starts_with('\'') {
                    for ch in token.text.chars() {
                        if ch == '"' || ch == '\\' {
                            literal.push('\\');
                        }
                        literal.push(ch);
                    }
                } else {
                    literal.push_str(&token.text);
                }
            }
        }
        first = false;
    }

    literal.push('"');
    literal
}

/// Substitutes `def`'s parameters in `replacement` with the gathered
/// `args`, applying the rescan-or-not rule and the `#` operator.
///
/// # Arguments
/// * `replacement` - Fresh function-like tokenization of the replacement
///   list; rewritten in place.
/// * `def` - The invoked definition (parameter names, variadic flag).
/// * `args` - One unexpanded token list per argument.
/// * `macros`, `lineno` - Lookup context for expanding argument copies.
/// * `blacklist` - The shared blacklist stack; its depth is restored
///   around each argument expansion.
pub fn substitute(
    replacement: &mut Vec<Token>,
    def: &Definition,
    args: &[Vec<Token>],
    macros: &MacroTable,
    lineno: u32,
    blacklist: &mut Vec<String>,
) -> Result<()> {
    let mut pos = 0;

    while pos < replacement.len() {
        match replacement[pos].kind {
            TokenKind::Identifier => {
                let Some(index) = def.param_index(&replacement[pos].text) else {
                    pos += 1;
                    continue;
                };
                let arg = &args[index];
                let ws = replacement[pos].ws;

                let beside_paste = (pos > 0 && replacement[pos - 1].kind == TokenKind::Paste)
                    || replacement
                        .get(pos + 1)
                        .map_or(false, |t| t.kind == TokenKind::Paste);

                if beside_paste {
                    // Raw substitution: the paste operator needs the tokens
                    // as written, or a placemarker when there are none.
                    if arg.is_empty() {
                        replacement[pos] = Token::placemarker(ws);
                        pos += 1;
                    } else {
                        let len = arg.len();
                        replacement.splice(pos..pos + 1, arg.iter().cloned());
                        replacement[pos].ws = ws;
                        pos += len;
                    }
                } else {
                    // Expanded substitution: run the driver over a copy of
                    // the argument, keeping blacklist pushes contained.
                    let mut copy = arg.clone();
                    let depth = blacklist.len();
                    expand(&mut copy, macros, lineno, blacklist)?;
                    blacklist.truncate(depth);

                    debug!(
                        "substitute: parameter {} of {} expanded to {} token(s)",
                        replacement[pos].text,
                        def.name,
                        copy.len()
                    );
                    let len = copy.len();
                    replacement.splice(pos..pos + 1, copy);
                    if len == 0 {
                        if let Some(next) = replacement.get_mut(pos) {
                            next.ws |= ws;
                        }
                    } else {
                        replacement[pos].ws = ws;
                        pos += len;
                    }
                }
            }
            TokenKind::Stringify => {
                // Validation guarantees a parameter name follows; resolve it
                // defensively all the same.
                let index = replacement
                    .get(pos + 1)
                    .filter(|t| t.kind == TokenKind::Identifier)
                    .and_then(|t| def.param_index(&t.text))
                    .ok_or(ExpandError::StringifyWithoutParameter)?;
                let ws = replacement[pos].ws;
                let literal = stringify_argument(&args[index]);
                replacement[pos] = Token::new(TokenKind::Other, &literal, ws);
                replacement.remove(pos + 1);
                pos += 1;
            }
            _ => pos += 1,
        }
    }

    Ok(())
}
