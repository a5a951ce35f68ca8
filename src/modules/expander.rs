//! @file expander.rs
//! @brief The rescan-and-replace expansion driver.
//!
//! @details
//! The driver walks a mutable token buffer left to right. Identifiers with
//! an active definition are replaced in place and the cursor backs up to
//! rescan the spliced tokens, so replacements can trigger further
//! replacements. Self-recursion is cut off by the blacklist: expanding a
//! macro pushes its name, and the name is released only when the cursor
//! crosses the first token *after* the spliced region, via a deferred pop
//! recorded in that token's `pop` counter. Later splices may displace the
//! region, but the counter travels with the token. An identifier rejected
//! by the blacklist is painted blue (`noexpand`) and stays inert for the
//! rest of its life, even if it escapes into a context where its macro is
//! expandable again.
//!
//! Both macro shapes run the `##` paster over their replacement before
//! splicing: function-like replacements after parameter substitution, in
//! strict mode, and object-like replacements directly after tokenization,
//! in lenient mode. Lenient pasting concatenates wherever the result is a
//! single token (the `hash_hash` body `# ## #` folds to one `##` token at
//! expansion time) and otherwise leaves the operands and the operator in
//! place, where an argument position can still stringify them back to
//! their spelling (`A(# ##)` stringifies to `"# ##"`).

use super::arguments::gather_arguments;
use super::definition::Definition;
use super::error::{ExpandError, Result};
use super::macro_table::MacroTable;
use super::paste::{paste_tokens, PasteMode};
use super::substitution::substitute;
use super::tokenizer::{tokenize, Token, TokenKind};
use log::debug;

#[cfg(test)]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Expands every macro invocation in `input` against `macros`.
///
/// The input is tokenized in non-replacement mode, so `#` and `##` are
/// ordinary punctuators. A `lineno` of 0 queries the final state of the
/// table; otherwise only directives before `lineno` are active.
///
/// # Arguments
/// * `input` - The character sequence to expand.
/// * `macros` - The directive table consulted for each identifier.
/// * `lineno` - The query line anchoring table lookups.
///
/// # Returns
/// * `Ok(String)` with the fully replaced text: token texts joined with a
///   single space wherever the token had leading whitespace.
/// * `Err(...)` on any tokenization, validation, or expansion failure; no
///   partial output is produced.
///
/// # Example
/// ```rust
/// use cpp_macro_expander::modules::expander::macro_expand;
/// use cpp_macro_expander::modules::macro_table::MacroTable;
///
/// let mut macros = MacroTable::new();
/// macros.add_define(1, "A(x) { x }");
/// let out = macro_expand("A( a )", &macros, 0).unwrap();
/// assert_eq!(out, "{ a }");
/// ```
pub fn macro_expand(input: &str, macros: &MacroTable, lineno: u32) -> Result<String> {
    debug!("macro_expand: line {} input {:?}", lineno, input);

    let mut buffer = tokenize(input, false, false)?;
    let mut blacklist = Vec::new();
    expand(&mut buffer, macros, lineno, &mut blacklist)?;

    let output = serialize(&buffer)?;
    debug!("macro_expand: output {:?}", output);
    Ok(output)
}

/// Runs the rescan loop over `buffer` until no replacement applies.
///
/// Shared by `macro_expand` and by argument expansion, which passes the
/// same blacklist through so paint applied inside an argument is visible
/// to the tokens that come back out.
pub fn expand(
    buffer: &mut Vec<Token>,
    macros: &MacroTable,
    lineno: u32,
    blacklist: &mut Vec<String>,
) -> Result<()> {
    let mut pos = 0;

    while pos < buffer.len() {
        buffer[pos].release_pops(blacklist);

        if buffer[pos].kind != TokenKind::Identifier || buffer[pos].noexpand {
            pos += 1;
            continue;
        }
        if blacklist.iter().any(|name| *name == buffer[pos].text) {
            // Painted blue: this token instance never expands again.
            debug!("expand: {} is blacklisted, painting", buffer[pos].text);
            buffer[pos].noexpand = true;
            pos += 1;
            continue;
        }
        let Some(def) = macros.find_define(lineno, &buffer[pos].text) else {
            pos += 1;
            continue;
        };

        if def.params.is_empty() {
            expand_object_like(buffer, pos, def, blacklist)?;
            continue;
        }

        // A function-like macro name not followed by `(` is left alone.
        let invoked = buffer
            .get(pos + 1)
            .map_or(false, |t| t.kind == TokenKind::Other && t.text == "(");
        if !invoked {
            pos += 1;
            continue;
        }

        def.check()?;
        let name_ws = buffer[pos].ws;
        let (args, end) = gather_arguments(buffer, pos + 1, def, blacklist)?;

        let mut replacement = tokenize(&def.repl, true, true)?;
        substitute(&mut replacement, def, &args, macros, lineno, blacklist)?;
        paste_tokens(&mut replacement, PasteMode::Strict)?;
        debug!(
            "expand: {} replaced by {} token(s)",
            def.name,
            replacement.len()
        );

        if replacement.is_empty() {
            buffer.drain(pos..end);
            if let Some(next) = buffer.get_mut(pos) {
                next.ws |= name_ws;
            }
            continue;
        }

        blacklist.push(def.name.clone());
        let len = replacement.len();
        buffer.splice(pos..end, replacement);
        buffer[pos].ws = name_ws;
        if let Some(follow) = buffer.get_mut(pos + len) {
            follow.pop += 1;
        }
        // Rescan from the start of the spliced region.
    }

    Ok(())
}

// Replaces the object-like macro name at `pos` with its tokenized and
// pasted replacement. No parameter substitution happens here, and the
// paster runs leniently: an unpastable `##` stays in the buffer.
fn expand_object_like(
    buffer: &mut Vec<Token>,
    pos: usize,
    def: &Definition,
    blacklist: &mut Vec<String>,
) -> Result<()> {
    def.check()?;
    let mut replacement = tokenize(&def.repl, false, true)?;
    paste_tokens(&mut replacement, PasteMode::Lenient)?;
    let ws = buffer[pos].ws;
    debug!(
        "expand: {} replaced by {} token(s)",
        def.name,
        replacement.len()
    );

    if replacement.is_empty() {
        buffer.remove(pos);
        if let Some(next) = buffer.get_mut(pos) {
            next.ws |= ws;
        }
        return Ok(());
    }

    blacklist.push(def.name.clone());
    let len = replacement.len();
    buffer.splice(pos..pos + 1, replacement);
    buffer[pos].ws = ws;
    if let Some(follow) = buffer.get_mut(pos + len) {
        follow.pop += 1;
    }
    Ok(())
}

// Serializes the final buffer: a single space before any token whose ws
// flag is set, then the token text. Only identifiers and ordinary tokens
// may remain at this point.
fn serialize(buffer: &[Token]) -> Result<String> {
    let mut output = String::new();
    for token in buffer {
        match token.kind {
            TokenKind::Identifier | TokenKind::Other => {}
            _ => return Err(ExpandError::DanglingPaste),
        }
        if token.ws {
            output.push(' ');
        }
        output.push_str(&token.text);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// @test Verifies tokens without active defines pass through, with
    /// whitespace runs collapsed to single spaces.
    #[test]
    fn test_pass_through() {
        init_logger();
        let macros = MacroTable::new();
        assert_eq!(macro_expand("a  +   b", &macros, 0).unwrap(), "a + b");
        assert_eq!(macro_expand("  a", &macros, 0).unwrap(), " a");
        assert_eq!(macro_expand("a ", &macros, 0).unwrap(), "a");
    }

    /// @test Verifies self-recursion stops after one replacement.
    #[test]
    fn test_self_recursion_is_painted() {
        let mut macros = MacroTable::new();
        macros.add_define(1, "A A");
        assert_eq!(macro_expand("A", &macros, 0).unwrap(), "A");

        let mut macros = MacroTable::new();
        macros.add_define(1, "A B");
        macros.add_define(2, "B A");
        assert_eq!(macro_expand("A", &macros, 0).unwrap(), "A");
        assert_eq!(macro_expand("B", &macros, 0).unwrap(), "B");
    }

    /// @test Verifies the deferred pops drain the blacklist by the end of
    /// a full driver run.
    #[test]
    fn test_blacklist_drains() {
        let mut macros = MacroTable::new();
        macros.add_define(1, "A a");
        macros.add_define(2, "B A x A");
        let mut buffer = tokenize("B y B", false, false).unwrap();
        let mut blacklist = Vec::new();
        expand(&mut buffer, &macros, 0, &mut blacklist).unwrap();
        assert!(buffer.iter().all(|t| t.pop == 0));
        assert_eq!(serialize(&buffer).unwrap(), "a x a y a x a");
    }

    /// @test Verifies `##` in an object-like body concatenates its
    /// neighbours at expansion time.
    #[test]
    fn test_object_like_paste() {
        let mut macros = MacroTable::new();
        macros.add_define(1, "AB a ## b");
        macros.add_define(2, "HH # ## #");
        assert_eq!(macro_expand("AB", &macros, 0).unwrap(), "ab");
        assert_eq!(macro_expand("x HH y", &macros, 0).unwrap(), "x ## y");
    }

    /// @test Verifies an unpastable `##` deferred out of an object-like
    /// body is reported if it reaches the output unconsumed.
    #[test]
    fn test_dangling_paste_is_reported() {
        let mut macros = MacroTable::new();
        macros.add_define(1, "BAD a ## ;");
        assert_eq!(
            macro_expand("BAD", &macros, 0),
            Err(ExpandError::DanglingPaste)
        );
    }

    /// @test Verifies malformed replacements are rejected on first use and
    /// leave the table intact.
    #[test]
    fn test_malformed_replacement() {
        let mut macros = MacroTable::new();
        macros.add_define(1, "BAD(x) x ##");
        macros.add_define(2, "GOOD g");
        assert_eq!(
            macro_expand("BAD(1)", &macros, 0),
            Err(ExpandError::PasteAtEdge)
        );
        // The failed expansion does not poison later lookups.
        assert_eq!(macro_expand("GOOD", &macros, 0).unwrap(), "g");
    }
}
