//! @file paste.rs
//! @brief The `##` token-paste operator.
//!
//! @details
//! Runs over a replacement buffer: after parameter substitution for
//! function-like macros, and directly after tokenization for object-like
//! ones. Each `##` either absorbs a placemarker neighbour or concatenates
//! the texts of its two neighbours; the combined text must re-lex to
//! exactly one preprocessing token. A pasted token is expandable again
//! even when one of its halves had been painted blue. Once every `##` is
//! resolved, the remaining placemarkers are swept from the buffer.
//!
//! The two call sites differ in how an invalid concatenation is treated,
//! see `PasteMode`.

use super::error::{ExpandError, Result};
use super::tokenizer::{scan_pp_token, Token, TokenKind};
use log::debug;

/// How a `##` whose concatenation does not re-lex to a single token is
/// handled.
///
/// # Variants
/// * `Strict` - The concatenation must form one preprocessing token;
///   anything else aborts the expansion. Used for function-like
///   replacement lists.
/// * `Lenient` - An invalid concatenation leaves both operands and the
///   `##` operator in place, so a later consuming context can still see
///   them (an argument position stringifies the operator back to its
///   spelling). Used for object-like replacement lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteMode {
    Strict,
    Lenient,
}

/// Resolves every `##` in `replacement` and sweeps placemarkers.
///
/// # Returns
/// * `Ok(())` with the buffer rewritten in place.
/// * `Err(ExpandError::InvalidPaste)` when a concatenation does not form
///   a single preprocessing token and `mode` is `Strict`.
pub fn paste_tokens(replacement: &mut Vec<Token>, mode: PasteMode) -> Result<()> {
    let mut pos = 0;

    while pos < replacement.len() {
        if replacement[pos].kind != TokenKind::Paste {
            pos += 1;
            continue;
        }

        // A run of consecutive `##` acts as a single paste.
        while replacement.get(pos + 1).map_or(false, |t| t.kind == TokenKind::Paste) {
            let extra = replacement.remove(pos + 1);
            replacement[pos].pop += extra.pop;
        }

        // Validation keeps `##` off the replacement edges, and substitution
        // leaves a placemarker where an argument vanished, so both
        // neighbours exist.
        if pos == 0 || pos + 1 >= replacement.len() {
            return Err(ExpandError::PasteAtEdge);
        }
        let prev_marker = replacement[pos - 1].kind == TokenKind::Placemarker;
        let next_marker = replacement[pos + 1].kind == TokenKind::Placemarker;

        if prev_marker && next_marker {
            // Two placemarkers paste to one.
            let removed: Vec<Token> = replacement.drain(pos..pos + 2).collect();
            replacement[pos - 1].pop += removed.iter().map(|t| t.pop).sum::<usize>();
        } else if prev_marker {
            // The marker dissolves; the right-hand token stands.
            let paste = replacement.remove(pos);
            let marker = replacement.remove(pos - 1);
            replacement[pos - 1].pop += paste.pop + marker.pop;
            pos -= 1;
        } else if next_marker {
            // The marker dissolves; the left-hand token stands.
            let removed: Vec<Token> = replacement.drain(pos..pos + 2).collect();
            replacement[pos - 1].pop += removed.iter().map(|t| t.pop).sum::<usize>();
        } else {
            // The combined spelling must scan as one whole token; check
            // before touching the buffer.
            let combined = format!(
                "{}{}",
                replacement[pos - 1].text,
                replacement[pos + 1].text
            );
            let scanned = match scan_pp_token(&combined, 0) {
                Ok(Some(s)) if s.start == 0 && s.end == combined.len() => Some(s),
                _ => None,
            };
            let Some(scanned) = scanned else {
                if mode == PasteMode::Lenient {
                    // Leave the operands and the operator for a later
                    // consuming context.
                    debug!("paste_tokens: deferring invalid paste {:?}", combined);
                    pos += 1;
                    continue;
                }
                debug!("paste_tokens: invalid paste result {:?}", combined);
                return Err(ExpandError::InvalidPaste(combined));
            };

            let next = replacement.remove(pos + 1);
            let paste = replacement.remove(pos);
            let joined = &mut replacement[pos - 1];
            joined.text = combined;
            joined.kind = if scanned.kind == TokenKind::Identifier {
                TokenKind::Identifier
            } else {
                TokenKind::Other
            };
            // A fresh token: pasting lifts any earlier paint.
            joined.noexpand = false;
            joined.pop += paste.pop + next.pop;
        }
    }

    replacement.retain(|t| t.kind != TokenKind::Placemarker);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::tokenizer::tokenize;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// @test Verifies plain concatenation re-lexes to an identifier.
    #[test]
    fn test_paste_identifiers() {
        let mut buffer = vec![
            Token::new(TokenKind::Identifier, "vers", false),
            Token::operator(TokenKind::Paste, true),
            Token::new(TokenKind::Other, "2", true),
        ];
        paste_tokens(&mut buffer, PasteMode::Strict).unwrap();
        assert_eq!(texts(&buffer), vec!["vers2"]);
        assert_eq!(buffer[0].kind, TokenKind::Identifier);
    }

    /// @test Verifies pasting clears the painted-blue mark.
    #[test]
    fn test_paste_clears_noexpand() {
        let mut low = Token::new(TokenKind::Identifier, "LOW", false);
        low.noexpand = true;
        let mut buffer = vec![
            Token::new(TokenKind::Identifier, "HIGH", false),
            Token::operator(TokenKind::Paste, false),
            low,
        ];
        paste_tokens(&mut buffer, PasteMode::Strict).unwrap();
        assert_eq!(texts(&buffer), vec!["HIGHLOW"]);
        assert!(!buffer[0].noexpand);
    }

    /// @test Verifies placemarker absorption on either side.
    #[test]
    fn test_paste_placemarkers() {
        // placemarker ## x -> x
        let mut buffer = vec![
            Token::placemarker(false),
            Token::operator(TokenKind::Paste, false),
            Token::new(TokenKind::Identifier, "x", false),
        ];
        paste_tokens(&mut buffer, PasteMode::Strict).unwrap();
        assert_eq!(texts(&buffer), vec!["x"]);

        // x ## placemarker -> x
        let mut buffer = vec![
            Token::new(TokenKind::Identifier, "x", false),
            Token::operator(TokenKind::Paste, false),
            Token::placemarker(false),
        ];
        paste_tokens(&mut buffer, PasteMode::Strict).unwrap();
        assert_eq!(texts(&buffer), vec!["x"]);

        // placemarker ## placemarker -> nothing after the sweep
        let mut buffer = vec![
            Token::placemarker(false),
            Token::operator(TokenKind::Paste, false),
            Token::placemarker(false),
        ];
        paste_tokens(&mut buffer, PasteMode::Strict).unwrap();
        assert!(buffer.is_empty());
    }

    /// @test Verifies a chain `x ## y ## z` folds left to right.
    #[test]
    fn test_paste_chain() {
        let mut buffer = tokenize("1 ## 2 ## 3", true, true).unwrap();
        paste_tokens(&mut buffer, PasteMode::Strict).unwrap();
        assert_eq!(texts(&buffer), vec!["123"]);
        assert_eq!(buffer[0].kind, TokenKind::Other);
    }

    /// @test Verifies `#` ## `#` re-lexes to the single token `##`, which
    /// is an ordinary token afterwards.
    #[test]
    fn test_paste_hashes() {
        let mut buffer = vec![
            Token::new(TokenKind::Other, "#", false),
            Token::operator(TokenKind::Paste, true),
            Token::new(TokenKind::Other, "#", true),
        ];
        paste_tokens(&mut buffer, PasteMode::Strict).unwrap();
        assert_eq!(texts(&buffer), vec!["##"]);
        assert_eq!(buffer[0].kind, TokenKind::Other);
    }

    /// @test Verifies an invalid concatenation is rejected.
    #[test]
    fn test_invalid_paste() {
        let mut buffer = vec![
            Token::new(TokenKind::Other, "+", false),
            Token::operator(TokenKind::Paste, false),
            Token::new(TokenKind::Other, "-", false),
        ];
        assert_eq!(
            paste_tokens(&mut buffer, PasteMode::Strict),
            Err(ExpandError::InvalidPaste("+-".to_string()))
        );

        // Two string literals concatenate to two tokens; rejected.
        let mut buffer = vec![
            Token::new(TokenKind::Other, "\"a\"", false),
            Token::operator(TokenKind::Paste, false),
            Token::new(TokenKind::Other, "\"b\"", false),
        ];
        assert!(matches!(
            paste_tokens(&mut buffer, PasteMode::Strict),
            Err(ExpandError::InvalidPaste(_))
        ));
    }

    /// @test Verifies lenient mode defers an invalid concatenation and
    /// still performs valid ones.
    #[test]
    fn test_lenient_mode() {
        // `#` against `)` forms no token; everything stays in place.
        let mut buffer = vec![
            Token::new(TokenKind::Other, "#", false),
            Token::operator(TokenKind::Paste, true),
            Token::new(TokenKind::Other, ")", false),
        ];
        paste_tokens(&mut buffer, PasteMode::Lenient).unwrap();
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer[0].text, "#");
        assert_eq!(buffer[1].kind, TokenKind::Paste);
        assert_eq!(buffer[2].text, ")");

        // A valid concatenation pastes exactly as in strict mode.
        let mut buffer = tokenize("a ## b", false, true).unwrap();
        paste_tokens(&mut buffer, PasteMode::Lenient).unwrap();
        assert_eq!(texts(&buffer), vec!["ab"]);

        // The canonical `# ## #` body folds to a single `##` token.
        let mut buffer = tokenize("# ## #", false, true).unwrap();
        paste_tokens(&mut buffer, PasteMode::Lenient).unwrap();
        assert_eq!(texts(&buffer), vec!["##"]);
        assert_eq!(buffer[0].kind, TokenKind::Other);
    }
}
