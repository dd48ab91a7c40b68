//! Token range extraction.
//!
//! The expression machinery never parses straight off the main stream; it
//! first carves out the token range it owns. [`extract`] returns everything
//! up to a delimiter (consuming but not including it), optionally balancing
//! nested delimiter pairs. [`split_args`] carves a parenthesized argument
//! list into one range per argument, splitting on top-level commas.
//!
//! On an unbalanced range the main stream is restored to where it started, so
//! the error position reported upstream still points at the construct head.

use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::unexpected;

/// Collects tokens until `end`, consuming the delimiter.
///
/// With `handle_nested`, every `start` token opens a nesting level and `end`
/// tokens close them; only the `end` that balances the first `start` stops
/// the scan. `exclude_first` drops the outermost pair from the result, which
/// is how parenthesized groups are unwrapped.
pub(crate) fn extract(
    cx: &Session,
    tokens: &mut Stream<TokenId>,
    end: TokenKind,
    start: TokenKind,
    handle_nested: bool,
    exclude_first: bool,
    trace: &Token,
) -> Result<Stream<TokenId>, Diagnostic> {
    let start_pos = tokens.pos();
    let mut out: Vec<TokenId> = Vec::new();
    let mut nested: usize = 0;

    while let Some(id) = tokens.next() {
        let t = cx.tokens[id];

        if handle_nested && t.kind == start {
            nested += 1;
            if !(exclude_first && nested == 1) {
                out.push(id);
            }
            continue;
        }

        if t.kind == end {
            if !handle_nested {
                return Ok(Stream::new(out));
            }
            if nested == 0 {
                tokens.set_pos(start_pos);
                return Err(unexpected(&t, "unbalanced closing delimiter"));
            }
            nested -= 1;
            if nested == 0 {
                if !exclude_first {
                    out.push(id);
                }
                return Ok(Stream::new(out));
            }
            out.push(id);
            continue;
        }

        out.push(id);
    }

    // Ran out of tokens before the delimiter closed.
    tokens.set_pos(start_pos);
    Err(unexpected(trace, "expression is missing its closing delimiter"))
}

/// Splits a parenthesized argument list into one token range per argument.
///
/// The cursor must sit on the opening `(`; the matching `)` is consumed.
/// Commas inside nested parentheses do not split. Empty ranges (as in `f()`)
/// are kept and skipped by the caller.
pub(crate) fn split_args(
    cx: &Session,
    tokens: &mut Stream<TokenId>,
    trace: &Token,
) -> Result<Vec<Stream<TokenId>>, Diagnostic> {
    let start_pos = tokens.pos();
    super::expect(cx, tokens, TokenKind::OpenParen, "expected `(` to open an argument list")?;

    let mut groups: Vec<Stream<TokenId>> = Vec::new();
    let mut current: Vec<TokenId> = Vec::new();
    let mut nested: usize = 0;

    loop {
        let Some(id) = tokens.next() else {
            tokens.set_pos(start_pos);
            return Err(unexpected(trace, "argument list is missing its closing `)`"));
        };
        let t = cx.tokens[id];

        match t.kind {
            TokenKind::Comma if nested == 0 => {
                groups.push(Stream::new(std::mem::take(&mut current)));
            }
            TokenKind::OpenParen => {
                nested += 1;
                current.push(id);
            }
            TokenKind::CloseParen if nested == 0 => break,
            TokenKind::CloseParen => {
                nested -= 1;
                current.push(id);
            }
            _ => current.push(id),
        }
    }

    if !current.is_empty() {
        groups.push(Stream::new(current));
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::Session;
    use crate::lexer;

    fn lex(source: &str) -> (Session, Stream<TokenId>) {
        let mut cx = Session::new();
        let stream = lexer::lex(source, &mut cx).expect("lexing should succeed");
        (cx, stream)
    }

    fn kinds(cx: &Session, mut stream: Stream<TokenId>) -> Vec<TokenKind> {
        let mut out = Vec::new();
        while let Some(id) = stream.next() {
            out.push(cx.tokens[id].kind);
        }
        out
    }

    #[test]
    fn flat_extraction_stops_at_and_consumes_the_delimiter() {
        let (cx, mut stream) = lex("1 + 2 ; rest");
        let trace = cx.tokens[stream.peek().unwrap()];
        let group = extract(&cx, &mut stream, TokenKind::Semicolon, TokenKind::Unknown, false, false, &trace).unwrap();
        assert_eq!(
            kinds(&cx, group),
            vec![TokenKind::NumberLiteral, TokenKind::Plus, TokenKind::NumberLiteral]
        );
        // The `;` is gone; the main stream resumes after it.
        assert_eq!(cx.tokens[stream.peek().unwrap()].kind, TokenKind::Identifier);
    }

    #[test]
    fn nested_extraction_balances_parentheses() {
        let (cx, mut stream) = lex("(a + (b)) next");
        let trace = cx.tokens[stream.peek().unwrap()];
        let group = extract(&cx, &mut stream, TokenKind::CloseParen, TokenKind::OpenParen, true, true, &trace).unwrap();
        assert_eq!(
            kinds(&cx, group),
            vec![
                TokenKind::Identifier,
                TokenKind::Plus,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::CloseParen,
            ]
        );
        assert_eq!(cx.tokens[stream.peek().unwrap()].kind, TokenKind::Identifier);
    }

    #[test]
    fn missing_delimiter_restores_the_stream() {
        let (cx, mut stream) = lex("1 + 2");
        let trace = cx.tokens[stream.peek().unwrap()];
        let before = stream.pos();
        let err = extract(&cx, &mut stream, TokenKind::Semicolon, TokenKind::Unknown, false, false, &trace)
            .unwrap_err();
        assert_eq!(err.kind, crate::error::DiagnosticKind::UnexpectedToken);
        assert_eq!(stream.pos(), before);
    }

    #[test]
    fn split_args_breaks_on_top_level_commas_only() {
        let (cx, mut stream) = lex("(1, f(a, b), 2)");
        let trace = cx.tokens[stream.peek().unwrap()];
        let groups = split_args(&cx, &mut stream, &trace).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].len(), 1);
        // `f(a, b)` stays one argument, commas and all.
        assert_eq!(groups[1].len(), 6);
        assert_eq!(groups[2].len(), 1);
        assert!(stream.exhausted());
    }

    #[test]
    fn split_args_of_an_empty_list_is_empty() {
        let (cx, mut stream) = lex("()");
        let trace = cx.tokens[stream.peek().unwrap()];
        let groups = split_args(&cx, &mut stream, &trace).unwrap();
        assert!(groups.is_empty());
    }
}
