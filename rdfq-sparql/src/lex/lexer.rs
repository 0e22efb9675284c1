//! SPARQL lexer implementation using winnow.
//!
//! Tokenizes query text into a stream of tokens with source spans.
//! Fails fast on the first lexical error with a line/column message.
//!
//! Numeric signs are never folded into number tokens; `-1` lexes as
//! `Minus Integer("1")` and the expression parser applies the sign.

use std::sync::Arc;

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, opt, peek, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::*;
use super::token::{keyword_from_str, Token, TokenKind};
use crate::error::{QueryError, Result};

/// Input type for the lexer - tracks position for spans.
pub type Input<'a> = LocatingSlice<&'a str>;

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Lexer for SPARQL query text.
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Tokenize the entire input, ending with an `Eof` token.
    pub fn tokenize(self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut input = LocatingSlice::new(self.input);

        loop {
            skip_ws_and_comments(&mut input);

            if input.is_empty() {
                let pos = input.current_token_start();
                tokens.push(Token::new(TokenKind::Eof, pos, pos));
                break;
            }

            let start = input.current_token_start();

            match next_token(&mut input) {
                Ok(kind) => {
                    let end = input.current_token_start();
                    tokens.push(Token::new(kind, start, end));
                }
                Err(_) => return Err(self.make_error(start, &input)),
            }
        }

        Ok(tokens)
    }

    fn make_error(&self, position: usize, input: &Input<'_>) -> QueryError {
        let remaining: &str = input.as_ref();
        let bad_char = remaining.chars().next().unwrap_or('?');
        let (line, col) = self.line_col(position);
        let line_content = self.input.lines().nth(line.saturating_sub(1)).unwrap_or("");
        let pointer = " ".repeat(col.saturating_sub(1));

        let what = match bad_char {
            '"' | '\'' => "unterminated string literal".to_string(),
            '$' => "unterminated expression placeholder".to_string(),
            _ => format!("unexpected character '{}'", bad_char),
        };
        let message = format!(
            "{} at line {}, column {}\n  |\n{} | {}\n  | {}^",
            what, line, col, line, line_content, pointer
        );

        QueryError::Lexer { position, message }
    }

    /// Convert a byte position to (line, column), 1-indexed.
    fn line_col(&self, position: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for (i, c) in self.input.char_indices() {
            if i >= position {
                break;
            }
            if c == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

/// Skip whitespace and comments.
fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str, ContextError> = take_while(0.., is_ws).parse_next(input);

        if input.starts_with('#') {
            let _: ModalResult<&str, ContextError> =
                take_till(0.., |c| c == '\n' || c == '\r').parse_next(input);
        } else {
            break;
        }
    }
}

fn next_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        parse_multi_char_operator,
        // `<` is an IRI only when a closing `>` follows without whitespace
        parse_iri_ref,
        parse_placeholder,
        parse_var,
        parse_blank_node_label,
        parse_anon,
        parse_lang_tag,
        parse_default_prefix,
        parse_word,
        parse_string_literal,
        parse_number,
        parse_punctuation,
    ))
    .parse_next(input)
}

// =============================================================================
// IRIs
// =============================================================================

fn parse_iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('<', parse_iri_content, '>')
        .map(|s: String| TokenKind::Iri(Arc::from(s)))
        .parse_next(input)
}

fn parse_iri_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with('>') {
            break;
        }

        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            match parse_unicode_escape(input)? {
                Some(c) => result.push(c),
                None => return backtrack(),
            }
        } else {
            return backtrack();
        }
    }

    Ok(result)
}

/// Parse `uXXXX` or `UXXXXXXXX` after a backslash.
fn parse_unicode_escape(input: &mut Input<'_>) -> ModalResult<Option<char>> {
    let width = if input.starts_with('u') {
        4
    } else if input.starts_with('U') {
        8
    } else {
        return Ok(None);
    };
    any.parse_next(input)?;
    let hex: &str = take_while(width..=width, AsChar::is_hex_digit).parse_next(input)?;
    Ok(u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
}

// =============================================================================
// Variables and placeholders
// =============================================================================

/// `${ ... }` with balanced inner braces
fn parse_placeholder(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    "${".parse_next(input)?;
    let mut depth = 1usize;
    let mut body = String::new();
    loop {
        let c: char = any.parse_next(input)?;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        body.push(c);
    }
    Ok(TokenKind::Placeholder(Arc::from(body)))
}

fn parse_var(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded(
        one_of(['?', '$']),
        (take_while(1, is_varname_start), take_while(0.., is_varname_char)).take(),
    )
    .map(|name: &str| TokenKind::Var(Arc::from(name)))
    .parse_next(input)
}

// =============================================================================
// Blank nodes and language tags
// =============================================================================

fn parse_blank_node_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded("_:", parse_blank_node_name)
        .map(|name: &str| TokenKind::BlankNodeLabel(Arc::from(name)))
        .parse_next(input)
}

fn parse_blank_node_name<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    let result: &str = (
        take_while(1, |c: char| is_pn_chars_u(c) || c.is_ascii_digit()),
        take_while(0.., |c: char| is_pn_chars(c) || c == '.'),
    )
        .take()
        .parse_next(input)?;

    if result.ends_with('.') {
        return backtrack();
    }
    Ok(result)
}

fn parse_anon(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('[', take_while(0.., is_ws), ']')
        .map(|_| TokenKind::Anon)
        .parse_next(input)
}

fn parse_lang_tag(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded(
        '@',
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-'),
    )
    .map(|tag: &str| TokenKind::LangTag(Arc::from(tag)))
    .parse_next(input)
}

// =============================================================================
// Prefixed names, keywords and bare names
// =============================================================================

fn parse_default_prefix(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ':'.parse_next(input)?;
    match opt(parse_pn_local).parse_next(input)? {
        Some(local) => Ok(TokenKind::PrefixedName {
            prefix: Arc::from(""),
            local: Arc::from(local.as_str()),
        }),
        None => Ok(TokenKind::PrefixedNameNs(Arc::from(""))),
    }
}

/// A prefixed name, a keyword, or a bare name such as a function.
fn parse_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let first = input.chars().next().ok_or_else(|| ErrMode::Backtrack(ContextError::new()))?;
    if !is_pn_prefix_start(first) {
        return backtrack();
    }

    let mut word = String::new();
    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        word.push_str(chunk);

        // Dots may appear inside a prefix but never at its end
        if input.starts_with('.') {
            let rest = &input.as_ref()[1..];
            if rest.chars().next().is_some_and(is_pn_chars) {
                '.'.parse_next(input)?;
                word.push('.');
                continue;
            }
        }
        break;
    }

    if peek(opt(':')).parse_next(input)?.is_some() {
        ':'.parse_next(input)?;
        return match opt(parse_pn_local).parse_next(input)? {
            Some(local) => Ok(TokenKind::PrefixedName {
                prefix: Arc::from(word.as_str()),
                local: Arc::from(local.as_str()),
            }),
            None => Ok(TokenKind::PrefixedNameNs(Arc::from(word.as_str()))),
        };
    }

    Ok(keyword_from_str(&word).unwrap_or_else(|| TokenKind::Name(Arc::from(word.as_str()))))
}

fn parse_pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    let first = input.chars().next().ok_or_else(|| ErrMode::Backtrack(ContextError::new()))?;
    if !is_pn_local_start(first) && first != '%' && first != '\\' {
        return backtrack();
    }

    let mut result = String::new();
    loop {
        let chunk: &str =
            take_while(0.., |c: char| is_pn_chars(c) || c == ':').parse_next(input)?;
        result.push_str(chunk);

        if input.starts_with('.') {
            let rest = &input.as_ref()[1..];
            if rest
                .chars()
                .next()
                .is_some_and(|c| is_pn_chars(c) || matches!(c, ':' | '%' | '\\'))
            {
                '.'.parse_next(input)?;
                result.push('.');
                continue;
            }
            break;
        }

        if input.starts_with('%') {
            '%'.parse_next(input)?;
            let hex: &str = take_while(2..=2, AsChar::is_hex_digit).parse_next(input)?;
            result.push('%');
            result.push_str(hex);
        } else if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            let escaped: char = any.parse_next(input)?;
            if !"_~.-!$&'()*+,;=/?#@%".contains(escaped) {
                return backtrack();
            }
            result.push(escaped);
        } else {
            break;
        }
    }

    if result.is_empty() {
        return backtrack();
    }
    Ok(result)
}

// =============================================================================
// String literals
// =============================================================================

fn parse_string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        delimited("\"\"\"", long_content_double, "\"\"\""),
        delimited("'''", long_content_single, "'''"),
        delimited('"', short_content_double, '"'),
        delimited('\'', short_content_single, '\''),
    ))
    .map(|s: String| TokenKind::String(Arc::from(s)))
    .parse_next(input)
}

fn long_content_double(input: &mut Input<'_>) -> ModalResult<String> {
    parse_long_content(input, '"')
}

fn long_content_single(input: &mut Input<'_>) -> ModalResult<String> {
    parse_long_content(input, '\'')
}

fn short_content_double(input: &mut Input<'_>) -> ModalResult<String> {
    parse_short_content(input, '"')
}

fn short_content_single(input: &mut Input<'_>) -> ModalResult<String> {
    parse_short_content(input, '\'')
}

fn parse_short_content(input: &mut Input<'_>, quote: char) -> ModalResult<String> {
    let mut result = String::new();
    loop {
        let chunk: &str = take_while(0.., |c| c != quote && c != '\\' && c != '\n' && c != '\r')
            .parse_next(input)?;
        result.push_str(chunk);

        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            result.push(parse_escape_char(input)?);
        } else {
            break;
        }
    }
    Ok(result)
}

fn parse_long_content(input: &mut Input<'_>, quote: char) -> ModalResult<String> {
    let closing: String = std::iter::repeat(quote).take(3).collect();
    let mut result = String::new();
    loop {
        let chunk: &str = take_while(0.., |c| c != quote && c != '\\').parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with(closing.as_str()) {
            break;
        }
        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            result.push(parse_escape_char(input)?);
        } else {
            let c: char = any.parse_next(input)?;
            result.push(c);
        }
    }
    Ok(result)
}

fn parse_escape_char(input: &mut Input<'_>) -> ModalResult<char> {
    if input.starts_with('u') || input.starts_with('U') {
        return match parse_unicode_escape(input)? {
            Some(c) => Ok(c),
            None => backtrack(),
        };
    }
    let c: char = any.parse_next(input)?;
    match c {
        't' => Ok('\t'),
        'b' => Ok('\x08'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\x0C'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        _ => backtrack(),
    }
}

// =============================================================================
// Numbers
// =============================================================================

fn parse_number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((parse_double, parse_decimal, parse_integer)).parse_next(input)
}

fn parse_integer(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let digits: &str = digit1.parse_next(input)?;
    if peek(opt(one_of(['e', 'E']))).parse_next(input)?.is_some() {
        return backtrack();
    }
    Ok(TokenKind::Integer(Arc::from(digits)))
}

fn parse_decimal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let text: &str = alt(((digit1, '.', digit1).take(), ('.', digit1).take()))
        .parse_next(input)?;
    if peek(opt(one_of(['e', 'E']))).parse_next(input)?.is_some() {
        return backtrack();
    }
    Ok(TokenKind::Decimal(Arc::from(text)))
}

fn parse_double(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let text: &str = (
        alt(((digit1, '.', opt(digit1)).take(), ('.', digit1).take(), digit1)),
        one_of(['e', 'E']),
        opt(one_of(['+', '-'])),
        digit1,
    )
        .take()
        .parse_next(input)?;
    Ok(TokenKind::Double(Arc::from(text)))
}

// =============================================================================
// Operators and punctuation
// =============================================================================

fn parse_multi_char_operator(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "^^".value(TokenKind::DoubleCaret),
        "||".value(TokenKind::Or),
        "&&".value(TokenKind::And),
        "!=".value(TokenKind::Ne),
        "<=".value(TokenKind::Le),
        ">=".value(TokenKind::Ge),
    ))
    .parse_next(input)
}

fn parse_punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '{' => Some(TokenKind::LBrace),
        '}' => Some(TokenKind::RBrace),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '=' => Some(TokenKind::Eq),
        '<' => Some(TokenKind::Lt),
        '>' => Some(TokenKind::Gt),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '!' => Some(TokenKind::Bang),
        '?' => Some(TokenKind::Question),
        '|' => Some(TokenKind::Pipe),
        '^' => Some(TokenKind::Caret),
        _ => None,
    })
    .parse_next(input)
}

/// Tokenize a SPARQL string.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}
