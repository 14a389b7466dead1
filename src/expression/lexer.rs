//! Lexer for template expressions using logos

use logos::Logos;

use super::ast::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Comparison operators (longer first)
    #[token("===")]
    StrictEq,
    #[token("!==")]
    StrictNotEq,
    #[token("==")]
    LooseEq,
    #[token("!=")]
    LooseNotEq,
    #[token(">=")]
    GreaterOrEqual,
    #[token("<=")]
    LessOrEqual,
    #[token(">")]
    Greater,
    #[token("<")]
    Less,

    // Ternary
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Access and delimiters
    #[token(".")]
    Dot,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// Source text is kept so index parsing and literal fallbacks see it unchanged
    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unquote(lex.slice()))]
    String(String),

    /// Any character the expression language does not know
    Error,
}

/// Strip surrounding quotes and process backslash escapes
fn unquote(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Lex an expression into tokens with spans
///
/// Unrecognized input becomes [`Token::Error`] rather than being dropped, so
/// the grammar rejects it.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Error), span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_path_tokens() {
        assert_eq!(
            tokens("user.name"),
            vec![
                Token::Ident("user".to_string()),
                Token::Dot,
                Token::Ident("name".to_string()),
            ]
        );
    }

    #[test]
    fn test_index_tokens() {
        assert_eq!(
            tokens("items[10]"),
            vec![
                Token::Ident("items".to_string()),
                Token::BracketOpen,
                Token::Number("10".to_string()),
                Token::BracketClose,
            ]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            tokens("=== !== == != >= <= > <"),
            vec![
                Token::StrictEq,
                Token::StrictNotEq,
                Token::LooseEq,
                Token::LooseNotEq,
                Token::GreaterOrEqual,
                Token::LessOrEqual,
                Token::Greater,
                Token::Less,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            tokens(r#""yes" 'no' "say \"hi\"""#),
            vec![
                Token::String("yes".to_string()),
                Token::String("no".to_string()),
                Token::String("say \"hi\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_characters_become_errors() {
        assert_eq!(
            tokens("a % b"),
            vec![
                Token::Ident("a".to_string()),
                Token::Error,
                Token::Ident("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let spans: Vec<_> = lex("a ? b").map(|(_, s)| s).collect();
        assert_eq!(spans, vec![0..1, 2..3, 4..5]);
    }
}
