//! Lexer (tokenizer) for filter expressions.
//!
//! The lexer never fails. Input it cannot make sense of is forwarded as
//! best-effort tokens and rejected later by the parser.

use crate::ast::{ComparisonOp, LogicalOp};

/// Symbolic operators, longest first so `>=` wins over `>`.
const SYMBOLS: [&str; 8] = ["==", "!=", ">=", "<=", "&&", "||", ">", "<"];

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word or a quoted string: field name or literal.
    FieldOrLiteral,

    /// A comparison operator, word (`eq`) or symbol (`==`).
    ComparisonOperator(ComparisonOp),

    /// A logical connective, word (`and`) or symbol (`&&`).
    LogicalOperator(LogicalOp),

    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,

    /// A quote that was opened but never closed. The text holds everything
    /// after the opening quote.
    UnterminatedLiteral,

    /// End of input. Always the last token.
    End,
}

/// A token with its text and position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// The token text. Quoted strings are stored without their quotes.
    pub text: String,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Returns true if the token can stand in a field or literal slot.
    ///
    /// Word-form operators such as `and` or `eq` qualify: the parser decides
    /// by position whether a word is a keyword or a value. Symbolic operators
    /// never do.
    pub fn is_word(&self) -> bool {
        match self.kind {
            TokenKind::FieldOrLiteral => true,
            TokenKind::ComparisonOperator(_) | TokenKind::LogicalOperator(_) => {
                self.text.chars().all(|c| c.is_ascii_alphabetic())
            }
            _ => false,
        }
    }
}

/// Lexer for tokenizing filter expressions.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Returns the unconsumed part of the input.
    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Returns the symbolic operator at the current position, if any.
    fn peek_symbol(&self) -> Option<&'static str> {
        let rest = self.rest();
        SYMBOLS.iter().copied().find(|symbol| rest.starts_with(symbol))
    }

    /// Reads a quoted string. The opening quote has not been consumed yet.
    ///
    /// Both quote characters are always consumed, so `''` yields an empty
    /// literal and the lexer keeps advancing.
    fn read_quoted_string(&mut self, quote_char: char, start: usize) -> Token {
        self.next_char();
        let content_start = self.position;

        match self.rest().find(quote_char) {
            Some(offset) => {
                let text = &self.input[content_start..content_start + offset];
                self.position = content_start + offset + quote_char.len_utf8();
                Token::new(TokenKind::FieldOrLiteral, text, start)
            }
            None => {
                let text = self.rest();
                self.position = self.input.len();
                Token::new(TokenKind::UnterminatedLiteral, text, start)
            }
        }
    }

    /// Reads a bare word up to whitespace, a parenthesis, a quote, or the
    /// start of a symbolic operator.
    fn read_word(&mut self) -> &'a str {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\'') {
                break;
            }
            if self.position > start && self.peek_symbol().is_some() {
                break;
            }
            self.next_char();
        }
        &self.input[start..self.position]
    }

    /// Returns the next token. Once the input is exhausted this keeps
    /// returning [`TokenKind::End`].
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.peek() else {
            return Token::new(TokenKind::End, "", start);
        };

        match c {
            '(' => {
                self.next_char();
                Token::new(TokenKind::OpenParen, "(", start)
            }
            ')' => {
                self.next_char();
                Token::new(TokenKind::CloseParen, ")", start)
            }
            '"' | '\'' => self.read_quoted_string(c, start),
            _ => {
                if let Some(symbol) = self.peek_symbol() {
                    self.position += symbol.len();
                    let kind = match ComparisonOp::from_symbol(symbol) {
                        Some(op) => TokenKind::ComparisonOperator(op),
                        None => match LogicalOp::from_symbol(symbol) {
                            Some(op) => TokenKind::LogicalOperator(op),
                            None => TokenKind::FieldOrLiteral,
                        },
                    };
                    return Token::new(kind, symbol, start);
                }

                let word = self.read_word();
                let kind = if let Some(op) = ComparisonOp::from_keyword(word) {
                    TokenKind::ComparisonOperator(op)
                } else if let Some(op) = LogicalOp::from_keyword(word) {
                    TokenKind::LogicalOperator(op)
                } else {
                    TokenKind::FieldOrLiteral
                };
                Token::new(kind, word, start)
            }
        }
    }

    /// Collects all tokens, including the terminal [`TokenKind::End`].
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::End;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}

/// Tokenizes `text` into an ordered sequence ending with [`TokenKind::End`].
///
/// # Example
///
/// ```
/// use booleval::{tokenize, TokenKind};
///
/// let tokens = tokenize("name == 'John Smith'");
/// assert_eq!(tokens.len(), 4);
/// assert_eq!(tokens[2].text, "John Smith");
/// assert_eq!(tokens[3].kind, TokenKind::End);
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    Lexer::new(text).tokenize()
}
