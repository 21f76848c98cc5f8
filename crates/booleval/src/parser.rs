//! Recursive descent parser for filter expressions.

use crate::ast::{ComparisonOp, Expression, LogicalOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};

/// Maximum depth of nested parentheses accepted by the parser.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser for filter expressions.
///
/// A single left-to-right pass with one token of lookahead; it never
/// backtracks.
///
/// # Grammar
///
/// ```text
/// expression ::= or_expr
/// or_expr    ::= and_expr (OR and_expr)*
/// and_expr   ::= term (AND term)*
/// term       ::= "(" expression ")" | comparison
/// comparison ::= FIELD [OP] LITERAL
/// ```
///
/// `OP` defaults to equality when omitted. Word-form keywords (`and`, `eq`,
/// ...) are only treated as keywords where the grammar expects one; in a
/// field or literal slot they are plain words.
///
/// # Operator Precedence (highest to lowest)
///
/// 1. comparison
/// 2. `and` / `&&` - binary
/// 3. `or` / `||` - binary
///
/// Chains of the same connective are built right-leaning, so
/// `a or b or c` becomes `a or (b or c)`. Both connectives are associative
/// and the left operand is still evaluated first.
///
/// # Example
///
/// ```
/// use booleval::{Expression, ExpressionParser};
///
/// let tree = ExpressionParser::parse("age gt 20 and (name John or name Jane)")
///     .unwrap()
///     .unwrap();
/// assert!(matches!(tree, Expression::Logical { .. }));
///
/// // Empty input is not an error, it just has no tree.
/// assert_eq!(ExpressionParser::parse("").unwrap(), None);
/// ```
pub struct ExpressionParser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl ExpressionParser {
    /// Parses an expression string into a tree.
    ///
    /// Returns `Ok(None)` for empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first grammar violation. No
    /// partial tree is ever returned.
    pub fn parse(input: &str) -> ParseResult<Option<Expression>> {
        let tokens = Lexer::new(input).tokenize();
        let mut parser = Self {
            tokens,
            position: 0,
            depth: 0,
        };

        if parser.peek_kind() == TokenKind::End {
            return Ok(None);
        }

        let expression = parser.parse_expression()?;

        match parser.peek() {
            None => Ok(Some(expression)),
            Some(token) => match token.kind {
                TokenKind::End => Ok(Some(expression)),
                TokenKind::CloseParen => Err(ParseError::UnmatchedCloseParen {
                    position: token.position,
                }),
                _ => Err(ParseError::unexpected_token(&token.text, token.position)),
            },
        }
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Returns the kind of the current token, treating exhaustion as the end.
    fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::End, |token| token.kind)
    }

    /// Consumes and returns the current token. The end token is never consumed.
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position)?.clone();
        if token.kind != TokenKind::End {
            self.position += 1;
        }
        Some(token)
    }

    /// Parses the top-level expression (OR expression).
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_or_expr()
    }

    /// Parses OR expressions: `and_expr (OR and_expr)*`
    fn parse_or_expr(&mut self) -> ParseResult<Expression> {
        let first = self.parse_and_expr()?;
        let mut rest = Vec::new();

        while self.peek_kind() == TokenKind::LogicalOperator(LogicalOp::Or) {
            self.advance(); // consume 'or'
            rest.push(self.parse_and_expr()?);
        }

        Ok(chain(LogicalOp::Or, first, rest))
    }

    /// Parses AND expressions: `term (AND term)*`
    fn parse_and_expr(&mut self) -> ParseResult<Expression> {
        let first = self.parse_term()?;
        let mut rest = Vec::new();

        while self.peek_kind() == TokenKind::LogicalOperator(LogicalOp::And) {
            self.advance(); // consume 'and'
            rest.push(self.parse_term()?);
        }

        Ok(chain(LogicalOp::And, first, rest))
    }

    /// Parses terms: `"(" expression ")" | comparison`
    fn parse_term(&mut self) -> ParseResult<Expression> {
        let Some(token) = self.peek() else {
            return Err(ParseError::UnexpectedEnd);
        };

        match token.kind {
            TokenKind::OpenParen => self.parse_group(),
            TokenKind::CloseParen if self.depth == 0 => Err(ParseError::UnmatchedCloseParen {
                position: token.position,
            }),
            TokenKind::End => Err(ParseError::UnexpectedEnd),
            TokenKind::UnterminatedLiteral => Err(ParseError::UnterminatedQuote {
                position: token.position,
            }),
            _ if token.is_word() => self.parse_comparison(),
            _ => Err(ParseError::unexpected_token(&token.text, token.position)),
        }
    }

    /// Parses a parenthesized group. The current token is `(`.
    fn parse_group(&mut self) -> ParseResult<Expression> {
        self.advance(); // consume '('
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }

        let inner = self.parse_expression()?;

        match self.advance() {
            Some(token) if token.kind == TokenKind::CloseParen => {
                self.depth -= 1;
                Ok(inner)
            }
            Some(token) if token.kind != TokenKind::End => {
                Err(ParseError::unexpected_token(token.text, token.position))
            }
            _ => Err(ParseError::UnclosedParenthesis),
        }
    }

    /// Parses a comparison: `FIELD [OP] LITERAL`
    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let Some(field) = self.advance() else {
            return Err(ParseError::UnexpectedEnd);
        };

        let op = match self.peek_kind() {
            TokenKind::ComparisonOperator(op) => {
                self.advance(); // consume operator
                op
            }
            _ => ComparisonOp::Eq,
        };

        match self.peek() {
            Some(token) if token.is_word() => {
                let literal = token.text.clone();
                self.advance(); // consume literal
                Ok(Expression::comparison(field.text, op, literal))
            }
            Some(token) if token.kind == TokenKind::UnterminatedLiteral => {
                Err(ParseError::UnterminatedQuote {
                    position: token.position,
                })
            }
            _ => Err(ParseError::missing_literal(field.text)),
        }
    }
}

/// Joins operands with `op`, nesting to the right: `a op (b op (c op d))`.
fn chain(op: LogicalOp, first: Expression, rest: Vec<Expression>) -> Expression {
    let mut operands = rest.into_iter().rev();
    let Some(last) = operands.next() else {
        return first;
    };
    let tail = operands.fold(last, |acc, left| Expression::logical(op, left, acc));
    Expression::logical(op, first, tail)
}
