//! Tests for the expression parser.

use super::*;

fn leaf(field: &str, op: ComparisonOp, literal: &str) -> Expression {
    Expression::comparison(field, op, literal)
}

fn eq(field: &str, literal: &str) -> Expression {
    leaf(field, ComparisonOp::Eq, literal)
}

fn parse(input: &str) -> Expression {
    ExpressionParser::parse(input)
        .unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
        .unwrap_or_else(|| panic!("no tree for {input:?}"))
}

fn parse_err(input: &str) -> ParseError {
    match ExpressionParser::parse(input) {
        Ok(tree) => panic!("expected {input:?} to fail, got {tree:?}"),
        Err(e) => e,
    }
}

// ==================== Empty Input ====================

#[test]
fn test_parse_empty() {
    assert_eq!(ExpressionParser::parse("").unwrap(), None);
}

#[test]
fn test_parse_whitespace_only() {
    assert_eq!(ExpressionParser::parse("   \t\n ").unwrap(), None);
}

// ==================== Comparisons ====================

#[test]
fn test_parse_implicit_equality() {
    assert_eq!(parse("field foo"), eq("field", "foo"));
}

#[test]
fn test_parse_word_operators() {
    assert_eq!(parse("field eq foo"), eq("field", "foo"));
    assert_eq!(parse("field neq foo"), leaf("field", ComparisonOp::Neq, "foo"));
    assert_eq!(parse("field gt 1.23"), leaf("field", ComparisonOp::Gt, "1.23"));
    assert_eq!(parse("field geq 1"), leaf("field", ComparisonOp::Geq, "1"));
    assert_eq!(parse("field lt 2"), leaf("field", ComparisonOp::Lt, "2"));
    assert_eq!(parse("field leq 2"), leaf("field", ComparisonOp::Leq, "2"));
}

#[test]
fn test_parse_symbol_operators() {
    assert_eq!(parse("field == foo"), eq("field", "foo"));
    assert_eq!(parse("field != foo"), leaf("field", ComparisonOp::Neq, "foo"));
    assert_eq!(parse("field > 1.23"), leaf("field", ComparisonOp::Gt, "1.23"));
    assert_eq!(parse("field >= 1"), leaf("field", ComparisonOp::Geq, "1"));
    assert_eq!(parse("field < 2"), leaf("field", ComparisonOp::Lt, "2"));
    assert_eq!(parse("field <= 2"), leaf("field", ComparisonOp::Leq, "2"));
}

#[test]
fn test_parse_symbol_operators_without_spaces() {
    assert_eq!(parse("field>=10"), leaf("field", ComparisonOp::Geq, "10"));
    assert_eq!(
        parse("a==1&&b!=2"),
        Expression::and(eq("a", "1"), leaf("b", ComparisonOp::Neq, "2"))
    );
}

#[test]
fn test_parse_quoted_literal() {
    assert_eq!(parse("field == \"foo foo\""), eq("field", "foo foo"));
    assert_eq!(parse("field 'bar  bar'"), eq("field", "bar  bar"));
}

#[test]
fn test_parse_quoted_field_name() {
    assert_eq!(parse("\"first name\" eq John"), eq("first name", "John"));
}

#[test]
fn test_parse_empty_quoted_literal() {
    assert_eq!(parse("field eq ''"), eq("field", ""));
    assert_eq!(parse("field \"\""), eq("field", ""));
}

#[test]
fn test_parse_empty_quoted_literal_anywhere() {
    assert_eq!(
        parse("field eq '' and other_field bar"),
        Expression::and(eq("field", ""), eq("other_field", "bar"))
    );
    assert_eq!(
        parse("field eq '' or other_field bar"),
        Expression::or(eq("field", ""), eq("other_field", "bar"))
    );
    assert_eq!(
        parse("field eq '' and field2 eq ''"),
        Expression::and(eq("field", ""), eq("field2", ""))
    );
    assert_eq!(
        parse("(field eq '') and (other_field bar)"),
        Expression::and(eq("field", ""), eq("other_field", "bar"))
    );
}

#[test]
fn test_parse_keyword_in_literal_position() {
    // Keywords are only keywords where the grammar expects one.
    assert_eq!(parse("word and"), eq("word", "and"));
    assert_eq!(parse("word eq or"), eq("word", "or"));
    assert_eq!(parse("op == eq"), eq("op", "eq"));
}

#[test]
fn test_parse_keyword_in_field_position() {
    assert_eq!(parse("or 1"), eq("or", "1"));
    assert_eq!(parse("and eq x and or eq y"), Expression::and(eq("and", "x"), eq("or", "y")));
}

#[test]
fn test_parse_quoted_keyword_literal() {
    assert_eq!(parse("conjunction == \"and\""), eq("conjunction", "and"));
}

// ==================== Boolean Operators ====================

#[test]
fn test_parse_and() {
    let expected = Expression::and(eq("field_1", "1"), eq("field_2", "bar"));
    assert_eq!(parse("field_1 1 and field_2 bar"), expected);
    assert_eq!(parse("field_1 eq 1 and field_2 eq bar"), expected);
    assert_eq!(parse("field_1 == 1 && field_2 == bar"), expected);
    assert_eq!(parse("field_1 1 AND field_2 bar"), expected);
}

#[test]
fn test_parse_or() {
    let expected = Expression::or(eq("field_1", "1"), eq("field_1", "2"));
    assert_eq!(parse("field_1 1 or field_1 2"), expected);
    assert_eq!(parse("field_1 == 1 || field_1 == 2"), expected);
}

#[test]
fn test_parse_and_binds_tighter_than_or() {
    assert_eq!(
        parse("a 1 or b 2 and c 3"),
        Expression::or(eq("a", "1"), Expression::and(eq("b", "2"), eq("c", "3")))
    );
    assert_eq!(
        parse("a 1 and b 2 or c 3"),
        Expression::or(Expression::and(eq("a", "1"), eq("b", "2")), eq("c", "3"))
    );
}

#[test]
fn test_parse_chain_is_right_leaning() {
    assert_eq!(
        parse("field_1 foo and field_2 1 and field_1 bar"),
        Expression::and(
            eq("field_1", "foo"),
            Expression::and(eq("field_2", "1"), eq("field_1", "bar"))
        )
    );
}

#[test]
fn test_parse_parentheses_override_precedence() {
    assert_eq!(
        parse("(field_1 foo or field_1 bar) and (field_2 2 or field_2 1)"),
        Expression::and(
            Expression::or(eq("field_1", "foo"), eq("field_1", "bar")),
            Expression::or(eq("field_2", "2"), eq("field_2", "1"))
        )
    );
}

#[test]
fn test_parse_redundant_parentheses() {
    assert_eq!(parse("((field foo))"), eq("field", "foo"));
    assert_eq!(parse("(field_1 foo and field_2 1)"), Expression::and(eq("field_1", "foo"), eq("field_2", "1")));
}

#[test]
fn test_parse_nested_groups() {
    assert_eq!(
        parse("a 1 and (b 2 or (c 3 and d 4))"),
        Expression::and(
            eq("a", "1"),
            Expression::or(eq("b", "2"), Expression::and(eq("c", "3"), eq("d", "4")))
        )
    );
}

#[test]
fn test_parse_long_or_chain() {
    let values: Vec<String> = (1..=500).map(|i| format!("value{i}")).collect();
    let input = values
        .iter()
        .map(|v| format!("field {v}"))
        .collect::<Vec<_>>()
        .join(" or ");
    let tree = parse(&input);
    assert_eq!(tree.comparison_count(), 500);
    assert_eq!(tree.field_names(), vec!["field"]);
}

// ==================== Errors ====================

#[test]
fn test_parse_missing_close_paren() {
    assert_eq!(
        parse_err("(field_x foo or field_y bar"),
        ParseError::UnclosedParenthesis
    );
}

#[test]
fn test_parse_unmatched_close_paren() {
    assert_eq!(
        parse_err("field_x foo)"),
        ParseError::UnmatchedCloseParen { position: 11 }
    );
    assert_eq!(
        parse_err(") field foo"),
        ParseError::UnmatchedCloseParen { position: 0 }
    );
    assert_eq!(
        parse_err("(a 1)) or b 2"),
        ParseError::UnmatchedCloseParen { position: 5 }
    );
}

#[test]
fn test_parse_multiple_fields_in_row() {
    assert_eq!(
        parse_err("field_x foo field_y"),
        ParseError::unexpected_token("field_y", 12)
    );
}

#[test]
fn test_parse_multiple_fields_in_row_inside_group() {
    assert_eq!(
        parse_err("(field_x foo field_y bar)"),
        ParseError::unexpected_token("field_y", 13)
    );
}

#[test]
fn test_parse_missing_literal() {
    assert_eq!(parse_err("field"), ParseError::missing_literal("field"));
    assert_eq!(parse_err("field eq"), ParseError::missing_literal("field"));
    assert_eq!(parse_err("(field ==)"), ParseError::missing_literal("field"));
    assert_eq!(
        parse_err("field == && other 1"),
        ParseError::missing_literal("field")
    );
}

#[test]
fn test_parse_trailing_connective() {
    assert_eq!(parse_err("field foo and"), ParseError::UnexpectedEnd);
    assert_eq!(parse_err("field foo ||"), ParseError::UnexpectedEnd);
}

#[test]
fn test_parse_leading_symbolic_connective() {
    assert_eq!(parse_err("&& field foo"), ParseError::unexpected_token("&&", 0));
}

#[test]
fn test_parse_double_connective() {
    assert_eq!(
        parse_err("a 1 && || b 2"),
        ParseError::unexpected_token("||", 7)
    );
}

#[test]
fn test_parse_empty_group() {
    assert_eq!(parse_err("()"), ParseError::unexpected_token(")", 1));
}

#[test]
fn test_parse_only_open_paren() {
    assert_eq!(parse_err("("), ParseError::UnexpectedEnd);
}

#[test]
fn test_parse_unterminated_quote() {
    assert_eq!(
        parse_err("field == 'foo"),
        ParseError::UnterminatedQuote { position: 9 }
    );
    assert_eq!(
        parse_err("\"field == foo"),
        ParseError::UnterminatedQuote { position: 0 }
    );
}

#[test]
fn test_parse_operator_without_field() {
    assert_eq!(parse_err("== foo"), ParseError::unexpected_token("==", 0));
}

#[test]
fn test_parse_nesting_limit() {
    let depth = MAX_NESTING_DEPTH + 1;
    let input = format!("{}a 1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(
        parse_err(&input),
        ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH
        }
    );

    let input = format!(
        "{}a 1{}",
        "(".repeat(MAX_NESTING_DEPTH),
        ")".repeat(MAX_NESTING_DEPTH)
    );
    assert_eq!(parse(&input), eq("a", "1"));
}

#[test]
fn test_parse_pathological_open_parens_terminate() {
    let input = "(".repeat(100_000);
    assert!(ExpressionParser::parse(&input).is_err());
}

// ==================== Display Round Trip ====================

#[test]
fn test_display_round_trip() {
    let inputs = [
        "field foo",
        "field == \"foo foo\"",
        "field eq ''",
        "age gt 20 and (name John or name Jane)",
        "(field_1 foo and field_2 1) or (field_1 qux and field_2 2)",
        "(a 1 or b 2) or c 3",
        "a 1 or b 2 and c 3",
        "conjunction == \"and\"",
        "x == 'say \"hi\"'",
        "\"first name\" != \"\"",
    ];

    for input in inputs {
        let tree = parse(input);
        let rendered = tree.to_string();
        assert_eq!(parse(&rendered), tree, "{input:?} rendered as {rendered:?}");
    }
}
