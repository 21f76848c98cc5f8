//! Expression tree for parsed filter expressions.

use std::fmt;

/// Comparison operators usable between a field and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equal (`eq`, `==`).
    Eq,
    /// Not equal (`neq`, `!=`).
    Neq,
    /// Greater than (`gt`, `>`).
    Gt,
    /// Greater than or equal (`geq`, `>=`).
    Geq,
    /// Less than (`lt`, `<`).
    Lt,
    /// Less than or equal (`leq`, `<=`).
    Leq,
}

impl ComparisonOp {
    /// Matches the word form of an operator, ignoring ASCII case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        const KEYWORDS: [(&str, ComparisonOp); 6] = [
            ("eq", ComparisonOp::Eq),
            ("neq", ComparisonOp::Neq),
            ("gt", ComparisonOp::Gt),
            ("geq", ComparisonOp::Geq),
            ("lt", ComparisonOp::Lt),
            ("leq", ComparisonOp::Leq),
        ];
        KEYWORDS
            .iter()
            .find(|(keyword, _)| keyword.eq_ignore_ascii_case(word))
            .map(|(_, op)| *op)
    }

    /// Matches the symbolic form of an operator.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(ComparisonOp::Eq),
            "!=" => Some(ComparisonOp::Neq),
            ">" => Some(ComparisonOp::Gt),
            ">=" => Some(ComparisonOp::Geq),
            "<" => Some(ComparisonOp::Lt),
            "<=" => Some(ComparisonOp::Leq),
            _ => None,
        }
    }

    /// Returns the symbolic spelling, e.g. `>=`.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Neq => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Geq => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Leq => "<=",
        }
    }

    /// Returns the word spelling, e.g. `geq`.
    pub fn keyword(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Neq => "neq",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Geq => "geq",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Leq => "leq",
        }
    }

    /// Applies the operator to two values of the same type.
    pub fn apply<T: PartialOrd + ?Sized>(self, left: &T, right: &T) -> bool {
        match self {
            ComparisonOp::Eq => left == right,
            ComparisonOp::Neq => left != right,
            ComparisonOp::Gt => left > right,
            ComparisonOp::Geq => left >= right,
            ComparisonOp::Lt => left < right,
            ComparisonOp::Leq => left <= right,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical connectives between two sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// Logical AND (`and`, `&&`). Binds tighter than OR.
    And,
    /// Logical OR (`or`, `||`).
    Or,
}

impl LogicalOp {
    /// Matches the word form of a connective, ignoring ASCII case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(LogicalOp::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(LogicalOp::Or)
        } else {
            None
        }
    }

    /// Matches the symbolic form of a connective.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "&&" => Some(LogicalOp::And),
            "||" => Some(LogicalOp::Or),
            _ => None,
        }
    }

    /// Returns the word spelling used when rendering expressions.
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed filter expression.
///
/// Leaves compare one field against one literal; inner nodes combine two
/// sub-expressions. Every child is exclusively owned by its parent.
///
/// Parsed value lists form chains tens of thousands of nodes deep, so
/// `Clone`, `PartialEq`, `Debug`, `Display` and `Drop` all walk the tree
/// with an explicit stack.
pub enum Expression {
    /// A `field operator literal` test.
    Comparison {
        /// Name of the registered field to extract.
        field: String,
        /// The comparison to perform.
        op: ComparisonOp,
        /// Literal text the field value is compared against (unquoted).
        literal: String,
    },

    /// Two sub-expressions joined by AND or OR.
    Logical {
        /// The connective.
        op: LogicalOp,
        /// Evaluated first.
        left: Box<Expression>,
        /// Evaluated only when `left` does not decide the result.
        right: Box<Expression>,
    },
}

impl Expression {
    /// Creates a comparison leaf.
    ///
    /// # Example
    ///
    /// ```
    /// use booleval::{ComparisonOp, Expression};
    ///
    /// let leaf = Expression::comparison("age", ComparisonOp::Gt, "20");
    /// assert_eq!(leaf.to_string(), "age > 20");
    /// ```
    pub fn comparison(
        field: impl Into<String>,
        op: ComparisonOp,
        literal: impl Into<String>,
    ) -> Self {
        Expression::Comparison {
            field: field.into(),
            op,
            literal: literal.into(),
        }
    }

    /// Creates a logical node from two sub-expressions.
    pub fn logical(op: LogicalOp, left: Expression, right: Expression) -> Self {
        Expression::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an AND node.
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::logical(LogicalOp::And, left, right)
    }

    /// Creates an OR node.
    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::logical(LogicalOp::Or, left, right)
    }

    /// Returns the distinct field names referenced by the tree, in the order
    /// they first appear in the expression text.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for leaf in self.comparisons() {
            if let Expression::Comparison { field, .. } = leaf {
                if !names.contains(&field.as_str()) {
                    names.push(field);
                }
            }
        }
        names
    }

    /// Returns the number of comparison leaves in the tree.
    pub fn comparison_count(&self) -> usize {
        self.comparisons().len()
    }

    /// Collects the comparison leaves left to right without recursing.
    fn comparisons(&self) -> Vec<&Expression> {
        let mut leaves = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Expression::Comparison { .. } => leaves.push(node),
                Expression::Logical { left, right, .. } => {
                    pending.push(right);
                    pending.push(left);
                }
            }
        }
        leaves
    }
}

impl Clone for Expression {
    fn clone(&self) -> Self {
        enum Step<'a> {
            Visit(&'a Expression),
            Join(LogicalOp),
        }

        let mut steps = vec![Step::Visit(self)];
        let mut built: Vec<Expression> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Expression::Comparison { field, op, literal }) => {
                    built.push(Expression::comparison(field.clone(), *op, literal.clone()));
                }
                Step::Visit(Expression::Logical { op, left, right }) => {
                    steps.push(Step::Join(*op));
                    steps.push(Step::Visit(right));
                    steps.push(Step::Visit(left));
                }
                Step::Join(op) => {
                    let right = built.pop().unwrap_or_else(Expression::placeholder);
                    let left = built.pop().unwrap_or_else(Expression::placeholder);
                    built.push(Expression::logical(op, left, right));
                }
            }
        }
        built.pop().unwrap_or_else(Expression::placeholder)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        let mut pending: Vec<(&Expression, &Expression)> = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (
                    Expression::Comparison { field, op, literal },
                    Expression::Comparison {
                        field: other_field,
                        op: other_op,
                        literal: other_literal,
                    },
                ) => {
                    if field != other_field || op != other_op || literal != other_literal {
                        return false;
                    }
                }
                (
                    Expression::Logical { op, left, right },
                    Expression::Logical {
                        op: other_op,
                        left: other_left,
                        right: other_right,
                    },
                ) => {
                    if op != other_op {
                        return false;
                    }
                    pending.push((&**right, &**other_right));
                    pending.push((&**left, &**other_left));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Expression {}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Step<'a> {
            Visit(&'a Expression),
            Text(&'static str),
        }

        let mut steps = vec![Step::Visit(self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Visit(Expression::Comparison { field, op, literal }) => write!(
                    f,
                    "Comparison {{ field: {field:?}, op: {op:?}, literal: {literal:?} }}"
                )?,
                Step::Visit(Expression::Logical { op, left, right }) => {
                    write!(f, "Logical {{ op: {op:?}, left: ")?;
                    steps.push(Step::Text(" }"));
                    steps.push(Step::Visit(right));
                    steps.push(Step::Text(", right: "));
                    steps.push(Step::Visit(left));
                }
            }
        }
        Ok(())
    }
}

impl Drop for Expression {
    // Long chains are deep; tear them down with an explicit stack.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut Expression, pending: &mut Vec<Expression>) {
    if let Expression::Logical { left, right, .. } = node {
        pending.push(std::mem::replace(&mut **left, Expression::placeholder()));
        pending.push(std::mem::replace(&mut **right, Expression::placeholder()));
    }
}

impl Expression {
    fn placeholder() -> Self {
        Expression::Comparison {
            field: String::new(),
            op: ComparisonOp::Eq,
            literal: String::new(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Expression::Logical { op, left, right } = self else {
            return write_comparison(f, self);
        };

        write_operand(f, left, *op, true)?;
        // Walk the right spine of a same-operator chain iteratively.
        let mut next: &Expression = right;
        loop {
            write!(f, " {op} ")?;
            match next {
                Expression::Logical {
                    op: inner,
                    left,
                    right,
                } if inner == op => {
                    write_operand(f, left, *op, true)?;
                    next = &**right;
                }
                other => return write_operand(f, other, *op, false),
            }
        }
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &Expression,
    parent: LogicalOp,
    is_left: bool,
) -> fmt::Result {
    let grouped = match operand {
        Expression::Comparison { .. } => false,
        Expression::Logical { op, .. } => {
            (*op == LogicalOp::Or && parent == LogicalOp::And) || (is_left && *op == parent)
        }
    };
    if grouped {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

fn write_comparison(f: &mut fmt::Formatter<'_>, leaf: &Expression) -> fmt::Result {
    if let Expression::Comparison { field, op, literal } = leaf {
        write_word(f, field)?;
        write!(f, " {op} ")?;
        write_word(f, literal)?;
    }
    Ok(())
}

/// Writes a field name or literal, quoting it when the bare form would not
/// lex back to the same single word.
fn write_word(f: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    if !needs_quotes(word) {
        return f.write_str(word);
    }
    let quote = if word.contains('"') { '\'' } else { '"' };
    write!(f, "{quote}{word}{quote}")
}

fn needs_quotes(word: &str) -> bool {
    word.is_empty()
        || ComparisonOp::from_keyword(word).is_some()
        || LogicalOp::from_keyword(word).is_some()
        || word
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\''))
        || ["==", "!=", ">", "<", "&&", "||"]
            .iter()
            .any(|symbol| word.contains(symbol))
}
