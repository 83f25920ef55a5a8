//! Audio Commons filter string parser.
//!
//! # Grammar
//!
//! ```text
//! expr      = term (operator term)*
//! term      = field ":" value / "(" expr ")" / "NOT" term
//! value     = scalar / "[" scalar "," scalar "]"
//! field     = identifier without ':' or whitespace
//! operator  = "AND" / "OR"          ; case-insensitive
//! scalar    = number / quoted-or-bare string
//! ```
//!
//! NOT binds tightest, then AND, then OR. Terms chained with the same
//! operator end up in one flat group, mixed precedence levels nest.
//! Parentheses and NOT operators may nest at most [`MAX_NESTING_DEPTH`]
//! levels deep.
//!
//! # Example
//!
//! ```text
//! format:wav
//! format:wav AND duration:[2,10]
//! (license:CC0 OR license:BY) AND NOT tags:"field recording"
//! ```

use crate::error::FilterParsingError;

use super::ast::{BoolOp, FilterNode, FilterScalar, FilterTerm, FilterValue};

/// Deepest nesting of parentheses and NOT operators a filter may use.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser for Audio Commons filter expressions.
pub struct FilterParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> FilterParser<'a> {
    /// Creates a new filter parser.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    /// Parses the entire filter expression.
    ///
    /// The returned root is always a [`FilterNode::Group`].
    pub fn parse(input: &str) -> Result<FilterNode, FilterParsingError> {
        let mut parser = FilterParser::new(input);
        parser.skip_whitespace();
        if parser.at_end() {
            return Err(FilterParsingError::syntax("Empty filter", parser.pos));
        }

        let expr = parser.parse_or_expr()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            let message = if parser.peek() == Some(')') {
                "Unbalanced closing parenthesis".to_string()
            } else {
                format!(
                    "Expected AND/OR between terms, found '{}'",
                    &parser.input[parser.pos..]
                )
            };
            return Err(FilterParsingError::syntax(message, parser.pos));
        }

        Ok(match expr {
            group @ FilterNode::Group(_) => group,
            other => FilterNode::Group(vec![other]),
        })
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Consumes and returns the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Enters one nesting level, failing past [`MAX_NESTING_DEPTH`].
    fn descend(&mut self) -> Result<(), FilterParsingError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(FilterParsingError::syntax(
                "Filter nested too deeply",
                self.pos,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn expect(&mut self, expected: char, message: &str) -> Result<(), FilterParsingError> {
        if self.peek() == Some(expected) {
            self.consume();
            Ok(())
        } else {
            Err(FilterParsingError::syntax(message, self.pos))
        }
    }

    /// Checks whether a boolean keyword starts at the current position.
    ///
    /// The keyword must end at a word boundary and must not be a field name
    /// (`not:1` is a term on the field `not`).
    fn at_keyword(&self, keyword: &str) -> bool {
        let rest = &self.input[self.pos..];
        let Some(candidate) = rest.get(..keyword.len()) else {
            return false;
        };
        if !candidate.eq_ignore_ascii_case(keyword) {
            return false;
        }
        let after = &rest[keyword.len()..];
        match after.chars().next() {
            None => true,
            Some(c) if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' => false,
            Some(_) => !after.trim_start().starts_with(':'),
        }
    }

    /// Parses an OR expression (lowest precedence).
    fn parse_or_expr(&mut self) -> Result<FilterNode, FilterParsingError> {
        let first = self.parse_and_expr()?;
        let mut rest = Vec::new();

        loop {
            self.skip_whitespace();
            if self.at_keyword("or") {
                self.pos += 2;
                rest.push(FilterNode::Operator(BoolOp::Or));
                rest.push(self.parse_and_expr()?);
            } else {
                break;
            }
        }

        Ok(Self::join(first, rest))
    }

    /// Parses an AND expression.
    fn parse_and_expr(&mut self) -> Result<FilterNode, FilterParsingError> {
        let first = self.parse_not_expr()?;
        let mut rest = Vec::new();

        loop {
            self.skip_whitespace();
            if self.at_keyword("and") {
                self.pos += 3;
                rest.push(FilterNode::Operator(BoolOp::And));
                rest.push(self.parse_not_expr()?);
            } else {
                break;
            }
        }

        Ok(Self::join(first, rest))
    }

    /// A single operand stays as is, a chain becomes a flat group.
    fn join(first: FilterNode, rest: Vec<FilterNode>) -> FilterNode {
        if rest.is_empty() {
            return first;
        }
        let mut items = Vec::with_capacity(rest.len() + 1);
        items.push(first);
        items.extend(rest);
        FilterNode::Group(items)
    }

    /// Parses a NOT expression.
    fn parse_not_expr(&mut self) -> Result<FilterNode, FilterParsingError> {
        self.skip_whitespace();
        if self.at_keyword("not") {
            self.descend()?;
            self.pos += 3;
            let operand = self.parse_not_expr()?;
            self.depth -= 1;
            Ok(FilterNode::Group(vec![
                FilterNode::Operator(BoolOp::Not),
                operand,
            ]))
        } else {
            self.parse_primary()
        }
    }

    /// Parses a primary expression (term or parenthesized expression).
    fn parse_primary(&mut self) -> Result<FilterNode, FilterParsingError> {
        self.skip_whitespace();

        match self.peek() {
            Some('(') => {
                self.descend()?;
                self.consume();
                self.skip_whitespace();
                if self.peek() == Some(')') {
                    return Err(FilterParsingError::syntax("Empty parentheses", self.pos));
                }
                let expr = self.parse_or_expr()?;
                self.skip_whitespace();
                match self.peek() {
                    Some(')') => {
                        self.consume();
                        self.depth -= 1;
                        Ok(expr)
                    }
                    None => Err(FilterParsingError::syntax(
                        "Expected closing parenthesis",
                        self.pos,
                    )),
                    Some(_) => Err(FilterParsingError::syntax(
                        "Expected AND/OR or closing parenthesis",
                        self.pos,
                    )),
                }
            }
            None => Err(FilterParsingError::syntax("Expected filter term", self.pos)),
            Some(_) => self.parse_term().map(FilterNode::Term),
        }
    }

    /// Parses a `field:value` term.
    fn parse_term(&mut self) -> Result<FilterTerm, FilterParsingError> {
        let field = self.parse_identifier();
        if field.is_empty() {
            return Err(FilterParsingError::syntax("Expected field name", self.pos));
        }

        self.skip_whitespace();
        self.expect(':', &format!("Expected ':' after field '{}'", field))?;
        self.skip_whitespace();

        let value = self.parse_value()?;
        Ok(FilterTerm { field, value })
    }

    /// Parses a field identifier.
    fn parse_identifier(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, ':' | '(' | ')' | '[' | ']' | ',' | '"' | '\'') {
                break;
            }
            self.consume();
        }
        self.input[start..self.pos].to_string()
    }

    /// Parses a scalar or a `[low,high]` range.
    fn parse_value(&mut self) -> Result<FilterValue, FilterParsingError> {
        if self.peek() != Some('[') {
            return self.parse_scalar(false).map(FilterValue::Scalar);
        }

        self.consume();
        self.skip_whitespace();
        let low = self.parse_scalar(true)?;
        self.skip_whitespace();
        self.expect(',', "Expected ',' between range bounds")?;
        self.skip_whitespace();
        let high = self.parse_scalar(true)?;
        self.skip_whitespace();
        self.expect(']', "Expected ']' to close range")?;
        Ok(FilterValue::Range(low, high))
    }

    /// Parses a quoted string or a bare token.
    fn parse_scalar(&mut self, in_range: bool) -> Result<FilterScalar, FilterParsingError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_quoted_string(quote).map(FilterScalar::Text),
            _ => self.parse_bare_value(in_range).map(|token| classify(&token)),
        }
    }

    /// Parses a quoted string value.
    fn parse_quoted_string(&mut self, quote: char) -> Result<String, FilterParsingError> {
        let start = self.pos;
        self.consume(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.consume() {
                Some(c) if c == quote => break,
                Some('\\') => {
                    if let Some(escaped) = self.consume() {
                        match escaped {
                            'n' => value.push('\n'),
                            't' => value.push('\t'),
                            'r' => value.push('\r'),
                            '"' | '\'' | '\\' => value.push(escaped),
                            _ => {
                                value.push('\\');
                                value.push(escaped);
                            }
                        }
                    }
                }
                Some(c) => value.push(c),
                None => {
                    return Err(FilterParsingError::syntax("Unterminated string", start));
                }
            }
        }

        Ok(value)
    }

    /// Parses an unquoted value.
    fn parse_bare_value(&mut self, in_range: bool) -> Result<String, FilterParsingError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            let stop = c.is_whitespace()
                || matches!(c, '(' | ')' | '[' | ']')
                || (in_range && c == ',');
            if stop {
                break;
            }
            self.consume();
        }

        let value = &self.input[start..self.pos];
        if value.is_empty() {
            return Err(FilterParsingError::syntax("Expected value", self.pos));
        }

        Ok(value.to_string())
    }
}

/// Decides whether a bare token is a number or text.
fn classify(token: &str) -> FilterScalar {
    let numeric_start = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));

    if numeric_start {
        if let Ok(i) = token.parse::<i64>() {
            return FilterScalar::Integer(i);
        }
        if let Ok(f) = token.parse::<f64>() {
            if f.is_finite() {
                return FilterScalar::Float(f);
            }
        }
    }

    FilterScalar::Text(token.to_string())
}

/// Parses a filter string. Shorthand for [`FilterParser::parse`].
pub fn parse_filter(input: &str) -> Result<FilterNode, FilterParsingError> {
    FilterParser::parse(input)
}
