//! Condition expression evaluation for `{{#if}}` blocks and per-file
//! generation conditions.
//!
//! One small grammar covers every condition surface: boolean literals,
//! dotted context paths, quoted strings, numbers, comparisons, `!`, `&&`,
//! `||` and parentheses. Binding strength from tightest to loosest is
//! `!`, comparisons, `&&`, `||`.
//!
//! Evaluation is total: any malformed expression is simply false, so a
//! broken condition skips its block instead of aborting the render.

use crate::context::{is_truthy, resolve};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Path(String),
    Str(String),
    Number(f64),
    True,
    False,
    Null,
    Not,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy)]
enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Evaluates a condition expression against a JSON context.
///
/// Paths resolve through [`resolve`] and missing values behave like `null`.
/// Comparisons are numeric when both sides are numbers, lexicographic when
/// both sides are strings, and strict equality otherwise. `===` and `!==`
/// are accepted as spellings of `==` and `!=`.
///
/// # Arguments
/// * `expression` - Raw condition text, e.g. `user.age >= 18 && active`
/// * `context` - JSON context the paths resolve against
///
/// # Returns
/// * `bool` - The truthiness of the expression, or `false` when the
///   expression is empty or cannot be parsed
pub fn evaluate(expression: &str, context: &Value) -> bool {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return false;
    }
    let Some(tokens) = tokenize(trimmed) else {
        return false;
    };
    if tokens.is_empty() {
        return false;
    }
    let mut parser = Parser { tokens: &tokens, pos: 0, context };
    match parser.or_expr() {
        // Trailing tokens mean the expression never parsed as a whole.
        Some(value) if parser.pos == tokens.len() => is_truthy(Some(&value)),
        _ => false,
    }
}

/// Splits an expression into tokens, or `None` when it contains anything
/// outside the grammar (single `&`, unterminated string, bad number).
fn tokenize(input: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }
        match ch {
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '&' => {
                if chars.get(i + 1) != Some(&'&') {
                    return None;
                }
                tokens.push(Token::And);
                i += 2;
            }
            '|' => {
                if chars.get(i + 1) != Some(&'|') {
                    return None;
                }
                tokens.push(Token::Or);
                i += 2;
            }
            '=' => {
                if chars.get(i + 1) != Some(&'=') {
                    return None;
                }
                i += 2;
                if chars.get(i) == Some(&'=') {
                    i += 1;
                }
                tokens.push(Token::Eq);
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    i += 2;
                    if chars.get(i) == Some(&'=') {
                        i += 1;
                    }
                    tokens.push(Token::Ne);
                } else {
                    tokens.push(Token::Not);
                    i += 1;
                }
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Le);
                    i += 2;
                } else {
                    tokens.push(Token::Lt);
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Ge);
                    i += 2;
                } else {
                    tokens.push(Token::Gt);
                    i += 1;
                }
            }
            '\'' | '"' => {
                let quote = ch;
                let mut text = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        Some(&c) if c == quote => {
                            i += 1;
                            break;
                        }
                        Some(&c) => {
                            text.push(c);
                            i += 1;
                        }
                        None => return None,
                    }
                }
                tokens.push(Token::Str(text));
            }
            _ if ch.is_ascii_digit()
                || (ch == '-' && matches!(chars.get(i + 1), Some(c) if c.is_ascii_digit())) =>
            {
                let start = i;
                i += 1;
                while matches!(chars.get(i), Some(&c) if c.is_ascii_digit() || c == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::Number(text.parse().ok()?));
            }
            _ if is_path_char(ch) => {
                let start = i;
                while matches!(chars.get(i), Some(&c) if is_path_char(c)) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(match word.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" | "undefined" => Token::Null,
                    _ => Token::Path(word),
                });
            }
            _ => return None,
        }
    }
    Some(tokens)
}

fn is_path_char(ch: char) -> bool {
    !ch.is_whitespace()
        && !matches!(ch, '(' | ')' | '!' | '&' | '|' | '=' | '<' | '>' | '\'' | '"')
}

/// Recursive descent evaluator. Each level returns the JSON value the
/// subexpression produced; logical operators collapse their operands to
/// booleans.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    context: &'a Value,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn or_expr(&mut self) -> Option<Value> {
        let mut left = self.and_expr()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.pos += 1;
            let right = self.and_expr()?;
            left = Value::Bool(is_truthy(Some(&left)) || is_truthy(Some(&right)));
        }
        Some(left)
    }

    fn and_expr(&mut self) -> Option<Value> {
        let mut left = self.cmp_expr()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.pos += 1;
            let right = self.cmp_expr()?;
            left = Value::Bool(is_truthy(Some(&left)) && is_truthy(Some(&right)));
        }
        Some(left)
    }

    fn cmp_expr(&mut self) -> Option<Value> {
        let left = self.unary_expr()?;
        let op = match self.peek() {
            Some(Token::Eq) => CmpOp::Eq,
            Some(Token::Ne) => CmpOp::Ne,
            Some(Token::Lt) => CmpOp::Lt,
            Some(Token::Le) => CmpOp::Le,
            Some(Token::Gt) => CmpOp::Gt,
            Some(Token::Ge) => CmpOp::Ge,
            _ => return Some(left),
        };
        self.pos += 1;
        let right = self.unary_expr()?;
        Some(Value::Bool(compare(op, &left, &right)))
    }

    fn unary_expr(&mut self) -> Option<Value> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.pos += 1;
            let value = self.unary_expr()?;
            return Some(Value::Bool(!is_truthy(Some(&value))));
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<Value> {
        match self.advance()? {
            Token::LParen => {
                let value = self.or_expr()?;
                match self.advance()? {
                    Token::RParen => Some(value),
                    _ => None,
                }
            }
            Token::True => Some(Value::Bool(true)),
            Token::False => Some(Value::Bool(false)),
            Token::Null => Some(Value::Null),
            Token::Number(n) => Some(Value::from(*n)),
            Token::Str(s) => Some(Value::String(s.clone())),
            Token::Path(path) => {
                Some(resolve(self.context, path).cloned().unwrap_or(Value::Null))
            }
            _ => None,
        }
    }
}

fn compare(op: CmpOp, left: &Value, right: &Value) -> bool {
    match op {
        CmpOp::Eq => value_eq(left, right),
        CmpOp::Ne => !value_eq(left, right),
        CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge => ordered(op, left, right),
    }
}

/// Numbers compare numerically so `1` equals `1.0`; everything else uses
/// strict structural equality.
fn value_eq(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}

/// Ordering is defined for number pairs and string pairs only; any other
/// combination is false.
fn ordered(op: CmpOp, left: &Value, right: &Value) -> bool {
    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return match op {
            CmpOp::Lt => l < r,
            CmpOp::Le => l <= r,
            CmpOp::Gt => l > r,
            CmpOp::Ge => l >= r,
            CmpOp::Eq | CmpOp::Ne => false,
        };
    }
    if let (Value::String(l), Value::String(r)) = (left, right) {
        return match op {
            CmpOp::Lt => l < r,
            CmpOp::Le => l <= r,
            CmpOp::Gt => l > r,
            CmpOp::Ge => l >= r,
            CmpOp::Eq | CmpOp::Ne => false,
        };
    }
    false
}
