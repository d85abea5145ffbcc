use std::{fmt::Display, ops::Range};

use crate::{
    identifier::Identifier,
    value::{Define, Expr, Statement, Unit},
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '%' => Some(Operator::Mod),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Mod => '%',
            Operator::Pow => '^',
        };
        write!(f, "{}", c)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum EqualityOperator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Display for EqualityOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EqualityOperator::Equal => write!(f, "=="),
            EqualityOperator::NotEqual => write!(f, "!="),
            EqualityOperator::Less => write!(f, "<"),
            EqualityOperator::LessOrEqual => write!(f, "<="),
            EqualityOperator::Greater => write!(f, ">"),
            EqualityOperator::GreaterOrEqual => write!(f, ">="),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum TokenKind {
    Number(f64),
    Identifier(Identifier),
    Operator(Operator),
    Eq(EqualityOperator),
    Ctrl(char),
    Assign,
    /// `to` or `in`
    Convert,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number(num) => write!(f, "{}", num),
            TokenKind::Identifier(id) => write!(f, "{}", id),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Eq(op) => write!(f, "{}", op),
            TokenKind::Ctrl(c) => write!(f, "{}", c),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Convert => write!(f, "to"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    kind: TokenKind,
    span: Range<usize>,
}

impl From<Identifier> for TokenKind {
    fn from(id: Identifier) -> Self {
        TokenKind::Identifier(id)
    }
}

impl From<f64> for TokenKind {
    fn from(num: f64) -> Self {
        TokenKind::Number(num)
    }
}

impl From<Operator> for TokenKind {
    fn from(op: Operator) -> Self {
        TokenKind::Operator(op)
    }
}

impl From<EqualityOperator> for TokenKind {
    fn from(op: EqualityOperator) -> Self {
        TokenKind::Eq(op)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Syntax {
    #[error("malformed number")]
    MalformedNumber,
    #[error("expected `{0}`")]
    ExpectedChar(char),
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
}

/// An error together with the character range it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct Error<T> {
    pub err: T,
    pub span: Range<usize>,
}

impl<T> Error<T> {
    pub fn new(err: T, span: Range<usize>) -> Self {
        Error { err, span }
    }
}

impl<T: Display> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.err, self.span.start, self.span.end)
    }
}

pub struct TextParser {
    chars: Vec<char>,
    pos: usize,
    start_pos: usize,
    tokens: Vec<Token>,
    errors: Vec<Error<Syntax>>,
}

impl TextParser {
    pub fn new(s: &str) -> Self {
        TextParser {
            chars: s.chars().collect(),
            pos: 0,
            start_pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn next(&mut self) -> Option<char> {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
        self.current()
    }

    fn start(&mut self) {
        self.start_pos = self.pos;
    }

    fn token(&mut self, token: impl Into<TokenKind>) {
        self.tokens.push(Token {
            kind: token.into(),
            span: self.start_pos..self.pos,
        });
    }

    fn error(&mut self, kind: Syntax) {
        self.errors.push(Error {
            err: kind,
            span: self.start_pos..self.pos,
        });
    }

    fn digits(&mut self, literal: &mut String) -> usize {
        let mut count = 0;
        while let Some(c) = self.current().filter(char::is_ascii_digit) {
            literal.push(c);
            count += 1;
            self.next();
        }
        count
    }

    fn parse_number(&mut self) {
        let mut literal = String::new();
        let mut count = self.digits(&mut literal);
        if self.current() == Some('.') {
            literal.push('.');
            self.next();
            count += self.digits(&mut literal);
        }
        // An exponent needs at least one digit, otherwise `2e` is `2 * e`.
        if let Some(e @ ('e' | 'E')) = self.current() {
            let signed = matches!(self.peek(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek(digit_at).map_or(false, |c| c.is_ascii_digit()) {
                literal.push(e);
                if signed {
                    literal.push(self.peek(1).unwrap_or('+'));
                    self.next();
                }
                self.next();
                self.digits(&mut literal);
            }
        }
        match literal.parse::<f64>() {
            Ok(num) if count > 0 => self.token(num),
            _ => self.error(Syntax::MalformedNumber),
        }
    }

    fn parse_word(&mut self) {
        let mut word = String::new();
        while let Some(c) = self.current().filter(|c| Identifier::is_continue(*c)) {
            word.push(c);
            self.next();
        }
        if Identifier::is_keyword(&word) {
            self.token(TokenKind::Convert);
        } else {
            self.token(Identifier::new_unchecked(word));
        }
    }

    fn parse_raw(&mut self) {
        while let Some(current) = self.current() {
            if current.is_whitespace() {
                self.next();
                continue;
            }
            self.start();
            if current == '#' {
                // comment until end of line
                break;
            } else if Identifier::is_start(current) {
                self.parse_word();
            } else if current.is_ascii_digit() || current == '.' {
                self.parse_number();
            } else if let Some(op) = Operator::from_char(current) {
                self.next();
                self.token(op);
            } else if let Some(op) = match current {
                '=' => {
                    if self.next() == Some('=') {
                        self.next();
                        Some(EqualityOperator::Equal)
                    } else {
                        self.token(TokenKind::Assign);
                        continue;
                    }
                }
                '!' => {
                    if self.next() == Some('=') {
                        self.next();
                        Some(EqualityOperator::NotEqual)
                    } else {
                        self.error(Syntax::ExpectedChar('='));
                        continue;
                    }
                }
                '<' => {
                    if self.next() == Some('=') {
                        self.next();
                        Some(EqualityOperator::LessOrEqual)
                    } else {
                        Some(EqualityOperator::Less)
                    }
                }
                '>' => {
                    if self.next() == Some('=') {
                        self.next();
                        Some(EqualityOperator::GreaterOrEqual)
                    } else {
                        Some(EqualityOperator::Greater)
                    }
                }
                _ => None,
            } {
                self.token(op);
            } else if matches!(current, '(' | ')' | ',') {
                self.next();
                self.token(TokenKind::Ctrl(current));
            } else {
                self.next();
                self.error(Syntax::UnexpectedChar(current));
            }
        }
    }

    pub fn parse(mut self) -> Result<Vec<Token>, Vec<Error<Syntax>>> {
        self.parse_raw();
        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Parse {
    #[error("expected `{0}`")]
    ExpectedToken(TokenKind),
    #[error("expected a value")]
    ExpectedValue,
    #[error("unexpected trailing input")]
    TrailingInput,
    #[error("only names can be assigned to")]
    InvalidAssignTarget,
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
    #[error("unit exponent out of range")]
    UnitExponent,
    #[error("expression is nested too deeply")]
    TooComplex,
}

/// Deepest run of parentheses, call arguments, signs and exponents.
const MAX_NESTING: usize = 64;
/// Most operator nodes in one statement.
const MAX_NODES: usize = 256;

#[derive(Debug)]
pub struct TokenParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    nodes: usize,
}

impl<'a> TokenParser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            nodes: 0,
        }
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, Error<Parse>>,
    ) -> Result<T, Error<Parse>> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(Parse::TooComplex));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn node(&mut self) -> Result<(), Error<Parse>> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(self.error(Parse::TooComplex));
        }
        Ok(())
    }

    fn binary(&mut self, op: Operator, lhs: Expr, rhs: Expr) -> Result<Expr, Error<Parse>> {
        self.node()?;
        Ok(Expr::binary(op, lhs, rhs))
    }

    fn error(&self, kind: Parse) -> Error<Parse> {
        let span = match self.tokens.get(self.pos) {
            Some(token) => token.span.clone(),
            None => {
                let end = self.tokens.last().map_or(0, |token| token.span.end);
                end..end
            }
        };
        Error::new(kind, span)
    }

    fn current(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos).map(|token| &token.kind)
    }

    fn peek(&self, n: usize) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos + n).map(|token| &token.kind)
    }

    fn next(&mut self) -> Option<&'a TokenKind> {
        self.pos += 1;
        self.current()
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), Error<Parse>> {
        if self.current() == Some(&kind) {
            self.next();
            Ok(())
        } else {
            Err(self.error(Parse::ExpectedToken(kind)))
        }
    }

    fn expect_end(&self) -> Result<(), Error<Parse>> {
        match self.current() {
            None => Ok(()),
            Some(TokenKind::Assign) => Err(self.error(Parse::InvalidAssignTarget)),
            Some(_) => Err(self.error(Parse::TrailingInput)),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, Error<Parse>> {
        self.expect(TokenKind::Ctrl('('))?;
        let mut args = Vec::new();
        if self.current() == Some(&TokenKind::Ctrl(')')) {
            self.next();
            return Ok(args);
        }
        loop {
            args.push(self.parse_comparison()?);
            match self.current() {
                Some(TokenKind::Ctrl(',')) => {
                    self.next();
                }
                Some(TokenKind::Ctrl(')')) => {
                    self.next();
                    return Ok(args);
                }
                _ => return Err(self.error(Parse::ExpectedToken(TokenKind::Ctrl(')')))),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Expr, Error<Parse>> {
        match self.current() {
            Some(TokenKind::Number(num)) => {
                self.next();
                Ok(Expr::from(*num))
            }
            Some(TokenKind::Identifier(id)) => {
                if self.peek(1) == Some(&TokenKind::Ctrl('(')) {
                    self.next();
                    let args = self.nested(Self::parse_args)?;
                    Ok(Expr::Call(id.clone(), args))
                } else {
                    self.next();
                    Ok(Expr::from(id.clone()))
                }
            }
            Some(TokenKind::Ctrl('(')) => {
                self.next();
                let expr = self.nested(Self::parse_comparison)?;
                self.expect(TokenKind::Ctrl(')'))?;
                Ok(expr)
            }
            _ => Err(self.error(Parse::ExpectedValue)),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, Error<Parse>> {
        let base = self.parse_value()?;
        if self.current() == Some(&TokenKind::Operator(Operator::Pow)) {
            self.next();
            let exponent = self.nested(Self::parse_unary)?;
            return self.binary(Operator::Pow, base, exponent);
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error<Parse>> {
        match self.current() {
            Some(TokenKind::Operator(Operator::Sub)) => {
                self.next();
                let expr = self.nested(Self::parse_unary)?;
                Ok(Expr::Neg(Box::new(expr)))
            }
            Some(TokenKind::Operator(Operator::Add)) => {
                self.next();
                self.nested(Self::parse_unary)
            }
            _ => self.parse_power(),
        }
    }

    /// Implicit multiplication binds tighter than `*` and `/`, so `90 km / 2 h` is `(90 km) / (2 h)`.
    fn parse_implicit(&mut self) -> Result<Expr, Error<Parse>> {
        let mut lhs = self.parse_unary()?;
        while let Some(TokenKind::Number(_) | TokenKind::Identifier(_) | TokenKind::Ctrl('(')) =
            self.current()
        {
            let rhs = self.parse_power()?;
            lhs = self.binary(Operator::Mul, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, Error<Parse>> {
        let mut lhs = self.parse_implicit()?;
        while let Some(TokenKind::Operator(op @ (Operator::Mul | Operator::Div | Operator::Mod))) =
            self.current()
        {
            self.next();
            let rhs = self.parse_implicit()?;
            lhs = self.binary(*op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn parse_sum(&mut self) -> Result<Expr, Error<Parse>> {
        let mut lhs = self.parse_term()?;
        while let Some(TokenKind::Operator(op @ (Operator::Add | Operator::Sub))) = self.current() {
            self.next();
            let rhs = self.parse_term()?;
            lhs = self.binary(*op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn parse_unit_factor(&mut self) -> Result<Unit, Error<Parse>> {
        let Some(TokenKind::Identifier(id)) = self.current() else {
            return Err(self.error(Parse::ExpectedValue));
        };
        let unit = Unit::find(id.as_str())
            .ok_or_else(|| self.error(Parse::UnknownUnit(id.to_string())))?;
        self.next();
        if self.current() != Some(&TokenKind::Operator(Operator::Pow)) {
            return Ok(unit);
        }
        let negative = self.next() == Some(&TokenKind::Operator(Operator::Sub));
        if negative {
            self.next();
        }
        match self.current() {
            Some(TokenKind::Number(n)) if n.fract() == 0.0 => {
                self.next();
                let n = *n as i32;
                unit.powi(if negative { -n } else { n })
                    .map_err(|_| self.error(Parse::UnitExponent))
            }
            _ => Err(self.error(Parse::ExpectedValue)),
        }
    }

    fn parse_unit(&mut self) -> Result<Unit, Error<Parse>> {
        let mut unit = self.parse_unit_factor()?;
        loop {
            match self.current() {
                Some(TokenKind::Operator(Operator::Mul)) => {
                    self.next();
                    let factor = self.parse_unit_factor()?;
                    unit = self.combine(&unit, &factor)?;
                }
                Some(TokenKind::Operator(Operator::Div)) => {
                    self.next();
                    let factor = self.parse_unit_factor()?;
                    let factor = factor
                        .inverse()
                        .map_err(|_| self.error(Parse::UnitExponent))?;
                    unit = self.combine(&unit, &factor)?;
                }
                Some(TokenKind::Identifier(_)) => {
                    let factor = self.parse_unit_factor()?;
                    unit = self.combine(&unit, &factor)?;
                }
                _ => return Ok(unit),
            }
        }
    }

    fn combine(&self, unit: &Unit, factor: &Unit) -> Result<Unit, Error<Parse>> {
        unit.mul(factor).map_err(|_| self.error(Parse::UnitExponent))
    }

    fn parse_conversion(&mut self) -> Result<Expr, Error<Parse>> {
        let mut expr = self.parse_sum()?;
        while self.current() == Some(&TokenKind::Convert) {
            self.next();
            self.node()?;
            expr = Expr::Convert(Box::new(expr), self.parse_unit()?);
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<Expr, Error<Parse>> {
        let lhs = self.parse_conversion()?;
        if let Some(TokenKind::Eq(op)) = self.current() {
            self.next();
            let rhs = self.parse_conversion()?;
            return Ok(Expr::Compare(*op, Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    /// `name(arg, ...) =` at the start of the statement, with the position of the body.
    fn parse_signature(&self) -> Option<(Vec<Identifier>, usize)> {
        let mut pos = 2;
        let mut args = Vec::new();
        if self.peek(pos) == Some(&TokenKind::Ctrl(')')) {
            pos += 1;
        } else {
            loop {
                let Some(TokenKind::Identifier(arg)) = self.peek(pos) else {
                    return None;
                };
                args.push(arg.clone());
                pos += 1;
                match self.peek(pos) {
                    Some(TokenKind::Ctrl(',')) => pos += 1,
                    Some(TokenKind::Ctrl(')')) => {
                        pos += 1;
                        break;
                    }
                    _ => return None,
                }
            }
        }
        (self.peek(pos) == Some(&TokenKind::Assign)).then_some((args, pos + 1))
    }

    pub fn parse(&mut self) -> Result<Statement, Error<Parse>> {
        if self.tokens.is_empty() {
            return Ok(Statement::Empty);
        }
        if let Some(TokenKind::Identifier(name)) = self.current() {
            match self.peek(1) {
                Some(TokenKind::Assign) => {
                    self.pos += 2;
                    let expr = self.parse_comparison()?;
                    self.expect_end()?;
                    return Ok(Statement::Assignment(name.clone(), expr));
                }
                Some(TokenKind::Ctrl('(')) => {
                    if let Some((args, body)) = self.parse_signature() {
                        self.pos = body;
                        let expr = self.parse_comparison()?;
                        self.expect_end()?;
                        return Ok(Statement::Define(name.clone(), Define::from((args, expr))));
                    }
                }
                _ => {}
            }
        }
        let expr = self.parse_comparison()?;
        self.expect_end()?;
        Ok(Statement::Expr(expr))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("syntax error: {0}")]
    Syntax(Error<Syntax>),
    #[error("parse error: {0}")]
    Parse(Error<Parse>),
    #[error(transparent)]
    Runtime(#[from] crate::value::Runtime),
}

pub fn parse_statement(string: &str) -> Result<Statement, EvalError> {
    let tokens = TextParser::new(string)
        .parse()
        .map_err(|mut errors| EvalError::Syntax(errors.swap_remove(0)))?;
    TokenParser::new(&tokens).parse().map_err(EvalError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(s: &str) -> Vec<TokenKind> {
        TextParser::new(s)
            .parse()
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn id(s: &str) -> Identifier {
        Identifier::from_str(s).unwrap()
    }

    #[test]
    fn tokenizes_numbers() {
        assert_eq!(kinds("1.5"), vec![TokenKind::Number(1.5)]);
        assert_eq!(kinds(".5"), vec![TokenKind::Number(0.5)]);
        assert_eq!(kinds("2.5E-3"), vec![TokenKind::Number(0.0025)]);
        assert_eq!(
            kinds("2e"),
            vec![TokenKind::Number(2.0), TokenKind::Identifier(id("e"))]
        );
        assert!(TextParser::new(".").parse().is_err());
    }

    #[test]
    fn tokenizes_operators_and_comments() {
        assert_eq!(
            kinds("a == b # note"),
            vec![
                TokenKind::Identifier(id("a")),
                TokenKind::Eq(EqualityOperator::Equal),
                TokenKind::Identifier(id("b")),
            ]
        );
        assert_eq!(
            kinds("x=1 to km"),
            vec![
                TokenKind::Identifier(id("x")),
                TokenKind::Assign,
                TokenKind::Number(1.0),
                TokenKind::Convert,
                TokenKind::Identifier(id("km")),
            ]
        );
    }

    #[test]
    fn reports_spans() {
        let errors = TextParser::new("1 + $").parse().unwrap_err();
        assert_eq!(errors, vec![Error::new(Syntax::UnexpectedChar('$'), 4..5)]);
    }

    #[test]
    fn precedence() {
        let statement = parse_statement("-2^2").unwrap();
        assert_eq!(
            statement,
            Statement::Expr(Expr::Neg(Box::new(Expr::binary(
                Operator::Pow,
                Expr::from(2.0),
                Expr::from(2.0)
            ))))
        );

        let statement = parse_statement("1 + 2x").unwrap();
        assert_eq!(
            statement,
            Statement::Expr(Expr::binary(
                Operator::Add,
                Expr::from(1.0),
                Expr::binary(Operator::Mul, Expr::from(2.0), Expr::from(id("x")))
            ))
        );
    }

    #[test]
    fn statements() {
        assert_eq!(parse_statement("   ").unwrap(), Statement::Empty);
        assert!(matches!(
            parse_statement("total = 1").unwrap(),
            Statement::Assignment(name, _) if name == id("total")
        ));
        match parse_statement("f(x, y) = x * y").unwrap() {
            Statement::Define(name, def) => {
                assert_eq!(name, id("f"));
                assert_eq!(def.args, vec![id("x"), id("y")]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            parse_statement("g() = 4").unwrap(),
            Statement::Define(_, def) if def.args.is_empty()
        ));
        assert!(matches!(
            parse_statement("f(2)").unwrap(),
            Statement::Expr(Expr::Call(_, _))
        ));
    }

    #[test]
    fn deep_input_is_rejected() {
        let too_complex = |input: &str| {
            matches!(
                parse_statement(input),
                Err(EvalError::Parse(Error {
                    err: Parse::TooComplex,
                    ..
                }))
            )
        };
        let nested = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert!(parse_statement(&nested(MAX_NESTING - 1)).is_ok());
        assert!(too_complex(&nested(300)));
        assert!(too_complex(&"-".repeat(1000)));
        assert!(too_complex(&vec!["2"; 500].join("^")));
        assert!(too_complex(&format!("{}1{}", "abs(".repeat(300), ")".repeat(300))));

        assert!(parse_statement(&vec!["1"; MAX_NODES + 1].join("+")).is_ok());
        assert!(too_complex(&vec!["1"; MAX_NODES + 2].join("+")));
        assert!(too_complex(&vec!["1"; 2000].join("+")));
        assert!(too_complex(&format!("1 m{}", " to m".repeat(MAX_NODES + 1))));
    }

    #[test]
    fn unit_exponents_out_of_range() {
        assert!(matches!(
            parse_statement("1 to m^200"),
            Err(EvalError::Parse(Error {
                err: Parse::UnitExponent,
                ..
            }))
        ));
        assert!(matches!(
            parse_statement("1 to m^100 m^100"),
            Err(EvalError::Parse(Error {
                err: Parse::UnitExponent,
                ..
            }))
        ));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            parse_statement("2 = 3"),
            Err(EvalError::Parse(Error {
                err: Parse::InvalidAssignTarget,
                ..
            }))
        ));
        assert!(matches!(
            parse_statement("(1 + 2"),
            Err(EvalError::Parse(Error {
                err: Parse::ExpectedToken(TokenKind::Ctrl(')')),
                ..
            }))
        ));
        assert!(matches!(
            parse_statement("1 +"),
            Err(EvalError::Parse(Error {
                err: Parse::ExpectedValue,
                ..
            }))
        ));
        assert!(matches!(
            parse_statement("1 m to parsec"),
            Err(EvalError::Parse(Error {
                err: Parse::UnknownUnit(_),
                ..
            }))
        ));
    }
}
