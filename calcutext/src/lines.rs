use std::borrow::Cow;

use interpreter::{Environment, EvalError, Value};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use uuid::Uuid;

use crate::format::{format_value, FormattedValue};

lazy_static! {
    // `1_000` -> `1000`, while `x_1` is left alone.
    static ref DIGIT_GROUPS: Regex = Regex::new(r"\b[0-9_]+").expect("valid digit group pattern");
}

/// What the line evaluator needs from an expression engine.
pub trait Evaluator {
    fn reset(&mut self);
    fn evaluate(&mut self, expression: &str) -> Result<Option<Value>, EvalError>;
    fn is_bound(&self, name: &str) -> bool;
    fn bound_names(&self) -> Vec<&str>;
}

impl Evaluator for Environment {
    fn reset(&mut self) {
        Environment::reset(self)
    }

    fn evaluate(&mut self, expression: &str) -> Result<Option<Value>, EvalError> {
        Environment::evaluate(self, expression)
    }

    fn is_bound(&self, name: &str) -> bool {
        Environment::is_bound(self, name)
    }

    fn bound_names(&self) -> Vec<&str> {
        Environment::bound_names(self).map(|id| id.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Variable { name: String, active: bool },
}

/// One evaluated line of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub id: Uuid,
    pub input: String,
    pub segments: Vec<Segment>,
    pub result: Option<FormattedValue>,
}

impl Line {
    pub fn html(&self) -> String {
        let mut html = String::with_capacity(self.input.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => escape_html(text, &mut html),
                Segment::Variable { name, active } => {
                    html.push_str(&format!(
                        r#"<span class="variable variable-{name}{}" data-variable="{name}">{name}</span>"#,
                        if *active { " variable-active" } else { "" },
                    ));
                }
            }
        }
        html
    }

    /// The variable rendered at the given character column, if any.
    pub fn variable_at(&self, column: usize) -> Option<&str> {
        let mut start = 0;
        for segment in &self.segments {
            let (text, name) = match segment {
                Segment::Text(text) => (text.as_str(), None),
                Segment::Variable { name, .. } => (name.as_str(), Some(name.as_str())),
            };
            let end = start + text.chars().count();
            if (start..end).contains(&column) {
                return name;
            }
            start = end;
        }
        None
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Variable { name, .. } => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }
}

fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

pub fn normalize_digits(input: &str) -> Cow<'_, str> {
    DIGIT_GROUPS.replace_all(input, |caps: &Captures| caps[0].replace('_', ""))
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits the line into word runs and the text between them in one pass,
/// marking every word that names a bound variable.
pub fn annotate(input: &str, is_bound: impl Fn(&str) -> bool, active: Option<&str>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = input;
    while let Some(first) = rest.chars().next() {
        let word = is_word(first);
        let end = rest.find(|c: char| is_word(c) != word).unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        if word && is_bound(run) {
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Variable {
                name: run.to_owned(),
                active: active == Some(run),
            });
        } else {
            text.push_str(run);
        }
        rest = tail;
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

/// `\n` or `\r\n` separated lines; the empty body has none.
pub fn split_lines(body: &str) -> Vec<&str> {
    if body.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<&str> = body.split('\n').collect();
    let last = lines.len() - 1;
    for line in &mut lines[..last] {
        *line = line.strip_suffix('\r').unwrap_or(line);
    }
    lines
}

/// Evaluates a whole document line by line against one shared evaluator.
#[derive(Debug, Default)]
pub struct LineEvaluator<E> {
    evaluator: E,
}

impl<E: Evaluator> LineEvaluator<E> {
    pub fn new(evaluator: E) -> Self {
        LineEvaluator { evaluator }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn bound_names(&self) -> Vec<&str> {
        self.evaluator.bound_names()
    }

    fn result(&mut self, input: &str) -> Option<FormattedValue> {
        match self.evaluator.evaluate(&normalize_digits(input)) {
            Ok(value) => value.as_ref().and_then(format_value),
            Err(err) => {
                log::trace!("no result for {:?}: {}", input, err);
                None
            }
        }
    }

    pub fn evaluate(&mut self, body: &str, active: Option<&str>) -> Vec<Line> {
        #[cfg(feature = "tracy")]
        profiling::scope!("LineEvaluator::evaluate");
        self.evaluator.reset();
        split_lines(body)
            .into_iter()
            .map(|input| {
                // evaluation first, it may bind names the annotation has to see
                let result = self.result(input);
                let segments = annotate(input, |name| self.evaluator.is_bound(name), active);
                Line {
                    id: Uuid::new_v4(),
                    input: input.to_owned(),
                    segments,
                    result,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn evaluate(body: &str) -> Vec<Line> {
        LineEvaluator::new(Environment::new()).evaluate(body, None)
    }

    fn results(lines: &[Line]) -> Vec<Option<String>> {
        lines
            .iter()
            .map(|line| line.result.as_ref().map(|r| r.to_string()))
            .collect()
    }

    fn var(name: &str, active: bool) -> Segment {
        Segment::Variable {
            name: name.to_owned(),
            active,
        }
    }

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_owned())
    }

    #[test]
    fn splits_lines() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a"), vec!["a"]);
        assert_eq!(split_lines("a\r\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines("a\r"), vec!["a\r"]);
    }

    #[test]
    fn digit_groups() {
        assert_eq!(normalize_digits("1_000 + 1"), "1000 + 1");
        assert_eq!(normalize_digits("x_1 + 2_5"), "x_1 + 25");
        assert_eq!(normalize_digits("1_000_000.5_0"), "1000000.50");
    }

    #[test]
    fn underscored_numbers_evaluate_like_plain_ones() {
        assert_eq!(results(&evaluate("1_000 + 1")), results(&evaluate("1000 + 1")));
        assert_eq!(results(&evaluate("1_000 + 1")), vec![Some("1001".to_owned())]);
    }

    #[test]
    fn later_lines_see_earlier_variables() {
        let lines = evaluate("rent = 1_200\nfood = 450.5\nrent + food\n\nnonsense +");
        assert_eq!(
            results(&lines),
            vec![
                Some("1200".to_owned()),
                Some("450.50".to_owned()),
                Some("1650.50".to_owned()),
                None,
                None,
            ]
        );
        assert_eq!(lines[2].segments, vec![var("rent", false), text(" + "), var("food", false)]);
        assert_eq!(lines[3].segments, vec![]);
    }

    #[test]
    fn annotation_matches_whole_words() {
        let lines = LineEvaluator::new(Environment::new()).evaluate("a = 2\ncat + a", Some("a"));
        assert_eq!(lines[1].segments, vec![text("cat + "), var("a", true)]);
        assert_eq!(lines[0].segments, vec![var("a", true), text(" = 2")]);
    }

    #[test]
    fn annotation_does_not_nest() {
        let mut evaluator = LineEvaluator::new(Environment::new());
        let lines = evaluator.evaluate("variable = 1\nv = 2\nvariable + v", None);
        assert_eq!(
            lines[2].html(),
            r#"<span class="variable variable-variable" data-variable="variable">variable</span> + <span class="variable variable-v" data-variable="v">v</span>"#
        );
    }

    #[test]
    fn names_are_annotated_only_once_bound() {
        let lines = evaluate("x + 1\nx = 3\nx + 1");
        assert_eq!(lines[0].segments, vec![text("x + 1")]);
        assert_eq!(lines[0].result, None);
        assert_eq!(lines[2].segments, vec![var("x", false), text(" + 1")]);
        assert_eq!(lines[2].result, Some(FormattedValue::Integer(4)));
    }

    #[test]
    fn html_escapes_text() {
        let lines = evaluate("a = 1\na < 2 & <b>");
        assert_eq!(
            lines[1].html(),
            r#"<span class="variable variable-a" data-variable="a">a</span> &lt; 2 &amp; &lt;b&gt;"#
        );
    }

    #[test]
    fn hit_testing() {
        let lines = evaluate("total = 5\n2 * total");
        let line = &lines[1];
        assert_eq!(line.variable_at(0), None);
        assert_eq!(line.variable_at(4), Some("total"));
        assert_eq!(line.variable_at(8), Some("total"));
        assert_eq!(line.variable_at(9), None);
        assert_eq!(line.variables().collect::<Vec<_>>(), vec!["total"]);
    }

    #[test]
    fn units_and_formatting() {
        let lines = evaluate("5 cm + 2 inch\n2_000_000 * 3\n1 / 3\n3 > 2\nf(x) = x^2");
        assert_eq!(
            results(&lines),
            vec![
                Some("10.08 cm".to_owned()),
                Some("6.00e+6".to_owned()),
                Some("0.33".to_owned()),
                None,
                None,
            ]
        );
    }

    #[test]
    fn oversized_lines_have_no_result() {
        let long_sum = vec!["1"; 2500].join("+");
        assert!(long_sum.len() > 4096);
        let deep = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        let body = [long_sum.as_str(), deep.as_str(), "1 + 1"].join("\n");
        assert_eq!(results(&evaluate(&body)), vec![None, None, Some("2".to_owned())]);
    }

    #[test]
    fn unit_exponent_overflow_has_no_result() {
        let lines = evaluate("(1 m)^100 * (1 km)^100
(1 L)^1000000000
(2 m)^256
(2 m)^3");
        assert_eq!(results(&lines), vec![None, None, None, Some("8.00 m^3".to_owned())]);
    }

    fn expression_piece() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("("),
            Just(")"),
            Just("+"),
            Just("-"),
            Just("*"),
            Just("/"),
            Just("%"),
            Just("^"),
            Just(" "),
            Just("1"),
            Just("2 m"),
            Just("km"),
            Just(" to m"),
            Just("x"),
            Just("1e300"),
            Just("sqrt("),
            Just(","),
            Just("="),
            Just(">"),
        ]
    }

    proptest! {
        #[test]
        fn generated_expressions_evaluate(pieces in prop::collection::vec(expression_piece(), 0..600)) {
            let line = pieces.concat();
            let lines = evaluate(&line);
            prop_assert_eq!(lines.len(), usize::from(!line.is_empty()));
        }

        #[test]
        fn one_line_per_segment(segments in prop::collection::vec("[a-z0-9 +*=_]{0,8}", 1..12)) {
            let body = segments.join("\n");
            let lines = evaluate(&body);
            let expected = if body.is_empty() { 0 } else { segments.len() };
            prop_assert_eq!(lines.len(), expected);
            for (line, segment) in lines.iter().zip(&segments) {
                prop_assert_eq!(&line.input, segment);
            }
        }

        #[test]
        fn evaluation_is_idempotent(segments in prop::collection::vec("[a-c0-9 +*=]{0,6}", 0..8)) {
            let body = segments.join("\r\n");
            let mut evaluator = LineEvaluator::new(Environment::new());
            let first = results(&evaluator.evaluate(&body, None));
            let second = results(&evaluator.evaluate(&body, None));
            prop_assert_eq!(first, second);
        }
    }
}
