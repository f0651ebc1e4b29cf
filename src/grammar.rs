use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Characters stripped from anything typed into the input field before it is
/// stored on a [`Command`](crate::Command).
pub const BLACKLIST: &[char] = &[
    '<', '>', '[', ']', '{', '}', '(', ')', '!', '@', '#', '$', '%', '^', '&', '~', '`', '\'',
    '"', '/',
];

static PARTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?[0-9]+) ([+\-*/]) (-?[0-9]+)$").expect("Invalid partial question regex")
});

static FULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?[0-9]+) ([+\-*/]) (-?[0-9]+) = (-?[0-9]+)((?:, -?[0-9]+)*)$")
        .expect("Invalid full question regex")
});

static ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Invalid answer regex"));

/// Which grammar rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Partial,
    Full,
    Answer,
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::Partial => write!(f, "arg1 op arg2"),
            Form::Full => write!(f, "arg1 op arg2 = ans, dist1, dist2, ..., distn"),
            Form::Answer => write!(f, "ans"),
        }
    }
}

/// The ill-formed marker: input did not match the grammar it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ill-formed input '{input}' (expected '{form}')")]
pub struct GrammarError {
    pub form: Form,
    pub input: String,
}

impl GrammarError {
    fn new(form: Form, input: &str) -> Self {
        Self {
            form,
            input: input.to_string(),
        }
    }
}

/// Arithmetic operator accepted by both grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            "/" => Some(Operator::Div),
            _ => None,
        }
    }
}

/// A question without its answer, e.g. `3 + 4`.
///
/// Operands keep their literal text so that the store sees exactly what was
/// typed (leading zeros, signs, arbitrarily long digit runs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialQuestion {
    pub left: String,
    pub operator: Operator,
    pub right: String,
}

impl PartialQuestion {
    /// Wire form used by delete, edit and filter: `"<L> <op> <R>?"`.
    pub fn to_wire(&self) -> String {
        format!("{}?", self)
    }
}

impl fmt::Display for PartialQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator.symbol(), self.right)
    }
}

/// A question with its answer and zero or more distractors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullQuestion {
    pub question: PartialQuestion,
    pub answer: String,
    pub distractors: Vec<String>,
}

impl FullQuestion {
    /// Pipe-delimited store record: `"What is <L> <op> <R>?|<answer>|<d1> <d2> ..."`.
    pub fn to_wire(&self) -> String {
        format!(
            "What is {}|{}|{}",
            self.question.to_wire(),
            self.answer,
            self.distractors.join(" ")
        )
    }
}

/// Remove every [`BLACKLIST`] character from `raw`.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|ch| !BLACKLIST.contains(ch)).collect()
}

/// Recognise `<int> <op> <int>`.
pub fn parse_partial(input: &str) -> Result<PartialQuestion, GrammarError> {
    let caps = PARTIAL
        .captures(input)
        .ok_or_else(|| GrammarError::new(Form::Partial, input))?;
    let operator =
        Operator::from_symbol(&caps[2]).ok_or_else(|| GrammarError::new(Form::Partial, input))?;
    Ok(PartialQuestion {
        left: caps[1].to_string(),
        operator,
        right: caps[3].to_string(),
    })
}

/// Recognise `<int> <op> <int> = <int>(, <int>)*`.
pub fn parse_full(input: &str) -> Result<FullQuestion, GrammarError> {
    let caps = FULL
        .captures(input)
        .ok_or_else(|| GrammarError::new(Form::Full, input))?;
    let operator =
        Operator::from_symbol(&caps[2]).ok_or_else(|| GrammarError::new(Form::Full, input))?;
    let distractors = caps[5]
        .split(", ")
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect();
    Ok(FullQuestion {
        question: PartialQuestion {
            left: caps[1].to_string(),
            operator,
            right: caps[3].to_string(),
        },
        answer: caps[4].to_string(),
        distractors,
    })
}

/// Recognise an unsigned answer literal as used by answer filters.
pub fn parse_answer(input: &str) -> Result<&str, GrammarError> {
    if ANSWER.is_match(input) {
        Ok(input)
    } else {
        Err(GrammarError::new(Form::Answer, input))
    }
}

/// Canonical partial question string (`"a op b?"`) or the ill-formed marker.
pub fn formatted_partial(input: &str) -> Result<String, GrammarError> {
    parse_partial(input).map(|q| q.to_wire())
}

/// Canonical full question record or the ill-formed marker.
pub fn formatted_full(input: &str) -> Result<String, GrammarError> {
    parse_full(input).map(|q| q.to_wire())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_question_gets_question_mark() {
        assert_eq!(formatted_partial("2 + 2").unwrap(), "2 + 2?");
        assert_eq!(formatted_partial("-7 * 13").unwrap(), "-7 * 13?");
        assert_eq!(formatted_partial("10 / -5").unwrap(), "10 / -5?");
    }

    #[test]
    fn partial_question_missing_operand_is_ill_formed() {
        let err = formatted_partial("2 +").unwrap_err();
        assert_eq!(err.form, Form::Partial);
        assert_eq!(err.input, "2 +");
    }

    #[test]
    fn partial_rejects_spacing_and_trailing_answer() {
        assert!(parse_partial("2+2").is_err());
        assert!(parse_partial(" 2 + 2").is_err());
        assert!(parse_partial("2 + 2 = 4").is_err());
        assert!(parse_partial("2 % 2").is_err());
        assert!(parse_partial("").is_err());
    }

    #[test]
    fn full_question_without_distractors() {
        assert_eq!(formatted_full("2 + 2 = 4").unwrap(), "What is 2 + 2?|4|");
    }

    #[test]
    fn full_question_with_distractors_space_joined() {
        assert_eq!(
            formatted_full("2 + 2 = 4, 3, 5").unwrap(),
            "What is 2 + 2?|4|3 5"
        );
        assert_eq!(
            formatted_full("781 + 820 = 1601, 0540, 6172, 999, -835").unwrap(),
            "What is 781 + 820?|1601|0540 6172 999 -835"
        );
    }

    #[test]
    fn full_question_structure() {
        let q = parse_full("-3 - 4 = -7, 1").unwrap();
        assert_eq!(q.question.left, "-3");
        assert_eq!(q.question.operator, Operator::Sub);
        assert_eq!(q.question.right, "4");
        assert_eq!(q.answer, "-7");
        assert_eq!(q.distractors, vec!["1".to_string()]);
    }

    #[test]
    fn full_rejects_malformed_lists() {
        assert!(parse_full("2 + 2 =").is_err());
        assert!(parse_full("2 + 2 = 4,").is_err());
        assert!(parse_full("2 + 2 = 4,3").is_err());
        assert!(parse_full("2 + 2 = 4, ").is_err());
        assert_eq!(parse_full("2 + 2").unwrap_err().form, Form::Full);
    }

    #[test]
    fn answer_literal_is_unsigned_digits() {
        assert_eq!(parse_answer("4").unwrap(), "4");
        assert_eq!(parse_answer("0042").unwrap(), "0042");
        assert!(parse_answer("-4").is_err());
        assert!(parse_answer("4 ").is_err());
        assert!(parse_answer("").is_err());
    }

    #[test]
    fn sanitize_strips_blacklist() {
        assert_eq!(sanitize("<b>2 + 2</b>"), "b2 + 2b");
        assert_eq!(sanitize("{[()]}!@#$%^&~`'\"/"), "");
        assert_eq!(sanitize("2 * 3 = 6, 5"), "2 * 3 = 6, 5");
    }

    #[test]
    fn sanitize_removes_division_operator() {
        assert_eq!(sanitize("6 / 3"), "6  3");
        assert!(parse_partial(&sanitize("6 / 3")).is_err());
    }
}
