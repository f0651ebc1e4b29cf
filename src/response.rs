use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use tracing::warn;

/// Body the store returns when a mutation went through.
pub const SUCCESS_TOKEN: &str = "Success!";
/// Question text of the single row the store returns when a filter fails.
pub const FAILURE_SENTINEL: &str = "Failure!";
/// Padding character used by [`align`].
pub const FILLER: char = '\u{00A0}';

const TABLE_HEADING: &str = "Question = Answer | Distractors";
const EMPTY_RESULT: &str = "None";

/// One question as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub distractors: String,
}

impl ResultRow {
    pub fn new<Q, A, D>(question: Q, answer: A, distractors: D) -> Self
    where
        Q: Into<String>,
        A: Into<String>,
        D: Into<String>,
    {
        Self {
            question: question.into(),
            answer: answer.into(),
            distractors: distractors.into(),
        }
    }
}

/// How rendered output is marked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Newline-separated lines, padding kept as U+00A0.
    #[default]
    Text,
    /// `<br/>`-separated lines with `&nbsp;` padding, as served to a page.
    Html,
}

impl RenderMode {
    fn line_break(self) -> &'static str {
        match self {
            RenderMode::Text => "\n",
            RenderMode::Html => "<br/>",
        }
    }

    fn escape_filler(self, text: &str) -> String {
        match self {
            RenderMode::Text => text.to_string(),
            RenderMode::Html => text.replace(FILLER, "&nbsp;"),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Text => write!(f, "text"),
            RenderMode::Html => write!(f, "html"),
        }
    }
}

/// Decode a filter/view response body.
///
/// An undecodable body and the `Failure!` sentinel both read as "no rows".
pub fn read_rows(body: &str) -> Vec<ResultRow> {
    let rows: Vec<ResultRow> = match serde_json::from_str(body) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(error = %err, "store returned an unreadable row listing");
            return Vec::new();
        }
    };
    match rows.first() {
        Some(first) if first.question == FAILURE_SENTINEL => Vec::new(),
        _ => rows,
    }
}

/// Pad question and answer fields so that every row shares the same widths.
pub fn align(mut rows: Vec<ResultRow>) -> Vec<ResultRow> {
    let question_width = rows
        .iter()
        .map(|r| r.question.chars().count())
        .max()
        .unwrap_or(0);
    let answer_width = rows
        .iter()
        .map(|r| r.answer.chars().count())
        .max()
        .unwrap_or(0);
    for row in &mut rows {
        pad_to(&mut row.question, question_width);
        pad_to(&mut row.answer, answer_width);
    }
    rows
}

fn pad_to(field: &mut String, width: usize) {
    let len = field.chars().count();
    field.extend(std::iter::repeat_n(FILLER, width.saturating_sub(len)));
}

/// Render rows as `Question = Answer | Distractors` lines, or `None` when empty.
pub fn render_table(rows: &[ResultRow], mode: RenderMode) -> String {
    let br = mode.line_break();
    if rows.is_empty() {
        return EMPTY_RESULT.to_string();
    }
    let mut out = String::new();
    out.push_str(TABLE_HEADING);
    for row in rows {
        out.push_str(br);
        write!(
            &mut out,
            "{} = {} | {}",
            row.question.replacen('?', "", 1),
            row.answer,
            row.distractors
        )
        .ok();
    }
    mode.escape_filler(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<ResultRow> {
        vec![
            ResultRow::new("1754 - 3936?", "-2182", "3176, 6529, 6903"),
            ResultRow::new("2 + 2?", "4", "3 5"),
        ]
    }

    #[test]
    fn align_empty_is_empty() {
        assert!(align(Vec::new()).is_empty());
    }

    #[test]
    fn align_pads_to_column_maxima() {
        let aligned = align(sample());
        assert_eq!(aligned.len(), 2);
        for row in &aligned {
            assert_eq!(row.question.chars().count(), 12);
            assert_eq!(row.answer.chars().count(), 5);
        }
        assert_eq!(aligned[0].question, "1754 - 3936?");
        assert_eq!(aligned[1].question, format!("2 + 2?{}", FILLER.to_string().repeat(6)));
        assert_eq!(aligned[1].answer, format!("4{}", FILLER.to_string().repeat(4)));
        assert_eq!(aligned[1].distractors, "3 5");
    }

    #[test]
    fn failure_sentinel_reads_as_empty() {
        assert!(read_rows(r#"[{"question": "Failure!"}]"#).is_empty());
        assert!(read_rows("[]").is_empty());
        assert!(read_rows("<html>oops</html>").is_empty());
    }

    #[test]
    fn rows_decode_in_order() {
        let rows = read_rows(
            r#"[{"question":"2 + 2?","answer":"4","distractors":"3 5"},
                {"question":"1 * 1?","answer":"1","distractors":""}]"#,
        );
        assert_eq!(
            rows,
            vec![
                ResultRow::new("2 + 2?", "4", "3 5"),
                ResultRow::new("1 * 1?", "1", ""),
            ]
        );
    }

    #[test]
    fn table_strips_question_mark() {
        let rows = vec![ResultRow::new("2 + 2?", "4", "3 5")];
        assert_eq!(
            render_table(&rows, RenderMode::Text),
            "Question = Answer | Distractors\n2 + 2 = 4 | 3 5"
        );
    }

    #[test]
    fn html_table_escapes_filler() {
        let rows = align(vec![
            ResultRow::new("10 + 10?", "20", "1"),
            ResultRow::new("2 + 2?", "4", "3"),
        ]);
        assert_eq!(
            render_table(&rows, RenderMode::Html),
            "Question = Answer | Distractors<br/>10 + 10 = 20 | 1<br/>2 + 2&nbsp;&nbsp; = 4&nbsp; | 3"
        );
    }

    #[test]
    fn empty_table_is_none() {
        assert_eq!(render_table(&[], RenderMode::Html), "None");
    }
}
