//! Translation of a [`Command`] snapshot into a store request.
//!
//! Every precondition is checked here, before anything touches the network.
//! A command that fails its grammar never produces a [`Request`]; it produces
//! a [`Rejection`] whose `Display` is the instruction shown to the user.

use crate::command::{Command, Operation};
use crate::grammar::{GrammarError, parse_answer, parse_full, parse_partial};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Filter attribute selecting the question text.
pub const ATTR_QUESTION: &str = "question";
/// Filter attribute selecting the answer value.
pub const ATTR_ANSWER: &str = "answer";

/// Comparison the store applies when filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Find,
    GreaterThan,
    LessThan,
}

impl FilterOp {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Find => "FIND",
            FilterOp::GreaterThan => "GT",
            FilterOp::LessThan => "LT",
        }
    }
}

/// Direction the store sorts entries in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "LT",
            SortOrder::Descending => "GT",
        }
    }
}

/// Column a filter or sort looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Question,
    Answer,
}

impl Attribute {
    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Question => ATTR_QUESTION,
            Attribute::Answer => ATTR_ANSWER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Store endpoints, one per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CreateQuestion,
    DeleteQuestion,
    EditQuestion,
    Filter,
    Sort,
    ViewAll,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CreateQuestion => "/api/createQ",
            Endpoint::DeleteQuestion => "/api/deleteQ",
            Endpoint::EditQuestion => "/api/editQ",
            Endpoint::Filter => "/api/filter",
            Endpoint::Sort => "/api/sort",
            Endpoint::ViewAll => "/api/viewall",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::ViewAll => Method::Get,
            _ => Method::Post,
        }
    }
}

/// Body of `POST /api/editQ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditPayload {
    pub question: String,
    #[serde(rename = "newQ")]
    pub new_q: String,
}

/// Body of `POST /api/filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterPayload {
    pub operation: String,
    pub attribute: String,
    pub value: String,
}

/// Body of `POST /api/sort`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortPayload {
    pub operation: String,
    pub attribute: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Edit(EditPayload),
    Filter(FilterPayload),
    Sort(SortPayload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    /// Sent as-is with a `text/plain` content type.
    Text(String),
    Json(Payload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub endpoint: Endpoint,
    pub body: Body,
}

impl Request {
    pub fn view_all() -> Self {
        Self {
            endpoint: Endpoint::ViewAll,
            body: Body::Empty,
        }
    }
}

/// Why a command was not sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error(
        "Please use the format 'arg1 op arg2 = ans, dist1, dist2, ..., distn' to add a question."
    )]
    Create(#[source] GrammarError),
    #[error("Please use the format 'arg1 op arg2' to delete a question.")]
    Delete(#[source] GrammarError),
    #[error(
        "Please use the format 'arg1 op arg2' to select a question to edit\nand 'arg1 op arg2 = ans, dist1, dist2, ..., distn' to change it."
    )]
    Edit(#[source] GrammarError),
    #[error("Please enter a question or an answer.")]
    Filter { attribute: String },
    #[error("Operation not Supported")]
    Unsupported(Operation),
}

/// Build the request for `command`, or say why it cannot be sent.
pub fn build_request(command: &Command) -> Result<Request, Rejection> {
    match command.operation() {
        Operation::Create => {
            let question = parse_full(command.input()).map_err(Rejection::Create)?;
            Ok(Request {
                endpoint: Endpoint::CreateQuestion,
                body: Body::Text(question.to_wire()),
            })
        }
        Operation::Delete => {
            let question = parse_partial(command.input()).map_err(Rejection::Delete)?;
            Ok(Request {
                endpoint: Endpoint::DeleteQuestion,
                body: Body::Text(question.to_wire()),
            })
        }
        Operation::Edit => {
            let question = parse_partial(command.input()).map_err(Rejection::Edit)?;
            let replacement = parse_full(command.option(0)).map_err(Rejection::Edit)?;
            Ok(Request {
                endpoint: Endpoint::EditQuestion,
                body: Body::Json(Payload::Edit(EditPayload {
                    question: question.to_wire(),
                    new_q: replacement.to_wire(),
                })),
            })
        }
        Operation::Filter => {
            let attribute = command.option(1);
            let value = filter_value(attribute, command.input()).ok_or_else(|| {
                Rejection::Filter {
                    attribute: attribute.to_string(),
                }
            })?;
            Ok(Request {
                endpoint: Endpoint::Filter,
                body: Body::Json(Payload::Filter(FilterPayload {
                    operation: command.option(0).to_string(),
                    attribute: attribute.to_string(),
                    value,
                })),
            })
        }
        Operation::Sort => Ok(Request {
            endpoint: Endpoint::Sort,
            body: Body::Json(Payload::Sort(SortPayload {
                operation: command.option(0).to_string(),
                attribute: command.option(1).to_string(),
            })),
        }),
        // VIEW is a direct action (`Request::view_all`), never a held state.
        Operation::View | Operation::None => {
            Err(Rejection::Unsupported(command.operation()))
        }
    }
}

/// The attribute decides which grammar the filter value must satisfy.
fn filter_value(attribute: &str, input: &str) -> Option<String> {
    match attribute {
        ATTR_QUESTION => parse_partial(input).ok().map(|q| q.to_wire()),
        ATTR_ANSWER => parse_answer(input).ok().map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_sends_formatted_record_as_text() {
        let cmd = Command::new(Operation::Create).with_input("2 + 2 = 4, 3, 5");
        let req = build_request(&cmd).unwrap();
        assert_eq!(req.endpoint, Endpoint::CreateQuestion);
        assert_eq!(req.body, Body::Text("What is 2 + 2?|4|3 5".to_string()));
    }

    #[test]
    fn create_rejects_partial_question() {
        let cmd = Command::new(Operation::Create).with_input("2 + 2");
        let err = build_request(&cmd).unwrap_err();
        assert!(matches!(err, Rejection::Create(_)));
        assert_eq!(
            err.to_string(),
            "Please use the format 'arg1 op arg2 = ans, dist1, dist2, ..., distn' to add a question."
        );
    }

    #[test]
    fn delete_sends_partial_question() {
        let cmd = Command::new(Operation::Delete).with_input("781 + 820");
        let req = build_request(&cmd).unwrap();
        assert_eq!(req.endpoint, Endpoint::DeleteQuestion);
        assert_eq!(req.endpoint.method(), Method::Post);
        assert_eq!(req.body, Body::Text("781 + 820?".to_string()));
    }

    #[test]
    fn edit_requires_both_grammars() {
        let ok = Command::new(Operation::Edit)
            .with_input("2 + 2")
            .with_options(["2 + 3 = 5"]);
        assert_eq!(
            build_request(&ok).unwrap().body,
            Body::Json(Payload::Edit(EditPayload {
                question: "2 + 2?".to_string(),
                new_q: "What is 2 + 3?|5|".to_string(),
            }))
        );

        let bad_target = ok.clone().with_options(["2 + 3"]);
        assert!(matches!(
            build_request(&bad_target),
            Err(Rejection::Edit(_))
        ));

        let no_target = Command::new(Operation::Edit).with_input("2 + 2");
        assert!(matches!(build_request(&no_target), Err(Rejection::Edit(_))));
    }

    #[test]
    fn filter_value_follows_attribute() {
        let by_question = Command::new(Operation::Filter)
            .with_input("6352 + 976")
            .with_options(["FIND", "question"]);
        assert_eq!(
            build_request(&by_question).unwrap().body,
            Body::Json(Payload::Filter(FilterPayload {
                operation: "FIND".to_string(),
                attribute: "question".to_string(),
                value: "6352 + 976?".to_string(),
            }))
        );

        let negative_answer = Command::new(Operation::Filter)
            .with_input("-4")
            .with_options(["GT", "answer"]);
        assert!(matches!(
            build_request(&negative_answer),
            Err(Rejection::Filter { .. })
        ));

        let unknown = Command::new(Operation::Filter)
            .with_input("4")
            .with_options(["FIND", "distractors"]);
        let err = build_request(&unknown).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a question or an answer.");
    }

    #[test]
    fn sort_is_never_rejected() {
        let cmd = Command::new(Operation::Sort).with_input("<ignored>");
        let req = build_request(&cmd).unwrap();
        assert_eq!(
            req.body,
            Body::Json(Payload::Sort(SortPayload {
                operation: String::new(),
                attribute: String::new(),
            }))
        );
    }

    #[test]
    fn view_is_a_bodyless_get() {
        let req = Request::view_all();
        assert_eq!(req.endpoint.path(), "/api/viewall");
        assert_eq!(req.endpoint.method(), Method::Get);
        assert_eq!(req.body, Body::Empty);
    }

    #[test]
    fn view_state_is_unsupported() {
        let cmd = Command::new(Operation::View).with_input("2 + 2");
        let err = build_request(&cmd).unwrap_err();
        assert_eq!(err, Rejection::Unsupported(Operation::View));
        assert_eq!(err.to_string(), "Operation not Supported");
    }

    #[test]
    fn none_is_unsupported() {
        let err = build_request(&Command::default()).unwrap_err();
        assert_eq!(err, Rejection::Unsupported(Operation::None));
        assert_eq!(err.to_string(), "Operation not Supported");
    }

    #[test]
    fn payloads_use_wire_field_names() {
        let json = serde_json::to_value(Payload::Edit(EditPayload {
            question: "2 + 2?".to_string(),
            new_q: "What is 2 + 3?|5|".to_string(),
        }))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"question": "2 + 2?", "newQ": "What is 2 + 3?|5|"})
        );
    }
}
