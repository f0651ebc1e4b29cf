//! Executes [`Command`] snapshots against a [`Transport`] and reduces the
//! store's reply to something the user can read.

use crate::command::{Command, Operation};
use crate::request::{Rejection, Request, build_request};
use crate::response::{RenderMode, ResultRow, SUCCESS_TOKEN, align, read_rows, render_table};
use crate::transport::{Response, Transport, TransportError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

const FILTER_HEADING: &str = "Filter Result(s):";

/// Identifies one execution of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub operation: Operation,
    pub issued_at: DateTime<Utc>,
}

/// One in-flight slot per operation. A newer ticket supersedes an older one
/// for the same operation; different operations never interfere.
#[derive(Debug, Default)]
pub struct RequestSlots {
    next_id: AtomicU64,
    latest: Mutex<HashMap<Operation, u64>>,
}

impl RequestSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `operation`.
    pub fn issue(&self, operation: Operation) -> Ticket {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation, id);
        Ticket {
            id,
            operation,
            issued_at: Utc::now(),
        }
    }

    /// Release `ticket`. Returns `false` when a newer ticket took its slot.
    pub fn settle(&self, ticket: &Ticket) -> bool {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        match latest.get(&ticket.operation) {
            Some(&id) if id == ticket.id => {
                latest.remove(&ticket.operation);
                true
            }
            _ => false,
        }
    }

    /// Whether any ticket is outstanding for `operation`.
    pub fn is_pending(&self, operation: Operation) -> bool {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&operation)
    }
}

/// What a command execution produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Status line for create, delete, edit and sort.
    Message(String),
    /// Aligned rows from filter or view.
    Rows {
        heading: Option<&'static str>,
        rows: Vec<ResultRow>,
    },
    /// Failed a precondition; nothing was sent.
    Rejected(Rejection),
    /// A newer execution of the same operation finished first or is still running.
    Superseded(Ticket),
}

impl Outcome {
    /// Display text, or `None` when the outcome should not replace what is shown.
    pub fn render(&self, mode: RenderMode) -> Option<String> {
        match self {
            Outcome::Message(text) => Some(text.clone()),
            Outcome::Rejected(rejection) => Some(rejection.to_string()),
            Outcome::Rows { heading, rows } => {
                let table = render_table(rows, mode);
                Some(match heading {
                    Some(heading) => {
                        let br = match mode {
                            RenderMode::Text => "\n",
                            RenderMode::Html => "<br/>",
                        };
                        format!("{heading}{br}{table}")
                    }
                    None => table,
                })
            }
            Outcome::Superseded(_) => None,
        }
    }
}

/// Builds requests, sends them and interprets the replies.
pub struct Dispatcher<T: Transport> {
    transport: T,
    slots: RequestSlots,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            slots: RequestSlots::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn slots(&self) -> &RequestSlots {
        &self.slots
    }

    /// Run `command` to completion. Precondition failures never reach the transport.
    pub fn execute(&self, command: &Command) -> Outcome {
        let request = match build_request(command) {
            Ok(request) => request,
            Err(rejection) => {
                debug!(%command, reason = %rejection, "command rejected before sending");
                return Outcome::Rejected(rejection);
            }
        };

        self.run(command.operation(), &request, |result| interpret(command, result))
    }

    /// List every stored question.
    pub fn view_all(&self) -> Outcome {
        self.run(Operation::View, &Request::view_all(), |result| Outcome::Rows {
            heading: None,
            rows: align(listed_rows(result)),
        })
    }

    /// Send `request` under a fresh ticket for `operation` and reduce the reply.
    /// Only the latest ticket for an operation gets its outcome back.
    fn run<F>(&self, operation: Operation, request: &Request, reduce: F) -> Outcome
    where
        F: FnOnce(Result<Response, TransportError>) -> Outcome,
    {
        let ticket = self.slots.issue(operation);
        debug!(ticket = ticket.id, operation = %ticket.operation, "request issued");
        let outcome = reduce(self.transport.send(request));

        let latency_ms = (Utc::now() - ticket.issued_at).num_milliseconds();
        if self.slots.settle(&ticket) {
            info!(
                ticket = ticket.id,
                operation = %ticket.operation,
                latency_ms,
                "request completed"
            );
            outcome
        } else {
            info!(
                ticket = ticket.id,
                operation = %ticket.operation,
                latency_ms,
                "request superseded by a newer one"
            );
            Outcome::Superseded(ticket)
        }
    }
}

fn interpret(command: &Command, result: Result<Response, TransportError>) -> Outcome {
    let input = command.input();
    match command.operation() {
        Operation::Create => Outcome::Message(if succeeded(result) {
            format!("{input} was successfully added.")
        } else {
            format!("{input} could not be added.")
        }),
        Operation::Delete => Outcome::Message(if succeeded(result) {
            format!("{input} was successfully deleted.")
        } else {
            format!("{input} could not be deleted.")
        }),
        Operation::Edit => {
            let target = command.option(0);
            Outcome::Message(if succeeded(result) {
                format!("{input} was successfully edited to {target}.")
            } else {
                format!("{input} could not be edited to {target}.")
            })
        }
        Operation::Sort => Outcome::Message(if succeeded(result) {
            "Entries successfully sorted.".to_string()
        } else {
            "The entries could not be sorted.".to_string()
        }),
        Operation::Filter => Outcome::Rows {
            heading: Some(FILTER_HEADING),
            rows: align(listed_rows(result)),
        },
        Operation::View | Operation::None => {
            Outcome::Rejected(Rejection::Unsupported(command.operation()))
        }
    }
}

fn succeeded(result: Result<Response, TransportError>) -> bool {
    match result {
        Ok(response) if response.is_success() => response.body.trim() == SUCCESS_TOKEN,
        Ok(response) => {
            warn!(status = response.status, "store rejected the request");
            false
        }
        Err(err) => {
            warn!(error = %err, "store unreachable");
            false
        }
    }
}

fn listed_rows(result: Result<Response, TransportError>) -> Vec<ResultRow> {
    match result {
        Ok(response) if response.is_success() => read_rows(&response.body),
        Ok(response) => {
            warn!(status = response.status, "store rejected the listing request");
            Vec::new()
        }
        Err(err) => {
            warn!(error = %err, "store unreachable");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn newer_ticket_supersedes_older_for_same_operation() {
        let slots = RequestSlots::new();
        let first = slots.issue(Operation::Filter);
        let second = slots.issue(Operation::Filter);
        assert!(second.id > first.id);
        assert!(!slots.settle(&first));
        assert!(slots.is_pending(Operation::Filter));
        assert!(slots.settle(&second));
        assert!(!slots.is_pending(Operation::Filter));
    }

    #[test]
    fn operations_have_independent_slots() {
        let slots = RequestSlots::new();
        let create = slots.issue(Operation::Create);
        let sort = slots.issue(Operation::Sort);
        assert!(slots.settle(&create));
        assert!(slots.settle(&sort));
    }

    #[test]
    fn settled_ticket_cannot_settle_twice() {
        let slots = RequestSlots::new();
        let ticket = slots.issue(Operation::View);
        assert!(slots.settle(&ticket));
        assert!(!slots.settle(&ticket));
    }

    #[test]
    fn filter_heading_precedes_none() {
        let outcome = Outcome::Rows {
            heading: Some(FILTER_HEADING),
            rows: Vec::new(),
        };
        assert_eq!(
            outcome.render(RenderMode::Html).unwrap(),
            "Filter Result(s):<br/>None"
        );
        assert_eq!(
            outcome.render(RenderMode::Text).unwrap(),
            "Filter Result(s):\nNone"
        );
    }

    #[test]
    fn superseded_renders_nothing() {
        let slots = RequestSlots::new();
        let outcome = Outcome::Superseded(slots.issue(Operation::Sort));
        assert_eq!(outcome.render(RenderMode::Text), None);
    }

    #[test]
    fn non_success_body_is_failure() {
        assert!(succeeded(Ok(Response::ok("Success!"))));
        assert!(succeeded(Ok(Response::ok("Success!\n"))));
        assert!(!succeeded(Ok(Response::ok("Failure!"))));
        assert!(!succeeded(Ok(Response {
            status: 404,
            body: "Success!".to_string(),
        })));
    }
}
