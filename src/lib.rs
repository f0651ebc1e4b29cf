//! Client-side controller for a CSV-backed arithmetic question store.

mod command;
mod config;
mod dispatch;
mod grammar;
mod request;
mod response;
mod transport;

pub use command::{Command, Operation};
pub use config::{BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL};
pub use dispatch::{Dispatcher, Outcome, RequestSlots, Ticket};
pub use grammar::{
    BLACKLIST, Form, FullQuestion, GrammarError, Operator, PartialQuestion, formatted_full,
    formatted_partial, parse_answer, parse_full, parse_partial, sanitize,
};
pub use request::{
    ATTR_ANSWER, ATTR_QUESTION, Attribute, Body, EditPayload, Endpoint, FilterOp, FilterPayload,
    Method, Payload, Rejection, Request, SortOrder, SortPayload, build_request,
};
pub use response::{
    FAILURE_SENTINEL, FILLER, RenderMode, ResultRow, SUCCESS_TOKEN, align, read_rows,
    render_table,
};
pub use transport::{HttpTransport, Response, Transport, TransportError, validate_base_url};

use anyhow::Result;

/// Open a dispatcher that talks HTTP to the store named in `config`.
pub fn connect(config: &ClientConfig) -> Result<Dispatcher<HttpTransport>> {
    let transport = HttpTransport::new(&config.base_url)?;
    Ok(Dispatcher::new(transport))
}
