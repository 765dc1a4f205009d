//! Client SDK for the Hunan real-name construction worker management
//! platform.
//!
//! # Overview
//! Builds one `HttpRequest` value per platform operation, dispatches it over
//! a blocking [`transport::Transport`], and normalizes the double-JSON
//! response envelope (the envelope's `data` member arrives as a serialized
//! JSON string and is decoded in place). Certificate numbers are
//! AES-encrypted on the wire; [`crypto::FieldCipher`] handles that as an
//! explicit, caller-driven step.
//!
//! # Design
//! - [`client::Client`] is stateless — it holds only the base URL and the
//!   `applyId` credential, so instances are safe to share across threads.
//! - Each operation is split into `build_*` (produces an immutable pending
//!   request) and `send`/`parse_response` (dispatch + envelope decode), so
//!   the I/O boundary is explicit and every payload shape is testable
//!   without a live endpoint.
//! - Pagination values serialize as decimal strings and single-record
//!   uploads ride in one-element lists; both are quirks the remote API
//!   requires.
//! - No retries, no local recovery: every failure propagates to the caller.

pub mod client;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::Client;
pub use crypto::FieldCipher;
pub use error::{ApiError, CipherError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Attachment, AttendanceQuery, AttendanceRecord, CertificateType, CompanyQuery, ConfirmStatus,
    ContractPeriodType, ContractQuery, Direction, EntryExitQuery, EntryExitRecord, GroupQuery,
    NewContract, ProjectQuery, WorkerQuery, WorkerRoster,
};
