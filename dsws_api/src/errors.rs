//! Error types for the gateway.

/// Errors raised by the transport gateway.
///
/// Only conditions that make the call (or the whole session) unusable are
/// errors. Server-side outcomes such as "not permissioned" or "object not
/// present" are carried as status values on the decoded response objects in
/// `dsws_userdata` and never surface here.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No usable credentials were supplied at construction. The session was
    /// never established; recreate the client with a real username/password.
    #[error("missing or empty user credentials")]
    Credentials,

    /// The settings file or one of its values could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The service rejected the session itself (invalid credentials, or
    /// access blocked after misuse). Callers cannot proceed on this session.
    #[error("service fault {code}: {message}")]
    Fault {
        code: String,
        sub_code: Option<String>,
        message: String,
    },

    /// The service returned a non-success HTTP status with a body snippet.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },

    /// An HTTP request failed (network error, timeout, or unparseable
    /// response body).
    #[error("request failed")]
    RequestFailed,
}
