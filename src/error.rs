//! Error type shared by both command line tools.
//!
//! Every fatal condition gets its own variant so the binaries can report it
//! verbatim and tests can match on the kind instead of the text.

use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors raised while validating input or talking to the cloud API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required command line argument was not supplied.
    #[error("missing required argument --{0}")]
    MissingArgument(&'static str),

    /// The zone is not one of the supported deployment regions.
    #[error("invalid zone '{zone}', choose one of: {valid}")]
    InvalidZone { zone: String, valid: String },

    /// The CIDR block could not be parsed.
    #[error("invalid CIDR '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    /// The SIM list file could not be opened.
    #[error("failed to open CSV file {}: {source}", path.display())]
    CsvOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The SIM list file could not be read or is not valid CSV.
    #[error("failed to read CSV file {}: {source}", path.display())]
    CsvRead { path: PathBuf, source: csv::Error },

    /// A SIM list row does not have exactly two columns.
    #[error("line {line}: expected 2 columns (ICCID,passcode) but found {found}")]
    CsvColumns { line: u64, found: usize },

    /// The request could not be built or sent.
    #[error("{operation} request failed: {source}")]
    Http {
        operation: &'static str,
        source: reqwest::Error,
    },

    /// The API answered 401.
    #[error("{operation} failed: check the access token and access token secret")]
    Unauthorized { operation: &'static str },

    /// The API answered 404 for the mobile gateway.
    #[error("mobile gateway not found: check the mobile gateway resource id")]
    GatewayNotFound,

    /// The API answered with a structured fatal error payload.
    #[error("{serial}: ({status}){message}")]
    ApiFatal {
        serial: String,
        status: String,
        error_code: String,
        message: String,
    },

    /// The API answered with a status that carries no usable error payload.
    #[error("{operation} failed with unexpected HTTP status {status}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
    },

    /// A response body did not match the expected shape.
    #[error("{operation} response could not be parsed at '{path}': {message}")]
    Decode {
        operation: &'static str,
        path: String,
        message: String,
    },

    /// The gateway accepted the attach request but reported `is_ok: false`.
    #[error("mobile gateway refused to attach SIM {sim_id}")]
    AttachRejected { sim_id: String },

    /// The SIM accepted the address request but reported `is_ok: false`.
    #[error("assigning {ip} to SIM {sim_id} was refused")]
    IpAssignmentRejected { sim_id: String, ip: std::net::Ipv4Addr },

    /// Fewer free addresses than SIMs to register.
    #[error("{sims} SIMs to register but only {addresses} assignable IP addresses")]
    InsufficientAddresses { sims: usize, addresses: usize },
}
