//! SIM registration records and the cloud API payloads.

use serde::Deserialize;

/// One row of the SIM list: the card to register and its passcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimRecord {
    /// Integrated Circuit Card Identifier printed on the SIM.
    pub iccid: String,
    /// Passcode delivered with the SIM.
    pub passcode: String,
}

impl SimRecord {
    /// Create a record from an ICCID and passcode.
    pub fn new(iccid: impl Into<String>, passcode: impl Into<String>) -> SimRecord {
        SimRecord {
            iccid: iccid.into(),
            passcode: passcode.into(),
        }
    }
}

/// A SIM attached to a mobile gateway, as listed by the gateway.
#[derive(Deserialize, Debug, Default)]
pub struct GatewaySim {
    #[serde(default)]
    pub iccid: Option<String>,
    /// Assigned address, empty or missing when none is set.
    #[serde(default)]
    pub ip: Option<String>,
}

/// Response of the mobile gateway SIM listing.
#[derive(Deserialize, Debug, Default)]
pub struct SimListResponse {
    #[serde(default)]
    pub sim: Vec<GatewaySim>,
    #[serde(default)]
    pub is_ok: bool,
    /// Total number of SIMs on the gateway.
    #[serde(rename = "Total", default)]
    pub total: usize,
    #[serde(rename = "From", default)]
    pub from: usize,
    /// Number of SIMs in this page.
    #[serde(rename = "Count", default)]
    pub count: usize,
}

#[derive(Deserialize, Debug)]
pub struct CommonServiceItem {
    #[serde(rename = "ID")]
    pub id: String,
}

/// Response of the SIM creation call.
#[derive(Deserialize, Debug)]
pub struct SimCreateResponse {
    #[serde(rename = "CommonServiceItem")]
    pub common_service_item: CommonServiceItem,
    #[serde(rename = "Success", default)]
    pub success: bool,
    #[serde(default)]
    pub is_ok: bool,
}

/// Acknowledgement returned by the attach and IP assignment calls.
#[derive(Deserialize, Debug, Default)]
pub struct IsOkResponse {
    #[serde(default)]
    pub is_ok: bool,
}

/// Error payload returned with non-success statuses.
#[derive(Deserialize, Debug, Default)]
pub struct FatalResponse {
    #[serde(default)]
    pub is_fatal: bool,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub error_msg: String,
}
