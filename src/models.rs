use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_THRESHOLD: &str = "3 of 4 (Parent Required)";

/// Labels reported in every pool summary, independent of the loaded vaults.
pub const SIGNER_ROLES: [&str; 4] = [
    "Parent/Guardian (required)",
    "School Representative",
    "Counselor/Staff",
    "Independent Trustee",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: String,
    pub display_name: String,
    pub grad_year: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VaultStatus {
    #[default]
    Locked,
    Unlocked,
    Other(String),
}

impl VaultStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, VaultStatus::Locked)
    }
}

impl fmt::Display for VaultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultStatus::Locked => f.write_str("Locked"),
            VaultStatus::Unlocked => f.write_str("Unlocked"),
            VaultStatus::Other(s) => f.write_str(s),
        }
    }
}

impl From<String> for VaultStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Locked" => VaultStatus::Locked,
            "Unlocked" => VaultStatus::Unlocked,
            _ => VaultStatus::Other(s),
        }
    }
}

impl From<VaultStatus> for String {
    fn from(status: VaultStatus) -> Self {
        status.to_string()
    }
}

impl Serialize for VaultStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VaultStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(VaultStatus::from)
    }
}

/// Named signer addresses of a vault. Any role may be absent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_guardian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_rep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_or_counselor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub independent_trustee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,
}

impl Signers {
    /// Placeholder signer set used until real owner lookups exist.
    pub fn mock() -> Self {
        Self {
            parent_guardian: Some("0xaaaa…1111".to_string()),
            school_rep: Some("0xbbbb…2222".to_string()),
            staff_or_counselor: Some("0xcccc…3333".to_string()),
            independent_trustee: Some("0xdddd…4444".to_string()),
            threshold: Some(DEFAULT_THRESHOLD.to_string()),
        }
    }

    pub fn threshold_or_default(&self) -> &str {
        self.threshold
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_THRESHOLD)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub student_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_address: Option<String>,
    #[serde(default)]
    pub grad_year: Option<u32>,
    #[serde(default)]
    pub pol_balance: f64,
    #[serde(default)]
    pub usd_balance: f64,
    #[serde(default)]
    pub status: VaultStatus,
    #[serde(default)]
    pub signers: Signers,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
}

impl Vault {
    /// Builds a vault record carrying the student's identity fields.
    pub fn for_student(student: &Student, pol_balance: f64, usd_balance: f64, now: DateTime<Utc>) -> Self {
        Self {
            student_id: student.student_id.clone(),
            display_name: student.display_name.clone(),
            safe_address: None,
            grad_year: Some(student.grad_year),
            pol_balance,
            usd_balance,
            status: VaultStatus::Locked,
            signers: Signers::mock(),
            last_activity: Some(now),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    #[serde(default)]
    pub total_vaults: Option<usize>,
    #[serde(default)]
    pub total_pol: f64,
    #[serde(default)]
    pub total_usd: f64,
    #[serde(default)]
    pub signers_global: Vec<String>,
    #[serde(default)]
    pub last_sync: Option<String>,
}

/// Response of the per-address lookup. Only the address is known today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultDetail {
    pub safe_address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
