//! Organization and beneficiary documents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core_types::{AccountId, BeneficiaryId, OrgId};

/// Compliance (KYC) status of an organization.
///
/// Document intake itself is an external collaborator; the engine only
/// gates outbound movement on the resulting status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Pending => "PENDING",
            ComplianceStatus::Verified => "VERIFIED",
            ComplianceStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComplianceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ComplianceStatus::Pending),
            "VERIFIED" => Ok(ComplianceStatus::Verified),
            "REJECTED" => Ok(ComplianceStatus::Rejected),
            _ => Err(format!("Invalid compliance status: {}", s)),
        }
    }
}

/// Organization document. One ledger account per organization, opened at
/// creation and never deleted while the organization exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub org_id: OrgId,
    pub account_id: AccountId,
    pub name: String,
    /// Public routing handle used by internal transfers.
    pub account_number: String,
    pub compliance: ComplianceStatus,
    /// Identifier at the external payout provider, if registered there.
    pub provider_org_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Beneficiary document.
///
/// Account details are payment-routing data and immutable after creation;
/// only the display name may change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
    pub beneficiary_id: BeneficiaryId,
    pub org_id: OrgId,
    pub name: String,
    pub email: Option<String>,
    pub currency: String,
    /// Opaque account-detail payload, stored verbatim.
    pub account_details: String,
    /// Identifier at the external payout provider.
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_status_roundtrip() {
        for status in [
            ComplianceStatus::Pending,
            ComplianceStatus::Verified,
            ComplianceStatus::Rejected,
        ] {
            let parsed: ComplianceStatus = status.as_str().parse().unwrap();
            assert_eq!(status, parsed);
        }
        assert!("VERYFIED".parse::<ComplianceStatus>().is_err());
    }
}
