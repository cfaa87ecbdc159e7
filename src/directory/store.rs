//! In-process document store for organizations and beneficiaries.
//!
//! Single-document updates only; cross-document invariants (balances,
//! payout records) live in their own stores.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use super::models::{Beneficiary, ComplianceStatus, Organization};
use crate::core_types::{AccountId, BeneficiaryId, OrgId};

pub struct DirectoryStore {
    orgs: DashMap<OrgId, Organization>,
    /// account_number -> org_id index (internal transfer routing)
    by_account_number: DashMap<String, OrgId>,
    /// account_id -> org_id index (reconciler reversal path)
    by_account: DashMap<AccountId, OrgId>,
    beneficiaries: DashMap<BeneficiaryId, Beneficiary>,
    next_org_id: AtomicU64,
    next_beneficiary_id: AtomicU64,
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self {
            orgs: DashMap::new(),
            by_account_number: DashMap::new(),
            by_account: DashMap::new(),
            beneficiaries: DashMap::new(),
            next_org_id: AtomicU64::new(1),
            next_beneficiary_id: AtomicU64::new(1),
        }
    }
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an organization. The ledger account id equals the org id;
    /// the caller is responsible for opening the ledger account.
    ///
    /// Returns `None` if the account number is already taken.
    pub fn create_organization(
        &self,
        name: &str,
        account_number: &str,
        compliance: ComplianceStatus,
    ) -> Option<Organization> {
        let org_id = self.next_org_id.fetch_add(1, Ordering::Relaxed);

        // Claim the routing handle first; losing this race means the number
        // is in use.
        if self
            .by_account_number
            .insert(account_number.to_string(), org_id)
            .is_some()
        {
            return None;
        }

        let org = Organization {
            org_id,
            account_id: org_id,
            name: name.to_string(),
            account_number: account_number.to_string(),
            compliance,
            provider_org_id: None,
            created_at: Utc::now(),
        };
        self.by_account.insert(org.account_id, org_id);
        self.orgs.insert(org_id, org.clone());
        Some(org)
    }

    pub fn get_org(&self, org_id: OrgId) -> Option<Organization> {
        self.orgs.get(&org_id).map(|o| o.clone())
    }

    pub fn get_org_by_account(&self, account_id: AccountId) -> Option<Organization> {
        let org_id = *self.by_account.get(&account_id)?;
        self.get_org(org_id)
    }

    /// Resolve a public account number to its organization.
    pub fn resolve_account_number(&self, account_number: &str) -> Option<Organization> {
        let org_id = *self.by_account_number.get(account_number)?;
        self.get_org(org_id)
    }

    pub fn set_compliance(&self, org_id: OrgId, status: ComplianceStatus) -> bool {
        match self.orgs.get_mut(&org_id) {
            Some(mut org) => {
                org.compliance = status;
                true
            }
            None => false,
        }
    }

    /// Persist a beneficiary already registered with the provider.
    pub fn insert_beneficiary(
        &self,
        org_id: OrgId,
        name: &str,
        email: Option<&str>,
        currency: &str,
        account_details: &str,
        provider_id: Option<String>,
    ) -> Beneficiary {
        let beneficiary_id = self.next_beneficiary_id.fetch_add(1, Ordering::Relaxed);
        let beneficiary = Beneficiary {
            beneficiary_id,
            org_id,
            name: name.to_string(),
            email: email.map(str::to_string),
            currency: currency.to_string(),
            account_details: account_details.to_string(),
            provider_id,
            created_at: Utc::now(),
        };
        self.beneficiaries
            .insert(beneficiary_id, beneficiary.clone());
        beneficiary
    }

    pub fn get_beneficiary(&self, beneficiary_id: BeneficiaryId) -> Option<Beneficiary> {
        self.beneficiaries.get(&beneficiary_id).map(|b| b.clone())
    }

    /// Beneficiaries of one organization, newest first.
    pub fn list_beneficiaries(&self, org_id: OrgId) -> Vec<Beneficiary> {
        let mut list: Vec<Beneficiary> = self
            .beneficiaries
            .iter()
            .filter(|b| b.org_id == org_id)
            .map(|b| b.clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    /// Rename a beneficiary. Account details are immutable post-creation,
    /// so the display name is the only mutable field.
    pub fn rename_beneficiary(
        &self,
        org_id: OrgId,
        beneficiary_id: BeneficiaryId,
        name: &str,
    ) -> Option<Beneficiary> {
        let mut beneficiary = self.beneficiaries.get_mut(&beneficiary_id)?;
        if beneficiary.org_id != org_id {
            return None;
        }
        beneficiary.name = name.to_string();
        Some(beneficiary.clone())
    }
}
