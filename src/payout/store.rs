//! Payout Record Store
//!
//! Records keyed by internal id with a secondary index on the external
//! provider id. Status changes go through a conditional update so that
//! concurrent reconciler deliveries serialize per record.

use dashmap::DashMap;

use super::record::PayoutRecord;
use super::status::PayoutStatus;
use crate::core_types::{AccountId, PayoutId};

#[derive(Default)]
pub struct PayoutStore {
    records: DashMap<PayoutId, PayoutRecord>,
    /// external provider id -> internal id
    by_external_id: DashMap<String, PayoutId>,
}

impl PayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: PayoutRecord) -> PayoutId {
        let payout_id = record.payout_id;
        if let Some(external_id) = record.external_id() {
            self.by_external_id
                .insert(external_id.to_string(), payout_id);
        }
        self.records.insert(payout_id, record);
        payout_id
    }

    pub fn get(&self, payout_id: PayoutId) -> Option<PayoutRecord> {
        self.records.get(&payout_id).map(|r| r.clone())
    }

    pub fn get_by_external_id(&self, external_id: &str) -> Option<PayoutRecord> {
        let payout_id = *self.by_external_id.get(external_id)?;
        self.get(payout_id)
    }

    /// Conditionally advance a record's status: applies only if the stored
    /// status still equals `expected`. Returns whether the update landed.
    pub fn update_status_if(
        &self,
        payout_id: PayoutId,
        expected: PayoutStatus,
        next: PayoutStatus,
    ) -> bool {
        match self.records.get_mut(&payout_id) {
            Some(mut record) => {
                if record.status != expected {
                    return false;
                }
                record.status = next;
                record.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        }
    }

    /// All records touching an account, newest first.
    pub fn list_for_account(&self, account_id: AccountId) -> Vec<PayoutRecord> {
        let mut list: Vec<PayoutRecord> = self
            .records
            .iter()
            .filter(|r| r.involves_account(account_id))
            .map(|r| r.clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payout::record::PayoutKind;

    fn external_record(external_id: &str) -> PayoutRecord {
        PayoutRecord::new(
            PayoutKind::External {
                organization: 1,
                beneficiary: 7,
                external_id: external_id.to_string(),
            },
            100,
            "USD",
            PayoutStatus::Pending,
            None,
        )
    }

    #[test]
    fn test_external_index() {
        let store = PayoutStore::new();
        let id = store.insert(external_record("ord_x"));

        let found = store.get_by_external_id("ord_x").unwrap();
        assert_eq!(found.payout_id, id);
        assert!(store.get_by_external_id("ord_y").is_none());
    }

    #[test]
    fn test_update_status_if() {
        let store = PayoutStore::new();
        let id = store.insert(external_record("ord_x"));

        assert!(store.update_status_if(id, PayoutStatus::Pending, PayoutStatus::Processing));
        // Expected no longer matches
        assert!(!store.update_status_if(id, PayoutStatus::Pending, PayoutStatus::Completed));
        assert_eq!(store.get(id).unwrap().status, PayoutStatus::Processing);
    }

    #[test]
    fn test_list_for_account_newest_first() {
        let store = PayoutStore::new();
        store.insert(PayoutRecord::new(
            PayoutKind::Internal {
                sender: 1,
                receiver: 2,
            },
            10,
            "USD",
            PayoutStatus::Completed,
            None,
        ));
        store.insert(external_record("ord_x")); // organization/account 1
        store.insert(PayoutRecord::new(
            PayoutKind::Deposit { account: 3 },
            10,
            "USD",
            PayoutStatus::Completed,
            None,
        ));

        let for_one = store.list_for_account(1);
        assert_eq!(for_one.len(), 2);
        assert!(for_one[0].created_at >= for_one[1].created_at);
        assert_eq!(store.list_for_account(3).len(), 1);
        assert!(store.list_for_account(9).is_empty());
    }
}
