use super::routes::{AUDIT_PATH, BANKS_PATH, TRANSACTIONS_PATH};
use crate::domain::audit::{AuditLog, EntityType};
use crate::domain::bank::Bank;
use crate::domain::security::{ROLE_TRANSACTION_APPROVER, SecurityContext};
use crate::domain::transaction::{Transaction, TransactionStatus};
use serde_json::{Map, Value};

pub type Links = Map<String, Value>;

/// Builds absolute hypermedia links under a base URL.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn banks(&self) -> String {
        self.url(BANKS_PATH)
    }

    pub fn active_banks(&self) -> String {
        self.url(&format!("{}/active", BANKS_PATH))
    }

    pub fn bank(&self, id: u64) -> String {
        self.url(&format!("{}/{}", BANKS_PATH, id))
    }

    pub fn transactions(&self) -> String {
        self.url(TRANSACTIONS_PATH)
    }

    pub fn transaction(&self, id: u64) -> String {
        self.url(&format!("{}/{}", TRANSACTIONS_PATH, id))
    }

    pub fn batch(&self, batch_id: &str) -> String {
        self.url(&format!("{}/batch/{}", TRANSACTIONS_PATH, batch_id))
    }

    pub fn status(&self, status: TransactionStatus) -> String {
        self.url(&format!("{}/status/{}", TRANSACTIONS_PATH, status))
    }

    pub fn audit(&self) -> String {
        self.url(AUDIT_PATH)
    }

    pub fn bank_links(&self, bank: &Bank) -> Links {
        let this = self.bank(bank.id);
        let mut links = Links::new();
        link(&mut links, "self", &this);
        link(&mut links, "update", &this);
        link(&mut links, "delete", &this);
        link(&mut links, "toggle-status", &format!("{}/toggle-status", this));
        link(&mut links, "collection", &self.banks());
        links
    }

    pub fn bank_collection_links(&self, active_only: bool) -> Links {
        let mut links = Links::new();
        let this = if active_only {
            self.active_banks()
        } else {
            self.banks()
        };
        link(&mut links, "self", &this);
        link(&mut links, "create", &self.banks());
        link(&mut links, "active-banks", &self.active_banks());
        links
    }

    /// Links for one transaction as seen by `ctx`. Decision links appear only
    /// when the caller could actually approve it.
    pub fn transaction_links(&self, tx: &Transaction, ctx: &SecurityContext) -> Links {
        let this = self.transaction(tx.id);
        let mut links = Links::new();
        link(&mut links, "self", &this);
        link(&mut links, "collection", &self.transactions());
        if let Some(batch_id) = &tx.batch_id {
            link(&mut links, "batch", &self.batch(batch_id));
        }
        if ctx.has_role(ROLE_TRANSACTION_APPROVER) && tx.approvable_by(&ctx.user_id) {
            link(&mut links, "approve", &format!("{}/approve", this));
            link(&mut links, "reject", &format!("{}/reject", this));
        }
        links
    }

    /// Per-transaction links keyed by id, nested under `transaction-details`.
    pub fn transaction_details(&self, txs: &[Transaction], ctx: &SecurityContext) -> Value {
        let details: Links = txs
            .iter()
            .map(|tx| {
                (
                    tx.id.to_string(),
                    Value::Object(self.transaction_links(tx, ctx)),
                )
            })
            .collect();
        Value::Object(details)
    }

    pub fn batch_links(&self, batch_id: &str, txs: &[Transaction], ctx: &SecurityContext) -> Links {
        let mut links = Links::new();
        link(&mut links, "self", &self.batch(batch_id));
        link(&mut links, "transactions", &self.transactions());
        for status in [
            TransactionStatus::PendingApproval,
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
        ] {
            link(&mut links, &status_rel(status), &self.status(status));
        }
        links.insert(
            "transaction-details".to_string(),
            self.transaction_details(txs, ctx),
        );
        links
    }

    pub fn batch_decision_links(
        &self,
        batch_id: &str,
        decision: &str,
        txs: &[Transaction],
        ctx: &SecurityContext,
    ) -> Links {
        let batch = self.batch(batch_id);
        let mut links = Links::new();
        link(&mut links, "self", &format!("{}/{}", batch, decision));
        link(&mut links, "batch", &batch);
        link(&mut links, "transactions", &self.transactions());
        links.insert(
            "transaction-details".to_string(),
            self.transaction_details(txs, ctx),
        );
        links
    }

    /// Links for a status listing: itself plus every other status.
    pub fn status_links(
        &self,
        current: TransactionStatus,
        txs: &[Transaction],
        ctx: &SecurityContext,
    ) -> Links {
        let mut links = Links::new();
        link(&mut links, "self", &self.status(current));
        link(&mut links, "transactions", &self.transactions());
        for status in TransactionStatus::ALL {
            if status != current {
                link(&mut links, &status_rel(status), &self.status(status));
            }
        }
        links.insert(
            "transaction-details".to_string(),
            self.transaction_details(txs, ctx),
        );
        links
    }

    pub fn audit_log_links(&self, log: &AuditLog) -> Links {
        let mut links = Links::new();
        match (log.entity_type, log.entity_id) {
            (EntityType::Bank, Some(id)) => link(&mut links, "entity", &self.bank(id)),
            (EntityType::Transaction, Some(id)) => {
                link(&mut links, "entity", &self.transaction(id))
            }
            _ => {}
        }
        link(&mut links, "collection", &self.audit());
        links
    }

    pub fn audit_collection_links(&self) -> Links {
        let mut links = Links::new();
        link(&mut links, "self", &self.audit());
        links
    }
}

fn link(links: &mut Links, rel: &str, href: &str) {
    links.insert(rel.to_string(), Value::String(href.to_string()));
}

fn status_rel(status: TransactionStatus) -> String {
    format!("{}-transactions", status.as_str().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bank::BankDraft;
    use crate::domain::security::TenantId;
    use crate::domain::transaction::TransactionDraft;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn tx(created_by: &str) -> Transaction {
        let tenant = TenantId::new("t1").unwrap();
        let mut bank = Bank::from_draft(
            tenant,
            &BankDraft {
                name: "First".to_string(),
                branch_code: "FB001".to_string(),
                address: None,
                contact_phone: None,
                contact_email: None,
                active: true,
            },
        );
        bank.id = 4;
        let draft = TransactionDraft {
            account_name: "Jane".to_string(),
            account_number: "1".to_string(),
            bank_branch_code: "FB001".to_string(),
            currency: "EUR".to_string(),
            amount: Some(dec!(5)),
            exchange_rate: None,
        };
        let mut tx = Transaction::from_draft(&draft, bank, created_by, Utc::now()).unwrap();
        tx.id = 9;
        tx
    }

    fn approver(user: &str) -> SecurityContext {
        SecurityContext::new(TenantId::new("t1").unwrap(), user)
            .with_roles([ROLE_TRANSACTION_APPROVER])
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let links = LinkBuilder::new("http://host:1/");
        assert_eq!(links.bank(3), "http://host:1/api/v1/banks/3");
    }

    #[test]
    fn test_decision_links_follow_four_eyes() {
        let links = LinkBuilder::new("http://h");
        let tx = tx("maker");

        let checker = links.transaction_links(&tx, &approver("checker"));
        assert_eq!(checker["approve"], "http://h/api/v1/transactions/9/approve");
        assert!(checker.contains_key("reject"));

        let own = links.transaction_links(&tx, &approver("maker"));
        assert!(!own.contains_key("approve"));

        let viewer = SecurityContext::new(TenantId::new("t1").unwrap(), "viewer");
        assert!(!links.transaction_links(&tx, &viewer).contains_key("approve"));
    }

    #[test]
    fn test_status_links_skip_current() {
        let links = LinkBuilder::new("http://h");
        let map = links.status_links(TransactionStatus::Approved, &[], &approver("a"));
        assert!(!map.contains_key("approved-transactions"));
        assert_eq!(
            map["pending_approval-transactions"],
            "http://h/api/v1/transactions/status/PENDING_APPROVAL"
        );
        assert!(map.contains_key("failed-transactions"));
    }
}
