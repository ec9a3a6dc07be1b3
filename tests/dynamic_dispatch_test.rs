use chrono::Utc;
use pay_stream::domain::audit::{AuditAction, AuditLog, EntityType};
use pay_stream::domain::bank::{Bank, BankDraft};
use pay_stream::domain::ports::{AuditLogStoreBox, BankStoreBox, TransactionStoreBox};
use pay_stream::domain::security::TenantId;
use pay_stream::domain::transaction::{Transaction, TransactionDraft};
use pay_stream::infrastructure::in_memory::{
    InMemoryAuditLogStore, InMemoryBankStore, InMemoryTransactionStore,
};
use rust_decimal_macros::dec;

fn bank(tenant: &TenantId) -> Bank {
    Bank::from_draft(
        tenant.clone(),
        &BankDraft {
            name: "First".to_string(),
            branch_code: "FB001".to_string(),
            address: None,
            contact_phone: None,
            contact_email: None,
            active: true,
        },
    )
}

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let tenant = TenantId::new("acme").unwrap();
    let bank_store: BankStoreBox = Box::new(InMemoryBankStore::new());
    let transaction_store: TransactionStoreBox = Box::new(InMemoryTransactionStore::new());
    let audit_store: AuditLogStoreBox = Box::new(InMemoryAuditLogStore::new());

    let draft = TransactionDraft {
        account_name: "Jane".to_string(),
        account_number: "1".to_string(),
        bank_branch_code: "FB001".to_string(),
        currency: "USD".to_string(),
        amount: Some(dec!(100.0)),
        exchange_rate: None,
    };
    let tx = Transaction::from_draft(&draft, bank(&tenant), "maker", Utc::now()).unwrap();
    let log = AuditLog {
        id: 0,
        tenant_id: tenant.clone(),
        entity_type: EntityType::Bank,
        entity_id: Some(1),
        action: AuditAction::Create,
        user_id: Some("admin".to_string()),
        timestamp: Utc::now(),
        details: None,
    };

    // Verify Send + Sync by spawning tasks
    let t = tenant.clone();
    let b = bank(&tenant);
    let bank_handle = tokio::spawn(async move {
        let saved = bank_store.insert(b).await.unwrap();
        bank_store.get(&t, saved.id).await.unwrap().unwrap()
    });

    let t = tenant.clone();
    let tx_handle = tokio::spawn(async move {
        let saved = transaction_store.insert(tx).await.unwrap();
        transaction_store.get(&t, saved.id).await.unwrap().unwrap()
    });

    let t = tenant.clone();
    let audit_handle = tokio::spawn(async move {
        audit_store.append(log).await.unwrap();
        audit_store.list(&t).await.unwrap()
    });

    assert_eq!(bank_handle.await.unwrap().id, 1);
    assert_eq!(tx_handle.await.unwrap().id, 1);
    assert_eq!(audit_handle.await.unwrap().len(), 1);
}
