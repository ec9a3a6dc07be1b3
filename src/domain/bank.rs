use super::security::TenantId;
use super::validation::{Validate, Violations};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A bank branch that transactions can be routed to.
///
/// Branch codes are unique within a tenant; the same code may exist under
/// another tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub id: u64,
    pub tenant_id: TenantId,
    pub name: String,
    pub branch_code: String,
    pub address: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub active: bool,
}

impl Bank {
    /// Builds an unsaved bank from a validated draft. The store assigns the id.
    pub fn from_draft(tenant_id: TenantId, draft: &BankDraft) -> Self {
        let mut bank = Self {
            id: 0,
            tenant_id,
            name: String::new(),
            branch_code: String::new(),
            address: None,
            contact_phone: None,
            contact_email: None,
            active: true,
        };
        bank.apply(draft);
        bank
    }

    /// Overwrites every mutable field with the draft's values.
    pub fn apply(&mut self, draft: &BankDraft) {
        self.name = draft.name.clone();
        self.branch_code = draft.branch_code.clone();
        self.address = draft.address.clone();
        self.contact_phone = draft.contact_phone.clone();
        self.contact_email = draft.contact_email.clone();
        self.active = draft.active;
    }
}

fn default_active() -> bool {
    true
}

/// Request payload for creating or replacing a bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub branch_code: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl BankDraft {
    /// A draft that keeps everything about `bank` except its active flag.
    pub fn toggled(bank: &Bank) -> Self {
        Self {
            name: bank.name.clone(),
            branch_code: bank.branch_code.clone(),
            address: bank.address.clone(),
            contact_phone: bank.contact_phone.clone(),
            contact_email: bank.contact_email.clone(),
            active: !bank.active,
        }
    }
}

impl Validate for BankDraft {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.not_blank("name", &self.name, "Bank name is required")
            .not_blank("branchCode", &self.branch_code, "Branch code is required")
            .length_between(
                "branchCode",
                &self.branch_code,
                3,
                20,
                "Branch code must be between 3 and 20 characters",
            );
        v.into_result()
    }
}
