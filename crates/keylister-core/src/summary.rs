use std::collections::HashMap;

use serde::Serialize;

use crate::orchestrator::Inventory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub account_id: String,
    pub role_name: String,
    pub users: usize,
    pub users_with_keys: usize,
    pub access_keys: usize,
}

/// Per-account counts for the end-of-run printout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub accounts: Vec<AccountSummary>,
    pub total_users: usize,
    pub users_with_keys: usize,
    pub access_keys: usize,
}

impl RunSummary {
    /// One line per distinct account id, in first-seen input order. An
    /// account listed under several roles is merged into one line whose
    /// role column names every role, so the lines always add up to the totals.
    pub fn from_inventory(inventory: &Inventory) -> Self {
        let mut accounts: Vec<AccountSummary> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for a in &inventory.accounts {
            match index.get(a.account_id.as_str()) {
                Some(&i) => {
                    let line = &mut accounts[i];
                    line.users += a.users;
                    if !line.role_name.split(',').any(|r| r == a.role_name) {
                        line.role_name.push(',');
                        line.role_name.push_str(&a.role_name);
                    }
                }
                None => {
                    index.insert(a.account_id.as_str(), accounts.len());
                    accounts.push(AccountSummary {
                        account_id: a.account_id.clone(),
                        role_name: a.role_name.clone(),
                        users: a.users,
                        users_with_keys: 0,
                        access_keys: 0,
                    });
                }
            }
        }

        for row in inventory.report.rows() {
            if let Some(&i) = index.get(row.account_id.as_str()) {
                accounts[i].users_with_keys += 1;
                accounts[i].access_keys += row.keys.len();
            }
        }

        Self {
            total_users: accounts.iter().map(|a| a.users).sum(),
            users_with_keys: inventory.report.len(),
            access_keys: inventory.report.key_count(),
            accounts,
        }
    }
}
