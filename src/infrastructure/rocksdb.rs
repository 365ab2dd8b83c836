use crate::domain::bank_account::{BankAccount, BankAccountUpdate};
use crate::domain::ports::BankAccountService;
use crate::error::{Result, SellError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing bank accounts.
pub const CF_BANK_ACCOUNTS: &str = "bank_accounts";

/// A persistent bank account store backed by RocksDB.
///
/// Accounts are stored as JSON under their big-endian id, so iteration order
/// matches id order. Preferred currencies written by a submission survive
/// restarts.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbBankAccountStore {
    db: Arc<DB>,
}

fn internal(message: String) -> SellError {
    SellError::InternalError(Box::new(std::io::Error::other(message)))
}

impl RocksDbBankAccountStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_BANK_ACCOUNTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts])?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Stores the accounts that are not yet in the database. Existing
    /// entries keep their persisted preferences.
    pub async fn seed(&self, accounts: impl IntoIterator<Item = BankAccount>) -> Result<()> {
        for account in accounts {
            if self.get(account.id)?.is_none() {
                self.put(&account)?;
            }
        }
        Ok(())
    }

    fn get(&self, id: u64) -> Result<Option<BankAccount>> {
        let cf = self
            .db
            .cf_handle(CF_BANK_ACCOUNTS)
            .ok_or_else(|| internal("Bank accounts column family not found".into()))?;

        match self.db.get_cf(&cf, id.to_be_bytes())? {
            Some(bytes) => {
                let account = serde_json::from_slice(&bytes)
                    .map_err(|e| internal(format!("Deserialization error: {}", e)))?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    fn put(&self, account: &BankAccount) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_BANK_ACCOUNTS)
            .ok_or_else(|| internal("Bank accounts column family not found".into()))?;

        let value = serde_json::to_vec(account)
            .map_err(|e| internal(format!("Serialization error: {}", e)))?;
        self.db.put_cf(&cf, account.id.to_be_bytes(), value)?;
        Ok(())
    }
}

#[async_trait]
impl BankAccountService for RocksDbBankAccountStore {
    async fn list_bank_accounts(&self) -> Result<Vec<BankAccount>> {
        let cf = self
            .db
            .cf_handle(CF_BANK_ACCOUNTS)
            .ok_or_else(|| internal("Bank accounts column family not found".into()))?;

        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) =
                item.map_err(|e| internal(format!("RocksDB iteration error: {}", e)))?;
            let account: BankAccount = serde_json::from_slice(&value)
                .map_err(|e| internal(format!("Failed to deserialize bank account: {}", e)))?;
            accounts.push(account);
        }
        Ok(accounts)
    }

    async fn update_bank_account(&self, id: u64, update: BankAccountUpdate) -> Result<BankAccount> {
        let mut account = self
            .get(id)?
            .ok_or_else(|| SellError::NotFound(format!("bank account {}", id)))?;
        account.apply(&update);
        self.put(&account)?;
        Ok(account)
    }
}
