use crate::domain::bank_account::BankAccount;
use crate::error::{Result, SellError};
use std::io::Read;

/// Reads bank accounts from a CSV source.
///
/// Expected header: `id,iban,label,preferred_currency`. Whitespace is trimmed
/// and empty optional columns become `None`.
pub struct BankAccountReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> BankAccountReader<R> {
    /// Creates a new `BankAccountReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes bank accounts.
    pub fn bank_accounts(self) -> impl Iterator<Item = Result<BankAccount>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(SellError::from))
    }
}
