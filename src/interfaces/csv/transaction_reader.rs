use crate::domain::transaction::TransactionDraft;
use crate::error::{PayStreamError, Result};
use std::io::Read;

/// Reads transaction drafts from a CSV source.
///
/// Expects the header
/// `accountName,accountNumber,bankBranchCode,currency,amount,exchangeRate`.
/// Whitespace is trimmed and short records are accepted, so a row may omit
/// its trailing `exchangeRate`.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes one draft per row. A malformed row yields an error
    /// and the iterator moves on to the next one.
    pub fn drafts(self) -> impl Iterator<Item = Result<TransactionDraft>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PayStreamError::from))
    }
}
