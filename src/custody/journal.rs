//! Transactional wrapper over an [`AssetCustody`].
//!
//! Every pair operation routes its custody side effects through a
//! [`Journal`].  On success the journal is committed and simply dropped; on
//! failure every recorded transfer is reversed newest-first, which restores
//! all balances the operation (or a flash-swap callee) touched.

use tracing::error;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::traits::AssetCustody;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TransferRecord {
    token: Address,
    from: Address,
    to: Address,
    amount: Amount,
}

/// Records transfers made through it so they can be undone.
#[derive(Debug)]
pub struct Journal<'a, C: AssetCustody + ?Sized> {
    inner: &'a mut C,
    records: Vec<TransferRecord>,
}

impl<'a, C: AssetCustody + ?Sized> Journal<'a, C> {
    /// Starts an empty journal over `inner`.
    pub fn new(inner: &'a mut C) -> Self {
        Self {
            inner,
            records: Vec::new(),
        }
    }

    /// Number of transfers recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been transferred yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keeps every recorded transfer.
    pub fn commit(self) {}

    /// Reverses every recorded transfer, newest first.
    ///
    /// Reversal continues past a failing entry so that as much state as
    /// possible is restored.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the underlying custody.
    pub fn rollback(self) -> Result<(), AmmError> {
        let mut first_error = None;
        for record in self.records.into_iter().rev() {
            if let Err(e) =
                self.inner
                    .transfer(&record.token, &record.to, &record.from, record.amount)
            {
                error!(
                    token = %record.token,
                    from = %record.to,
                    to = %record.from,
                    amount = %record.amount,
                    error = %e,
                    "failed to reverse transfer"
                );
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl<C: AssetCustody + ?Sized> AssetCustody for Journal<'_, C> {
    fn balance_of(&self, token: &Address, owner: &Address) -> Amount {
        self.inner.balance_of(token, owner)
    }

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.inner.transfer(token, from, to, amount)?;
        self.records.push(TransferRecord {
            token: *token,
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::custody::TokenLedger;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    fn funded() -> TokenLedger {
        let mut ledger = TokenLedger::new();
        let Ok(()) = ledger.mint(&addr(1), &addr(10), Amount::new(100)) else {
            panic!("mint");
        };
        ledger
    }

    #[test]
    fn commit_keeps_transfers() {
        let mut ledger = funded();
        let mut journal = Journal::new(&mut ledger);
        let Ok(()) = journal.transfer(&addr(1), &addr(10), &addr(11), Amount::new(60)) else {
            panic!("transfer");
        };
        assert_eq!(journal.len(), 1);
        journal.commit();
        assert_eq!(ledger.balance_of(&addr(1), &addr(11)), Amount::new(60));
    }

    #[test]
    fn rollback_restores_chained_transfers() {
        let mut ledger = funded();
        let before = ledger.clone();
        let mut journal = Journal::new(&mut ledger);
        let Ok(()) = journal.transfer(&addr(1), &addr(10), &addr(11), Amount::new(60)) else {
            panic!("transfer");
        };
        // The second hop spends funds received by the first.
        let Ok(()) = journal.transfer(&addr(1), &addr(11), &addr(12), Amount::new(50)) else {
            panic!("transfer");
        };
        assert_eq!(journal.rollback(), Ok(()));
        assert_eq!(ledger, before);
    }

    #[test]
    fn failed_transfer_is_not_recorded() {
        let mut ledger = funded();
        let mut journal = Journal::new(&mut ledger);
        assert!(journal
            .transfer(&addr(1), &addr(11), &addr(10), Amount::new(1))
            .is_err());
        assert!(journal.is_empty());
    }

    #[test]
    fn works_through_trait_object() {
        let mut ledger = funded();
        let custody: &mut dyn AssetCustody = &mut ledger;
        let mut journal = Journal::new(custody);
        let Ok(()) = journal.transfer(&addr(1), &addr(10), &addr(11), Amount::new(1)) else {
            panic!("transfer");
        };
        assert_eq!(journal.rollback(), Ok(()));
        assert_eq!(ledger.balance_of(&addr(1), &addr(10)), Amount::new(100));
    }
}
