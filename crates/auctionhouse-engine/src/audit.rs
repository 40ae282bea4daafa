//! Append-only, hash-chained audit log.
//!
//! Each receipt commits to its sequence number, the previous receipt's
//! hash and the event's canonical payload, so any edit or reordering of
//! history breaks [`AuditLog::verify_chain`].

use auctionhouse_types::{
    AuctionError, AuctionEvent, AuctionId, AuctionReceipt, Result, constants,
};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

#[derive(Debug, Default)]
pub struct AuditLog {
    receipts: Vec<AuctionReceipt>,
}

impl AuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            receipts: Vec::new(),
        }
    }

    /// Append `event`, chaining it to the current head.
    pub fn record(&mut self, event: AuctionEvent, recorded_at: DateTime<Utc>) -> &AuctionReceipt {
        let sequence = self.receipts.len() as u64;
        let prev_hash = self.head_hash();
        let payload_hash = Self::compute_hash(sequence, &prev_hash, &event);

        tracing::debug!(
            seq = sequence,
            kind = event.kind(),
            hash = hex::encode(payload_hash),
            "Receipt recorded"
        );

        self.receipts.push(AuctionReceipt {
            sequence,
            event,
            recorded_at,
            prev_hash,
            payload_hash,
        });
        &self.receipts[self.receipts.len() - 1]
    }

    /// Hash of the latest receipt, or all zeros for an empty log.
    #[must_use]
    pub fn head_hash(&self) -> [u8; 32] {
        self.receipts
            .last()
            .map_or([0u8; 32], |r| r.payload_hash)
    }

    /// Recompute every link.
    ///
    /// # Errors
    /// Returns `Internal` naming the first receipt whose link is broken.
    pub fn verify_chain(&self) -> Result<()> {
        let mut prev = [0u8; 32];
        for (i, receipt) in self.receipts.iter().enumerate() {
            let expected = Self::compute_hash(i as u64, &prev, &receipt.event);
            if receipt.sequence != i as u64
                || receipt.prev_hash != prev
                || receipt.payload_hash != expected
            {
                return Err(AuctionError::Internal(format!(
                    "audit chain broken at receipt {i}"
                )));
            }
            prev = receipt.payload_hash;
        }
        Ok(())
    }

    #[must_use]
    pub fn receipts(&self) -> &[AuctionReceipt] {
        &self.receipts
    }

    /// Receipts concerning one auction, oldest first.
    pub fn for_auction(&self, id: AuctionId) -> impl Iterator<Item = &AuctionReceipt> {
        self.receipts
            .iter()
            .filter(move |r| r.event.auction_id() == Some(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    fn compute_hash(sequence: u64, prev_hash: &[u8; 32], event: &AuctionEvent) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::RECEIPT_DOMAIN);
        hasher.update(sequence.to_le_bytes());
        hasher.update(prev_hash);
        hasher.update(event.signing_payload());
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}
