//! Asset custody: takes listed assets into the house and releases them.
//!
//! `take` and `release` each perform exactly one ownership change through
//! the registry. Whether a release may happen at all (once per auction) is
//! decided by settlement, not here.

use auctionhouse_types::{AccountId, AssetRef, AuctionError, Result};

use crate::registry::AssetRegistry;

/// Holds listed assets on behalf of the house account.
#[derive(Debug, Clone, Copy)]
pub struct AssetCustody {
    /// The account the registry sees as owner while an asset is escrowed.
    custodian: AccountId,
}

impl AssetCustody {
    #[must_use]
    pub fn new(custodian: AccountId) -> Self {
        Self { custodian }
    }

    /// Move `asset` from `seller` into custody.
    ///
    /// The seller must have approved the custodian beforehand.
    ///
    /// # Errors
    /// Returns `AssetTransferRejected` if the registry refuses the transfer;
    /// ownership is unchanged in that case.
    pub fn take<R: AssetRegistry>(
        &self,
        registry: &mut R,
        seller: AccountId,
        asset: &AssetRef,
    ) -> Result<()> {
        registry
            .transfer_from(self.custodian, seller, self.custodian, asset)
            .map_err(Self::rejected)?;
        tracing::debug!(seller = %seller, asset = %asset, "Asset taken into custody");
        Ok(())
    }

    /// Move `asset` out of custody to `to`.
    ///
    /// # Errors
    /// Returns `AssetTransferRejected` if the house does not hold the asset.
    pub fn release<R: AssetRegistry>(
        &self,
        registry: &mut R,
        to: AccountId,
        asset: &AssetRef,
    ) -> Result<()> {
        registry
            .transfer_from(self.custodian, self.custodian, to, asset)
            .map_err(Self::rejected)?;
        tracing::debug!(to = %to, asset = %asset, "Asset released from custody");
        Ok(())
    }

    /// Whether the registry currently records the custodian as owner.
    #[must_use]
    pub fn holds<R: AssetRegistry>(&self, registry: &R, asset: &AssetRef) -> bool {
        registry.owner_of(asset) == Some(self.custodian)
    }

    #[must_use]
    pub fn custodian(&self) -> AccountId {
        self.custodian
    }

    fn rejected(err: AuctionError) -> AuctionError {
        match err {
            AuctionError::AssetTransferRejected { .. } => err,
            other => AuctionError::AssetTransferRejected {
                reason: other.to_string(),
            },
        }
    }
}
