//! External asset registry contract, plus an in-memory collection.
//!
//! The house never owns the registry's rules; it only relies on the
//! ownership/approval contract below. [`InMemoryAssetRegistry`] implements
//! that contract for single-process deployments and tests.

use std::collections::HashMap;

use auctionhouse_types::{AccountId, AssetRef, AuctionError, Result};

/// Ownership and transfer primitives of a non-fungible asset registry.
pub trait AssetRegistry {
    /// Current owner, or `None` if the asset does not exist.
    fn owner_of(&self, asset: &AssetRef) -> Option<AccountId>;

    /// Authorize `spender` to move `asset` on `owner`'s behalf.
    fn approve(&mut self, owner: AccountId, spender: AccountId, asset: &AssetRef) -> Result<()>;

    /// Move `asset` from `from` to `to`. `operator` must be `from` or the
    /// approved spender. Fails without side effects otherwise.
    fn transfer_from(
        &mut self,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        asset: &AssetRef,
    ) -> Result<()>;
}

#[derive(Debug, Clone)]
struct TokenRecord {
    owner: AccountId,
    approved: Option<AccountId>,
}

/// Registry backed by a `HashMap`, one entry per minted asset.
#[derive(Debug, Default)]
pub struct InMemoryAssetRegistry {
    tokens: HashMap<AssetRef, TokenRecord>,
}

impl InMemoryAssetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `asset` owned by `owner`.
    ///
    /// # Errors
    /// Returns `AssetTransferRejected` if the asset already exists.
    pub fn mint(&mut self, owner: AccountId, asset: AssetRef) -> Result<()> {
        if self.tokens.contains_key(&asset) {
            return Err(AuctionError::AssetTransferRejected {
                reason: format!("{asset} already minted"),
            });
        }
        self.tokens.insert(
            asset,
            TokenRecord {
                owner,
                approved: None,
            },
        );
        Ok(())
    }

    /// The currently approved spender, if any.
    #[must_use]
    pub fn approved(&self, asset: &AssetRef) -> Option<AccountId> {
        self.tokens.get(asset).and_then(|t| t.approved)
    }

    /// Number of minted assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl AssetRegistry for InMemoryAssetRegistry {
    fn owner_of(&self, asset: &AssetRef) -> Option<AccountId> {
        self.tokens.get(asset).map(|t| t.owner)
    }

    fn approve(&mut self, owner: AccountId, spender: AccountId, asset: &AssetRef) -> Result<()> {
        let token = self
            .tokens
            .get_mut(asset)
            .ok_or_else(|| AuctionError::AssetTransferRejected {
                reason: format!("{asset} does not exist"),
            })?;
        if token.owner != owner {
            return Err(AuctionError::AssetTransferRejected {
                reason: format!("{owner} does not own {asset}"),
            });
        }
        token.approved = Some(spender);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        asset: &AssetRef,
    ) -> Result<()> {
        let token = self
            .tokens
            .get_mut(asset)
            .ok_or_else(|| AuctionError::AssetTransferRejected {
                reason: format!("{asset} does not exist"),
            })?;
        if token.owner != from {
            return Err(AuctionError::AssetTransferRejected {
                reason: format!("{from} does not own {asset}"),
            });
        }
        if operator != from && token.approved != Some(operator) {
            return Err(AuctionError::AssetTransferRejected {
                reason: format!("{operator} is not approved for {asset}"),
            });
        }
        token.owner = to;
        token.approved = None;
        Ok(())
    }
}
