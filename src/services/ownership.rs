//! Tenant isolation for farm-scoped resources.
//!
//! Every protected resource is owned either directly by an account (farms)
//! or by a farm (crops, livestock, employees). [`OwnershipGuard`] walks that
//! chain back to an account and compares it with the caller.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::db::Store;
use crate::models::account::Account;
use crate::models::crop::Crop;
use crate::models::employee::Employee;
use crate::models::farm::Farm;
use crate::models::livestock::Livestock;
use crate::services::token::AuthUser;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("User not found")]
    AccountNotFound,

    #[error("{kind} not found")]
    ResourceNotFound { kind: &'static str },

    #[error("Access denied to {kind}")]
    AccessDenied { kind: &'static str },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AccessError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Who a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner<'a> {
    /// Public id of the owning account.
    Account(&'a str),
    /// Public id of the owning farm.
    Farm(&'a str),
}

/// A record that can be looked up by public id and knows its owner.
#[async_trait]
pub trait OwnedResource: Sized + Send + Sync {
    /// Name used in error messages.
    const KIND: &'static str;

    async fn find(store: &Store, public_id: &str) -> anyhow::Result<Option<Self>>;

    fn owner(&self) -> Owner<'_>;
}

#[async_trait]
impl OwnedResource for Farm {
    const KIND: &'static str = "Farm";

    async fn find(store: &Store, public_id: &str) -> anyhow::Result<Option<Self>> {
        store.get_farm(public_id).await
    }

    fn owner(&self) -> Owner<'_> {
        Owner::Account(&self.user_id)
    }
}

#[async_trait]
impl OwnedResource for Crop {
    const KIND: &'static str = "Crop";

    async fn find(store: &Store, public_id: &str) -> anyhow::Result<Option<Self>> {
        store.get_crop(public_id).await
    }

    fn owner(&self) -> Owner<'_> {
        Owner::Farm(&self.farm_id)
    }
}

#[async_trait]
impl OwnedResource for Livestock {
    const KIND: &'static str = "Livestock";

    async fn find(store: &Store, public_id: &str) -> anyhow::Result<Option<Self>> {
        store.get_livestock(public_id).await
    }

    fn owner(&self) -> Owner<'_> {
        Owner::Farm(&self.farm_id)
    }
}

#[async_trait]
impl OwnedResource for Employee {
    const KIND: &'static str = "Employee";

    async fn find(store: &Store, public_id: &str) -> anyhow::Result<Option<Self>> {
        store.get_employee(public_id).await
    }

    fn owner(&self) -> Owner<'_> {
        Owner::Farm(&self.farm_id)
    }
}

#[derive(Clone)]
pub struct OwnershipGuard {
    store: Store,
}

impl OwnershipGuard {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Load the caller's account from the numeric id claim.
    ///
    /// The account must still be live and active and carry the email the
    /// token was issued for. A token outliving its account never resolves to
    /// a newer account registered under the same email.
    pub async fn resolve_caller(&self, caller: &AuthUser) -> Result<Account, AccessError> {
        let account = self
            .store
            .get_account_by_id(caller.id)
            .await?
            .ok_or(AccessError::AccountNotFound)?;

        if !account.active || account.email != caller.email {
            warn!(caller = caller.id, "Token does not match a live account");
            return Err(AccessError::AccountNotFound);
        }

        Ok(account)
    }

    /// Resolve `public_id` and confirm the caller owns it.
    ///
    /// A resource whose owning farm no longer resolves is denied rather than
    /// reported missing.
    pub async fn authorize<R: OwnedResource>(
        &self,
        caller: &AuthUser,
        public_id: &str,
    ) -> Result<R, AccessError> {
        let account = self.resolve_caller(caller).await?;

        let resource = R::find(&self.store, public_id)
            .await?
            .ok_or(AccessError::ResourceNotFound { kind: R::KIND })?;

        let owner_id = match resource.owner() {
            Owner::Account(user_id) => user_id.to_string(),
            Owner::Farm(farm_id) => match self.store.get_farm(farm_id).await? {
                Some(farm) => farm.user_id,
                None => {
                    warn!(kind = R::KIND, public_id, farm_id, "Owning farm is missing");
                    return Err(AccessError::AccessDenied { kind: R::KIND });
                }
            },
        };

        if owner_id != account.user_id {
            warn!(
                kind = R::KIND,
                public_id,
                caller = %account.user_id,
                "Cross-tenant access denied"
            );
            return Err(AccessError::AccessDenied { kind: R::KIND });
        }

        Ok(resource)
    }

    /// Confirm the caller owns `farm_id` before creating or listing children
    /// under it. An unknown farm is denied.
    pub async fn authorize_farm(
        &self,
        caller: &AuthUser,
        farm_id: &str,
    ) -> Result<(Account, Farm), AccessError> {
        let account = self.resolve_caller(caller).await?;

        match self.store.get_farm(farm_id).await? {
            Some(farm) if farm.user_id == account.user_id => Ok((account, farm)),
            _ => Err(AccessError::AccessDenied {
                kind: <Farm as OwnedResource>::KIND,
            }),
        }
    }
}
