//! Auto-assignment candidate selection

use crate::directory::UserDirectory;
use shared::error::AppResult;
use shared::models::{Order, User, UserRole};

/// Picks assignment candidates when no human made the call
///
/// The engine's contract does not change with the strategy; a load- or
/// distance-aware picker can be substituted here.
#[async_trait::async_trait]
pub trait AssignStrategy: Send + Sync {
    async fn pick_seller(
        &self,
        directory: &dyn UserDirectory,
        order: &Order,
    ) -> AppResult<Option<User>>;

    async fn pick_shipper(
        &self,
        directory: &dyn UserDirectory,
        order: &Order,
    ) -> AppResult<Option<User>>;
}

/// Placeholder strategy: the first verified actor found, in id order
///
/// No fairness, load balancing, or distance weighting.
pub struct FirstVerified;

#[async_trait::async_trait]
impl AssignStrategy for FirstVerified {
    async fn pick_seller(
        &self,
        directory: &dyn UserDirectory,
        _order: &Order,
    ) -> AppResult<Option<User>> {
        let sellers = directory.find_verified_by_role(UserRole::Seller).await?;
        Ok(sellers.into_iter().next())
    }

    async fn pick_shipper(
        &self,
        directory: &dyn UserDirectory,
        _order: &Order,
    ) -> AppResult<Option<User>> {
        let shippers = directory.find_verified_by_role(UserRole::Shipper).await?;
        Ok(shippers.into_iter().next())
    }
}
