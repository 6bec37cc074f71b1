//! Write-through cart service.
//!
//! Owns the in-memory [`Cart`] for the lifetime of the session. Every
//! mutation runs the pure reducer and then overwrites the persisted
//! snapshot; a persistence failure is logged and never aborts the
//! mutation, so the in-memory state always reflects the caller's intent.

use std::sync::Arc;

use bazaar_domain::{Cart, CartAction, DomainResult, ProductId, ProductInput};
use rust_decimal::Decimal;
use tracing::warn;

use crate::ports::CartRepository;

/// The cart store: reducer state plus its persistence binding.
pub struct CartService<R> {
    repo: Arc<R>,
    cart: Cart,
}

impl<R: CartRepository> CartService<R> {
    /// Rehydrates the cart from the repository; a missing or unreadable
    /// snapshot starts an empty cart.
    pub async fn load(repo: Arc<R>) -> Self {
        let cart = match repo.load().await {
            Ok(cart) => cart,
            Err(error) => {
                warn!(%error, "could not load cart snapshot, starting empty");
                Cart::new()
            }
        };
        Self { repo, cart }
    }

    /// Adds one unit of a product, validating the payload first.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the product is missing its id or a
    /// usable price; the cart is unchanged in that case.
    pub async fn add_item(&mut self, product: ProductInput) -> DomainResult<()> {
        self.dispatch(CartAction::Add(product)).await
    }

    /// Removes the line for a product; a no-op when absent.
    ///
    /// # Errors
    ///
    /// Infallible in practice; kept uniform with the other mutations.
    pub async fn remove_item(&mut self, id: ProductId) -> DomainResult<()> {
        self.dispatch(CartAction::Remove(id)).await
    }

    /// Sets the quantity of a line; values `<= 0` remove the line.
    ///
    /// # Errors
    ///
    /// Infallible in practice; kept uniform with the other mutations.
    pub async fn update_quantity(&mut self, id: ProductId, quantity: i64) -> DomainResult<()> {
        self.dispatch(CartAction::SetQuantity { id, quantity }).await
    }

    /// Empties the cart.
    ///
    /// # Errors
    ///
    /// Infallible in practice; kept uniform with the other mutations.
    pub async fn clear(&mut self) -> DomainResult<()> {
        self.dispatch(CartAction::Clear).await
    }

    /// Applies an action and mirrors the new state to storage.
    async fn dispatch(&mut self, action: CartAction) -> DomainResult<()> {
        self.cart = self.cart.apply(&action)?;
        self.persist().await;
        Ok(())
    }

    /// Best-effort write-through; failures are logged, not raised, and the
    /// in-memory state keeps the mutation.
    async fn persist(&self) {
        if let Err(error) = self.repo.save(&self.cart).await {
            warn!(%error, "cart persistence failed");
        }
    }

    /// Writes the current state to storage, for session teardown.
    pub async fn flush(&self) {
        self.persist().await;
    }

    /// The current cart state.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Sum of line totals; zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    /// Sum of quantities; zero for an empty cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Whether a line for the product exists.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.cart.contains(id)
    }

    /// Quantity of the product, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.cart.quantity_of(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryCartRepository;
    use bazaar_domain::DomainError;
    use pretty_assertions::assert_eq;

    fn input(id: i64, price: &str) -> ProductInput {
        ProductInput {
            id: Some(ProductId(id)),
            name: Some(format!("Product {id}")),
            price: Some(price.to_owned()),
            ..ProductInput::default()
        }
    }

    #[tokio::test]
    async fn test_every_mutation_writes_through() {
        let repo = Arc::new(MemoryCartRepository::new());
        let mut service = CartService::load(Arc::clone(&repo)).await;

        service.add_item(input(1, "2.00")).await.expect("add");
        service.update_quantity(ProductId(1), 3).await.expect("set");
        service.remove_item(ProductId(1)).await.expect("remove");
        service.clear().await.expect("clear");

        assert_eq!(repo.save_count(), 4);
        assert_eq!(repo.snapshot().map(|c| c.items.len()), Some(0));
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_mutation() {
        let repo = Arc::new(MemoryCartRepository::new());
        let mut service = CartService::load(Arc::clone(&repo)).await;
        repo.fail_saves(true);

        service.add_item(input(1, "2.00")).await.expect("add succeeds");

        // The mutation survived in memory even though the write failed.
        assert_eq!(service.item_count(), 1);
        assert!(service.contains(ProductId(1)));
        assert_eq!(repo.snapshot(), None);
    }

    #[tokio::test]
    async fn test_validation_failure_does_not_persist() {
        let repo = Arc::new(MemoryCartRepository::new());
        let mut service = CartService::load(Arc::clone(&repo)).await;

        let bad = ProductInput {
            id: Some(ProductId(5)),
            ..ProductInput::default()
        };
        let err = service.add_item(bad).await.expect_err("rejected");
        assert!(matches!(err, DomainError::InvalidProduct(_)));
        assert_eq!(repo.save_count(), 0);
        assert_eq!(service.item_count(), 0);
    }

    #[tokio::test]
    async fn test_rehydrates_previous_snapshot() {
        let repo = Arc::new(MemoryCartRepository::new());
        {
            let mut service = CartService::load(Arc::clone(&repo)).await;
            service.add_item(input(1, "2.00")).await.expect("add");
            service.add_item(input(2, "5.50")).await.expect("add");
        }

        let service = CartService::load(repo).await;
        assert_eq!(service.item_count(), 2);
        assert_eq!(service.total(), "7.50".parse().expect("decimal"));
    }

    #[tokio::test]
    async fn test_quantity_zero_removes_and_lookups_follow() {
        let repo = Arc::new(MemoryCartRepository::new());
        let mut service = CartService::load(Arc::clone(&repo)).await;

        service.add_item(input(1, "2.00")).await.expect("add");
        service.update_quantity(ProductId(1), 0).await.expect("set");

        assert!(!service.contains(ProductId(1)));
        assert_eq!(service.quantity_of(ProductId(1)), 0);
    }
}
