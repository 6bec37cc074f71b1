//! Shopping cart state and its pure reducer.
//!
//! The cart is modeled as an explicit state machine: [`Cart::apply`] is a
//! side-effect-free transition function `(state, action) -> state'`, and the
//! application layer wraps it with write-through persistence. This keeps the
//! business rules testable without any storage dependency.
//!
//! Invariants:
//! - At most one [`CartLine`] per product id.
//! - A line's quantity is always at least 1; a quantity that would drop to
//!   zero removes the line instead.
//! - Insertion order of lines is preserved for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::product::{Product, ProductId};

/// One distinct product held in the cart.
///
/// The unit price is captured when the product is first added and is never
/// refreshed from the catalog afterwards (price-lock at add time). The
/// display metadata is a frozen snapshot for the same reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identifier, unique within the cart.
    pub product_id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Unit price at add time.
    pub unit_price: Decimal,
    /// Number of units, always >= 1.
    pub quantity: u32,
    /// Image URL at add time.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Category label at add time.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Description at add time.
    #[serde(default)]
    pub description: Option<String>,
}

impl CartLine {
    /// The line total: unit price times quantity, saturating at
    /// [`Decimal::MAX`] instead of panicking on overflow.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }
}

/// Untrusted product data offered to the cart.
///
/// Fields are optional because the payload originates outside the domain
/// (API responses or UI state); [`Cart::apply`] validates it before any
/// line is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Product identifier; required for an add to succeed.
    pub id: Option<ProductId>,
    /// Product name; copied through, empty when absent.
    pub name: Option<String>,
    /// Unit price as a decimal string; required and must parse as a
    /// non-negative number.
    pub price: Option<String>,
    /// Image URL passthrough.
    pub image_url: Option<String>,
    /// Category label passthrough.
    pub category_name: Option<String>,
    /// Description passthrough.
    pub description: Option<String>,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id),
            name: Some(product.name.clone()),
            price: Some(product.price.to_string()),
            image_url: product.image_url.clone(),
            category_name: product.category_name.clone(),
            description: product.description.clone(),
        }
    }
}

/// A state transition of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of a product; increments the quantity when a line for
    /// the same product already exists.
    Add(ProductInput),
    /// Remove the line for a product; a no-op when absent.
    Remove(ProductId),
    /// Set the quantity of a line; values `<= 0` remove the line instead
    /// of being rejected.
    SetQuantity {
        /// Product whose line is updated.
        id: ProductId,
        /// New quantity; coerced to a removal when not positive.
        quantity: i64,
    },
    /// Remove every line.
    Clear,
}

/// The ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in insertion order.
    pub items: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Applies an action and returns the next state.
    ///
    /// The function is pure: on error the caller's state is untouched, and
    /// no I/O of any kind happens here.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProduct`] when an [`CartAction::Add`]
    /// payload is missing its id or price, and [`DomainError::InvalidPrice`]
    /// when the price does not parse as a non-negative decimal.
    pub fn apply(&self, action: &CartAction) -> DomainResult<Self> {
        let mut next = self.clone();
        match action {
            CartAction::Add(input) => {
                let id = input
                    .id
                    .ok_or_else(|| DomainError::InvalidProduct("missing product id".to_owned()))?;
                let raw_price = input
                    .price
                    .as_deref()
                    .ok_or_else(|| DomainError::InvalidProduct("missing price".to_owned()))?;
                let unit_price = parse_price(raw_price)?;

                if let Some(line) = next.items.iter_mut().find(|l| l.product_id == id) {
                    // Price is intentionally not updated from the new call.
                    line.quantity = line.quantity.saturating_add(1);
                } else {
                    next.items.push(CartLine {
                        product_id: id,
                        name: input.name.clone().unwrap_or_default(),
                        unit_price,
                        quantity: 1,
                        image_url: input.image_url.clone(),
                        category_name: input.category_name.clone(),
                        description: input.description.clone(),
                    });
                }
            }
            CartAction::Remove(id) => {
                next.items.retain(|l| l.product_id != *id);
            }
            CartAction::SetQuantity { id, quantity } => {
                if *quantity <= 0 {
                    next.items.retain(|l| l.product_id != *id);
                } else if let Some(line) = next.items.iter_mut().find(|l| l.product_id == *id) {
                    line.quantity = u32::try_from(*quantity).unwrap_or(u32::MAX);
                }
            }
            CartAction::Clear => next.items.clear(),
        }
        Ok(next)
    }

    /// Sum of `unit_price * quantity` over all lines; zero for an empty
    /// cart. Never fails: the sum saturates at [`Decimal::MAX`] instead of
    /// panicking on overflow.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLine::line_total).fold(
            Decimal::ZERO,
            |acc, line_total| acc.checked_add(line_total).unwrap_or(Decimal::MAX),
        )
    }

    /// Sum of quantities across all lines; zero for an empty cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Whether a line for the given product exists.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|l| l.product_id == id)
    }

    /// Quantity of the given product, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|l| l.product_id == id)
            .map_or(0, |l| l.quantity)
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parses a price string into a non-negative decimal.
fn parse_price(raw: &str) -> DomainResult<Decimal> {
    let price: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidPrice(raw.to_owned()))?;
    if price.is_sign_negative() {
        return Err(DomainError::InvalidPrice(raw.to_owned()));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(id: i64, price: &str) -> ProductInput {
        ProductInput {
            id: Some(ProductId(id)),
            name: Some(format!("Product {id}")),
            price: Some(price.to_owned()),
            ..ProductInput::default()
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    #[test]
    fn test_add_distinct_products() {
        let cart = Cart::new();
        let cart = cart.apply(&CartAction::Add(input(1, "10.00"))).expect("add");
        let cart = cart.apply(&CartAction::Add(input(2, "2.50"))).expect("add");
        let cart = cart.apply(&CartAction::Add(input(3, "0.99"))).expect("add");

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), dec("13.49"));
    }

    #[test]
    fn test_add_same_product_twice_keeps_first_price() {
        let cart = Cart::new();
        let cart = cart.apply(&CartAction::Add(input(1, "10.00"))).expect("add");
        let cart = cart.apply(&CartAction::Add(input(1, "99.99"))).expect("add");

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(ProductId(1)), 2);
        // Price captured on the first add wins.
        assert_eq!(cart.total(), dec("20.00"));
    }

    #[test]
    fn test_add_missing_price_is_rejected() {
        let cart = Cart::new();
        let bad = ProductInput {
            id: Some(ProductId(5)),
            ..ProductInput::default()
        };
        let err = cart.apply(&CartAction::Add(bad)).expect_err("must reject");
        assert!(matches!(err, DomainError::InvalidProduct(_)));
    }

    #[test]
    fn test_add_missing_id_is_rejected() {
        let cart = Cart::new();
        let bad = ProductInput {
            price: Some("1.00".to_owned()),
            ..ProductInput::default()
        };
        let err = cart.apply(&CartAction::Add(bad)).expect_err("must reject");
        assert!(matches!(err, DomainError::InvalidProduct(_)));
    }

    #[test]
    fn test_add_unparseable_or_negative_price_is_rejected() {
        let cart = Cart::new();
        assert!(matches!(
            cart.apply(&CartAction::Add(input(1, "not-a-number"))),
            Err(DomainError::InvalidPrice(_))
        ));
        assert!(matches!(
            cart.apply(&CartAction::Add(input(1, "-4.00"))),
            Err(DomainError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes_line() {
        let base = Cart::new()
            .apply(&CartAction::Add(input(1, "3.00")))
            .expect("add");

        let zeroed = base
            .apply(&CartAction::SetQuantity {
                id: ProductId(1),
                quantity: 0,
            })
            .expect("set");
        assert!(!zeroed.contains(ProductId(1)));

        let negative = base
            .apply(&CartAction::SetQuantity {
                id: ProductId(1),
                quantity: -5,
            })
            .expect("set");
        assert!(!negative.contains(ProductId(1)));
    }

    #[test]
    fn test_set_quantity_updates_line() {
        let cart = Cart::new()
            .apply(&CartAction::Add(input(1, "3.00")))
            .expect("add")
            .apply(&CartAction::SetQuantity {
                id: ProductId(1),
                quantity: 4,
            })
            .expect("set");

        assert_eq!(cart.quantity_of(ProductId(1)), 4);
        assert_eq!(cart.total(), dec("12.00"));
    }

    #[test]
    fn test_set_quantity_on_absent_line_is_noop() {
        let cart = Cart::new()
            .apply(&CartAction::SetQuantity {
                id: ProductId(42),
                quantity: 3,
            })
            .expect("set");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let cart = Cart::new()
            .apply(&CartAction::Add(input(1, "3.00")))
            .expect("add");
        let next = cart.apply(&CartAction::Remove(ProductId(99))).expect("remove");
        assert_eq!(next, cart);
    }

    #[test]
    fn test_clear_empties_totals() {
        let cart = Cart::new()
            .apply(&CartAction::Add(input(1, "3.00")))
            .expect("add")
            .apply(&CartAction::Add(input(2, "8.00")))
            .expect("add")
            .apply(&CartAction::Clear)
            .expect("clear");

        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_failed_add_leaves_state_unchanged() {
        let cart = Cart::new()
            .apply(&CartAction::Add(input(1, "3.00")))
            .expect("add");
        let bad = ProductInput {
            id: Some(ProductId(2)),
            ..ProductInput::default()
        };
        assert!(cart.apply(&CartAction::Add(bad)).is_err());
        // The caller's state was never touched; totals are intact.
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total(), dec("3.00"));
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        // Decimal::MAX is a valid non-negative price string, so it passes
        // add-time validation; totals must still never panic.
        let extreme = Decimal::MAX.to_string();
        let cart = Cart::new()
            .apply(&CartAction::Add(input(1, &extreme)))
            .expect("add")
            .apply(&CartAction::SetQuantity {
                id: ProductId(1),
                quantity: 2,
            })
            .expect("set");

        assert_eq!(cart.total(), Decimal::MAX);

        // Summing two saturated lines saturates too.
        let cart = cart
            .apply(&CartAction::Add(input(2, &extreme)))
            .expect("add");
        assert_eq!(cart.total(), Decimal::MAX);
    }

    #[test]
    fn test_snapshot_round_trip_preserves_order() {
        let cart = Cart::new()
            .apply(&CartAction::Add(input(7, "1.25")))
            .expect("add")
            .apply(&CartAction::Add(input(3, "9.00")))
            .expect("add")
            .apply(&CartAction::Add(input(7, "1.25")))
            .expect("add");

        let json = serde_json::to_string(&cart).expect("serialize");
        let restored: Cart = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored, cart);
        let ids: Vec<_> = restored.items.iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![ProductId(7), ProductId(3)]);
    }

    #[test]
    fn test_product_input_from_product() {
        let product: Product = serde_json::from_str(
            r#"{"id": 4, "name": "Lamp", "price": "25.00", "category_name": "Home"}"#,
        )
        .expect("valid product");
        let input = ProductInput::from(&product);
        assert_eq!(input.id, Some(ProductId(4)));
        assert_eq!(input.price.as_deref(), Some("25.00"));
        assert_eq!(input.category_name.as_deref(), Some("Home"));
    }
}
