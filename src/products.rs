//! Products

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Product Id
pub type ProductId = TypedId<Product>;

/// Category Id
pub type CategoryId = TypedId<Category>;

/// Component Id
pub type ComponentId = TypedId<Component>;

/// A menu product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Base price, used wherever a restaurant has no override
    pub price: Decimal,

    /// Owning category
    pub category_id: CategoryId,

    /// Weight or portion label, e.g. "250 g"
    #[serde(default)]
    pub weight: Option<String>,

    /// Average review rating
    #[serde(default)]
    pub rating: f64,

    /// Number of reviews behind `rating`
    #[serde(default)]
    pub review_count: u32,

    /// Whether the product is offered at all
    #[serde(default = "available")]
    pub is_available: bool,
}

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Position in the menu
    #[serde(default)]
    pub sort_order: i32,

    /// Inactive categories are hidden
    #[serde(default = "available")]
    pub is_active: bool,
}

/// What a component can be chosen as when customising a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Dipping sauce, at most one per line item
    Sauce,

    /// Side dish, any number per line item
    Side,
}

/// A sauce or side offered as a line item customisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Component id
    pub id: ComponentId,

    /// Display name, also the value stored on line items
    pub name: String,

    /// Sauce or side
    #[serde(rename = "type")]
    pub kind: ComponentKind,

    /// Inactive components are hidden
    #[serde(default = "available")]
    pub is_active: bool,
}

const fn available() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_flags_default_to_available() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{"id": 1, "name": "Margherita", "price": 500, "category_id": 2}"#,
        )?;

        assert!(product.is_available);
        assert_eq!(product.price, Decimal::from(500));
        assert_eq!(product.review_count, 0);
        assert!(product.weight.is_none());

        Ok(())
    }

    #[test]
    fn component_kind_reads_type_field() -> TestResult {
        let component: Component =
            serde_json::from_str(r#"{"id": 3, "name": "Garlic", "type": "sauce"}"#)?;

        assert_eq!(component.kind, ComponentKind::Sauce);
        assert!(component.is_active);

        Ok(())
    }
}
