//! Inventory Models

use serde::{Deserialize, Serialize};

/// A catalog row with price and integer stock quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sweet {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

/// Create/update request body. Fields are optional so presence can be
/// validated with a 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SweetPayload {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

/// Validated form of [`SweetPayload`].
#[derive(Debug, Clone)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

impl SweetPayload {
    /// Check presence and shape: non-empty text, non-negative numbers.
    pub fn validate(self) -> Result<NewSweet, &'static str> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or("Name and category are required")?;
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .ok_or("Name and category are required")?;

        let price = self.price.ok_or("Price must be a non-negative number")?;
        if !price.is_finite() || price < 0.0 {
            return Err("Price must be a non-negative number");
        }

        let quantity = self
            .quantity
            .filter(|&q| q >= 0)
            .ok_or("Quantity must be a non-negative integer")?;

        Ok(NewSweet {
            name,
            category,
            price,
            quantity,
        })
    }
}

/// Search query parameters. All filters are optional and AND together.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetFilters {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Restock request body
#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub quantity: Option<i64>,
}

/// Response carrying the stock level after a purchase or restock.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityResponse {
    pub message: String,
    pub new_quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> SweetPayload {
        SweetPayload {
            name: Some("Ladoo".to_string()),
            category: Some("Indian".to_string()),
            price: Some(2.5),
            quantity: Some(3),
        }
    }

    #[test]
    fn test_validate_accepts_complete_payload() {
        let sweet = full_payload().validate().unwrap();
        assert_eq!(sweet.name, "Ladoo");
        assert_eq!(sweet.quantity, 3);
    }

    #[test]
    fn test_validate_rejects_missing_or_blank_text() {
        let mut payload = full_payload();
        payload.name = None;
        assert!(payload.validate().is_err());

        let mut payload = full_payload();
        payload.category = Some("   ".to_string());
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut payload = full_payload();
        payload.price = Some(-0.5);
        assert!(payload.validate().is_err());

        let mut payload = full_payload();
        payload.price = Some(f64::NAN);
        assert!(payload.validate().is_err());

        let mut payload = full_payload();
        payload.quantity = Some(-1);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_filters_deserialize_camel_case() {
        let filters: SweetFilters =
            serde_json::from_str(r#"{"minPrice": 1.0, "maxPrice": 5.0, "category": "Choco"}"#)
                .unwrap();
        assert_eq!(filters.min_price, Some(1.0));
        assert_eq!(filters.max_price, Some(5.0));
        assert_eq!(filters.category.as_deref(), Some("Choco"));
        assert!(filters.name.is_none());
    }
}
