use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError, Zero};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A decimal as it arrives in JSON: a string, or a number read from its
/// shortest text form so `129.9` stays `129.9`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireDecimal {
    Text(String),
    Number(serde_json::Number),
}

impl WireDecimal {
    pub fn to_text(&self) -> String {
        match self {
            WireDecimal::Text(s) => s.trim().to_string(),
            WireDecimal::Number(n) => n.to_string(),
        }
    }

    pub fn parse(&self) -> Result<BigDecimal, ParseBigDecimalError> {
        BigDecimal::from_str(&self.to_text())
    }
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    WireDecimal::deserialize(deserializer)?
        .parse()
        .map_err(serde::de::Error::custom)
}

/// One product's presence in the cart.
///
/// `name`, `price` and `category` are copies taken when the product was
/// added; they are not refreshed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: BigDecimal,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl LineItem {
    pub fn subtotal(&self) -> BigDecimal {
        self.price.clone() * BigDecimal::from(self.quantity)
    }
}

/// An add-to-cart request as it arrives from a caller, before validation.
#[derive(Debug, Clone)]
pub struct LineItemInput {
    pub product_id: String,
    pub name: String,
    pub price: Option<BigDecimal>,
    pub quantity: i32,
    pub category: Option<String>,
}

impl LineItemInput {
    pub fn validate(self) -> Result<LineItem, RejectReason> {
        check_fields(&self.product_id, &self.name, self.price.as_ref(), self.quantity)?;
        let Some(price) = self.price else {
            return Err(RejectReason::MissingPrice);
        };
        Ok(LineItem {
            product_id: self.product_id,
            name: self.name,
            price,
            quantity: self.quantity,
            category: self.category,
        })
    }
}

impl From<LineItem> for LineItemInput {
    fn from(item: LineItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            price: Some(item.price),
            quantity: item.quantity,
            category: item.category,
        }
    }
}

/// Why a line item was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("product id is empty")]
    EmptyProductId,
    #[error("name is empty")]
    EmptyName,
    #[error("price is missing")]
    MissingPrice,
    #[error("price is negative")]
    NegativePrice,
    #[error("quantity {0} is not positive")]
    NonPositiveQuantity(i32),
}

pub fn check_fields(
    product_id: &str,
    name: &str,
    price: Option<&BigDecimal>,
    quantity: i32,
) -> Result<(), RejectReason> {
    if product_id.is_empty() {
        return Err(RejectReason::EmptyProductId);
    }
    if name.is_empty() {
        return Err(RejectReason::EmptyName);
    }
    match price {
        None => return Err(RejectReason::MissingPrice),
        Some(p) if *p < BigDecimal::zero() => return Err(RejectReason::NegativePrice),
        Some(_) => {}
    }
    if quantity <= 0 {
        return Err(RejectReason::NonPositiveQuantity(quantity));
    }
    Ok(())
}

/// Totals derived from a set of line items. Never stored on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct CartTotals {
    pub total_items: i64,
    pub total_price: BigDecimal,
}

impl CartTotals {
    pub fn compute(items: &[LineItem]) -> Self {
        items.iter().fold(
            CartTotals {
                total_items: 0,
                total_price: BigDecimal::zero(),
            },
            |acc, item| CartTotals {
                total_items: acc.total_items + i64::from(item.quantity),
                total_price: acc.total_price + item.subtotal(),
            },
        )
    }
}

/// Owned view of the cart handed to consumers for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub total_items: i64,
    pub total_price: BigDecimal,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: &str, quantity: i32) -> LineItem {
        LineItem {
            product_id: id.to_string(),
            name: format!("Product {id}"),
            price: BigDecimal::from_str(price).expect("valid decimal"),
            quantity,
            category: None,
        }
    }

    #[test]
    fn totals_of_empty_cart_are_zero() {
        let totals = CartTotals::compute(&[]);
        assert_eq!(totals.total_items, 0);
        assert_eq!(totals.total_price, BigDecimal::zero());
    }

    #[test]
    fn totals_sum_price_times_quantity() {
        let totals = CartTotals::compute(&[item("P1", "10", 2), item("P2", "5", 1)]);
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.total_price, BigDecimal::from(25));
    }

    #[test]
    fn totals_are_exact_for_decimal_prices() {
        let totals = CartTotals::compute(&[item("P1", "0.10", 3), item("P2", "0.20", 1)]);
        assert_eq!(totals.total_price, BigDecimal::from_str("0.5").unwrap());
    }

    #[test]
    fn validate_accepts_well_formed_input() {
        let input = LineItemInput::from(item("P1", "9.99", 1));
        let validated = input.validate().expect("should be valid");
        assert_eq!(validated.product_id, "P1");
    }

    #[test]
    fn validate_rejects_each_bad_field() {
        let mut input = LineItemInput::from(item("P1", "1", 1));
        input.product_id.clear();
        assert_eq!(input.validate(), Err(RejectReason::EmptyProductId));

        let mut input = LineItemInput::from(item("P1", "1", 1));
        input.name.clear();
        assert_eq!(input.validate(), Err(RejectReason::EmptyName));

        let mut input = LineItemInput::from(item("P1", "1", 1));
        input.price = None;
        assert_eq!(input.validate(), Err(RejectReason::MissingPrice));

        let input = LineItemInput::from(item("P1", "-1", 1));
        assert_eq!(input.validate(), Err(RejectReason::NegativePrice));

        let input = LineItemInput::from(item("P1", "1", 0));
        assert_eq!(input.validate(), Err(RejectReason::NonPositiveQuantity(0)));
    }

    #[test]
    fn zero_price_is_allowed() {
        assert!(LineItemInput::from(item("P1", "0", 1)).validate().is_ok());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(item("P1", "10", 2)).unwrap();
        assert_eq!(json["productId"], "P1");
        assert_eq!(json["quantity"], 2);
        assert!(json.get("category").is_none());
    }

    #[test]
    fn fractional_json_number_price_keeps_its_decimal_text() {
        let item: LineItem = serde_json::from_str(
            r#"{"productId":"P1","name":"Helmet","price":129.9,"quantity":2}"#,
        )
        .expect("should parse");

        assert_eq!(item.price.to_string(), "129.9");
        assert_eq!(item.subtotal().to_string(), "259.8");
    }

    #[test]
    fn wire_decimal_reads_strings_and_numbers() {
        let text: WireDecimal = serde_json::from_str(r#"" 9.99 ""#).unwrap();
        let number: WireDecimal = serde_json::from_str("0.1").unwrap();
        let word: WireDecimal = serde_json::from_str(r#""ten""#).unwrap();

        assert_eq!(text.parse().unwrap(), BigDecimal::from_str("9.99").unwrap());
        assert_eq!(number.parse().unwrap().to_string(), "0.1");
        assert!(word.parse().is_err());
    }
}
