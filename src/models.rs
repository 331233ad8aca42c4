//! Inventory data types and form validation
//!
//! Raw form submissions arrive as `CardForm` / `SearchForm` (all fields
//! optional strings) and are validated into `CardInput` / `SearchFilter`
//! before reaching the database layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One inventory row (a lot of one or more identical cards)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: i64,
    pub card_name: String,
    pub player: Option<String>,
    pub year: Option<i64>,
    pub condition: Option<String>,
    pub quantity: Option<i64>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<String>,
    pub set_name: Option<String>,
    pub card_number: Option<String>,
    pub grading: Option<String>,
    pub sale_price: Option<f64>,
    pub sale_date: Option<String>,
    pub vendor_or_buyer: Option<String>,
}

impl InventoryItem {
    /// A lot counts as sold once either sale field is filled in
    pub fn is_sold(&self) -> bool {
        self.sale_price.is_some() || self.sale_date.is_some()
    }

    /// Convert back into form values (used to pre-fill the edit form)
    pub fn to_form(&self) -> CardForm {
        CardForm {
            card_name: Some(self.card_name.clone()),
            player: self.player.clone(),
            year: self.year.map(|v| v.to_string()),
            condition: self.condition.clone(),
            quantity: self.quantity.map(|v| v.to_string()),
            purchase_price: self.purchase_price.map(|v| v.to_string()),
            purchase_date: self.purchase_date.clone(),
            set_name: self.set_name.clone(),
            card_number: self.card_number.clone(),
            grading: self.grading.clone(),
            sale_price: self.sale_price.map(|v| v.to_string()),
            sale_date: self.sale_date.clone(),
            vendor_or_buyer: self.vendor_or_buyer.clone(),
        }
    }
}

/// Validated card fields, ready to be written
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardInput {
    pub card_name: String,
    pub player: Option<String>,
    pub year: Option<i64>,
    pub condition: Option<String>,
    pub quantity: i64,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<String>,
    pub set_name: Option<String>,
    pub card_number: Option<String>,
    pub grading: Option<String>,
    pub sale_price: Option<f64>,
    pub sale_date: Option<String>,
    pub vendor_or_buyer: Option<String>,
}

impl CardInput {
    /// Minimal input with only the required name set
    pub fn named(card_name: &str) -> Self {
        Self {
            card_name: card_name.to_string(),
            quantity: 1,
            ..Default::default()
        }
    }
}

/// A single field validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Raw add/edit form submission
///
/// Every field is optional so that a missing field and a blank field are
/// treated the same way; `validate` decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardForm {
    pub card_name: Option<String>,
    pub player: Option<String>,
    pub year: Option<String>,
    pub condition: Option<String>,
    pub quantity: Option<String>,
    pub purchase_price: Option<String>,
    pub purchase_date: Option<String>,
    pub set_name: Option<String>,
    pub card_number: Option<String>,
    pub grading: Option<String>,
    pub sale_price: Option<String>,
    pub sale_date: Option<String>,
    pub vendor_or_buyer: Option<String>,
}

impl CardForm {
    /// Validate the submission, collecting every field error
    pub fn validate(&self) -> Result<CardInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let card_name = match text(&self.card_name) {
            Some(name) => name,
            None => {
                errors.push(FieldError::new("card_name", "is required"));
                String::new()
            }
        };

        let input = CardInput {
            card_name,
            player: text(&self.player),
            year: whole_number("year", &self.year, &mut errors),
            condition: text(&self.condition),
            quantity: whole_number("quantity", &self.quantity, &mut errors).unwrap_or(1),
            purchase_price: decimal("purchase_price", &self.purchase_price, &mut errors),
            purchase_date: date("purchase_date", &self.purchase_date, &mut errors),
            set_name: text(&self.set_name),
            card_number: text(&self.card_number),
            grading: text(&self.grading),
            sale_price: decimal("sale_price", &self.sale_price, &mut errors),
            sale_date: date("sale_date", &self.sale_date, &mut errors),
            vendor_or_buyer: text(&self.vendor_or_buyer),
        };

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(errors)
        }
    }
}

/// Raw search form (POST /view body or GET /view query)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search: Option<String>,
    pub player: Option<String>,
    pub year: Option<String>,
}

impl SearchForm {
    pub fn validate(&self) -> Result<SearchFilter, Vec<FieldError>> {
        let mut errors = Vec::new();
        let filter = SearchFilter {
            search: text(&self.search),
            player: text(&self.player),
            year: whole_number("year", &self.year, &mut errors),
        };
        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(errors)
        }
    }
}

/// List filter; all present predicates are combined with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    /// Substring of card_name or player
    pub search: Option<String>,
    /// Exact player
    pub player: Option<String>,
    /// Exact year
    pub year: Option<i64>,
}

impl SearchFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.player.is_none() && self.year.is_none()
    }
}

/// Aggregates shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DashboardSummary {
    /// Number of lots (rows)
    pub total_cards: i64,
    /// Sum of purchase_price * quantity
    pub total_value: f64,
    /// Sum of sale_price * quantity
    pub total_sales: f64,
}

impl DashboardSummary {
    pub fn net(&self) -> f64 {
        self.total_sales - self.total_value
    }
}

// ── Field parsers ──────────────────────────────────────────────────────────

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn whole_number(
    field: &'static str,
    value: &Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    let raw = text(value)?;
    match raw.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.push(FieldError::new(field, "must be a whole number"));
            None
        }
    }
}

fn decimal(
    field: &'static str,
    value: &Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let raw = text(value)?;
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            errors.push(FieldError::new(field, "must be a number"));
            None
        }
    }
}

fn date(
    field: &'static str,
    value: &Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let raw = text(value)?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(d) => Some(d.format("%Y-%m-%d").to_string()),
        Err(_) => {
            errors.push(FieldError::new(field, "must be a date (YYYY-MM-DD)"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(card_name: &str) -> CardForm {
        CardForm {
            card_name: Some(card_name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn validate_requires_card_name() {
        let errors = CardForm::default().validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::new("card_name", "is required")]);

        let errors = form("   ").validate().unwrap_err();
        assert_eq!(errors[0].field, "card_name");
    }

    #[test]
    fn validate_defaults_quantity_to_one() {
        let input = form("1989 Upper Deck #1").validate().unwrap();
        assert_eq!(input.quantity, 1);
        assert_eq!(input.player, None);
    }

    #[test]
    fn validate_trims_and_parses_fields() {
        let f = CardForm {
            card_name: Some("  Upper Deck Rookie ".to_string()),
            player: Some("Ken Griffey Jr.".to_string()),
            year: Some("1989".to_string()),
            quantity: Some("3".to_string()),
            purchase_price: Some("12.50".to_string()),
            purchase_date: Some("2024-03-01".to_string()),
            grading: Some("".to_string()),
            ..Default::default()
        };
        let input = f.validate().unwrap();
        assert_eq!(input.card_name, "Upper Deck Rookie");
        assert_eq!(input.year, Some(1989));
        assert_eq!(input.quantity, 3);
        assert_eq!(input.purchase_price, Some(12.5));
        assert_eq!(input.purchase_date.as_deref(), Some("2024-03-01"));
        assert_eq!(input.grading, None);
    }

    #[test]
    fn validate_accepts_negative_quantity() {
        let f = CardForm {
            quantity: Some("-2".to_string()),
            ..form("Misprint")
        };
        assert_eq!(f.validate().unwrap().quantity, -2);
    }

    #[test]
    fn validate_collects_all_errors() {
        let f = CardForm {
            card_name: None,
            year: Some("nineteen".to_string()),
            quantity: Some("1.5".to_string()),
            sale_price: Some("free".to_string()),
            sale_date: Some("03/01/2024".to_string()),
            ..Default::default()
        };
        let fields: Vec<&str> = f.validate().unwrap_err().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["card_name", "year", "quantity", "sale_price", "sale_date"]
        );
    }

    #[test]
    fn search_form_blank_fields_are_ignored() {
        let f = SearchForm {
            search: Some("  ".to_string()),
            player: Some("".to_string()),
            year: None,
        };
        assert!(f.validate().unwrap().is_empty());
    }

    #[test]
    fn search_form_rejects_bad_year() {
        let f = SearchForm {
            year: Some("89ish".to_string()),
            ..Default::default()
        };
        assert_eq!(f.validate().unwrap_err()[0].field, "year");
    }

    #[test]
    fn item_round_trips_through_form() {
        let item = InventoryItem {
            id: 4,
            card_name: "Topps Traded".to_string(),
            player: Some("Barry Bonds".to_string()),
            year: Some(1986),
            condition: Some("NM".to_string()),
            quantity: Some(2),
            purchase_price: Some(40.0),
            purchase_date: Some("2023-11-02".to_string()),
            set_name: Some("Topps".to_string()),
            card_number: Some("11T".to_string()),
            grading: Some("PSA 8".to_string()),
            sale_price: None,
            sale_date: None,
            vendor_or_buyer: Some("Card Show".to_string()),
        };
        let input = item.to_form().validate().unwrap();
        assert_eq!(input.card_name, item.card_name);
        assert_eq!(input.year, item.year);
        assert_eq!(input.purchase_price, item.purchase_price);
        assert_eq!(input.grading, item.grading);
        assert!(!item.is_sold());
    }

    #[test]
    fn dashboard_net() {
        let summary = DashboardSummary {
            total_cards: 2,
            total_value: 30.0,
            total_sales: 45.5,
        };
        assert!((summary.net() - 15.5).abs() < 1e-9);
    }
}
