// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names in storage and export order. The surrogate `id` is not listed.
pub const FIELD_NAMES: [&str; 10] = [
    "AccountNumber",
    "Date",
    "MainDescription",
    "AdditionalDescription",
    "TransactionType",
    "Amount",
    "Balance",
    "SpendCategory",
    "Currency",
    "Description",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Revenue,
    Expenses,
    Suppliers,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Revenue => "Revenue",
            Category::Expenses => "Expenses",
            Category::Suppliers => "Suppliers",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Revenue" => Some(Category::Revenue),
            "Expenses" => Some(Category::Expenses),
            "Suppliers" => Some(Category::Suppliers),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a bank statement. `None` is the null marker for an absent value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub account_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub main_description: Option<String>,
    pub additional_description: Option<String>,
    pub transaction_type: Option<String>,
    pub amount: Option<Decimal>,
    pub balance: Option<Decimal>,
    pub spend_category: Option<String>,
    pub currency: Option<String>,
    pub description: Option<Category>,
}

impl TransactionRecord {
    /// Fields rendered as text in `FIELD_NAMES` order, `None` for nulls.
    pub fn to_fields(&self) -> [Option<String>; 10] {
        [
            self.account_number.clone(),
            self.date.map(|d| d.format("%Y-%m-%d").to_string()),
            self.main_description.clone(),
            self.additional_description.clone(),
            self.transaction_type.clone(),
            self.amount.map(money_string),
            self.balance.map(money_string),
            self.spend_category.clone(),
            self.currency.clone(),
            self.description.map(|c| c.as_str().to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub record: TransactionRecord,
}

/// Round to cents the way a DECIMAL(_, 2) column does.
pub fn to_money(d: Decimal) -> Decimal {
    let mut out = d.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    out.rescale(2);
    out
}

pub fn money_string(d: Decimal) -> String {
    to_money(d).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn money_is_two_places() {
        assert_eq!(money_string(Decimal::from_str("100").unwrap()), "100.00");
        assert_eq!(money_string(Decimal::from_str("-0.125").unwrap()), "-0.13");
        assert_eq!(money_string(Decimal::from_str("2.345").unwrap()), "2.35");
    }

    #[test]
    fn category_names_round_trip() {
        for c in [Category::Revenue, Category::Expenses, Category::Suppliers] {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
        assert_eq!(Category::parse("revenue"), None);
    }

    #[test]
    fn nulls_stay_null_in_fields() {
        let rec = TransactionRecord {
            amount: Some(Decimal::ZERO),
            ..Default::default()
        };
        let fields = rec.to_fields();
        assert_eq!(fields[5].as_deref(), Some("0.00"));
        assert_eq!(fields[6], None);
        assert_eq!(fields[9], None);
    }
}
