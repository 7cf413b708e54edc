// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, TransactionRecord};
use rust_decimal::Decimal;

/// Main-description substring that marks a supplier payment. Case-sensitive.
pub const SUPPLIER_MARKER: &str = "FRIDGETNP";

pub fn categorize(amount: Decimal, main_description: &str) -> Category {
    let by_sign = if amount > Decimal::ZERO {
        Category::Revenue
    } else {
        Category::Expenses
    };
    if main_description.contains(SUPPLIER_MARKER) {
        Category::Suppliers
    } else {
        by_sign
    }
}

/// Returns the record with `description` derived from its amount and main
/// description. Any incoming description is overwritten. A missing amount
/// counts as not positive and a missing main description as not matching.
pub fn classify(mut record: TransactionRecord) -> TransactionRecord {
    let amount = record.amount.unwrap_or(Decimal::ZERO);
    let main = record.main_description.as_deref().unwrap_or("");
    record.description = Some(categorize(amount, main));
    record
}
