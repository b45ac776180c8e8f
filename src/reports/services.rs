use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::categories::repo::CategoryType;
use crate::transactions::repo::TransactionCategoryRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// One slice of the per-category breakdown. Income and expense categories
/// land in the same bucket per name; slices appear in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub value: Decimal,
}

/// Accumulate totals and the per-category breakdown over the fetched rows.
/// All arithmetic stays in `Decimal`, so currency sums carry no float
/// drift.
pub fn summarize(rows: &[TransactionCategoryRow]) -> (Totals, Vec<CategorySlice>) {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut slices: Vec<CategorySlice> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match row.category_type {
            CategoryType::Income => income += row.amount,
            CategoryType::Expense => expense += row.amount,
        }

        match index.get(&row.category_name) {
            Some(&i) => slices[i].value += row.amount,
            None => {
                index.insert(row.category_name.clone(), slices.len());
                slices.push(CategorySlice {
                    name: row.category_name.clone(),
                    value: row.amount,
                });
            }
        }
    }

    let net = income - expense;
    (
        Totals {
            income,
            expense,
            net,
        },
        slices,
    )
}
