use chrono::{Datelike, NaiveDate};
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::models::{Category, EntryKind, FinancialSummary, LedgerEntry};

const RECENT_ENTRIES: usize = 5;

/// Monthly and yearly totals relative to `today`, plus all-time totals per
/// category. Recent entries are ordered by date, newest first.
pub fn summarize(entries: &[LedgerEntry], today: NaiveDate) -> FinancialSummary {
    let same_year = |entry: &&LedgerEntry| entry.date.year() == today.year();
    let same_month = |entry: &&LedgerEntry| same_year(entry) && entry.date.month() == today.month();

    let monthly: Vec<&LedgerEntry> = entries.iter().filter(same_month).collect();
    let yearly: Vec<&LedgerEntry> = entries.iter().filter(same_year).collect();

    let yearly_revenue = total(&yearly, EntryKind::Revenue);
    let yearly_expense = total(&yearly, EntryKind::Expense);

    let mut recent: Vec<LedgerEntry> = entries.to_vec();
    recent.sort_by_key(|entry| Reverse((entry.date, entry.created_at)));
    recent.truncate(RECENT_ENTRIES);

    FinancialSummary {
        balance: yearly_revenue - yearly_expense,
        monthly_revenue: total(&monthly, EntryKind::Revenue),
        monthly_expense: total(&monthly, EntryKind::Expense),
        yearly_revenue,
        yearly_expense,
        recent_entries: recent,
        revenue_by_category: by_category(entries, EntryKind::Revenue),
        expense_by_category: by_category(entries, EntryKind::Expense),
    }
}

fn total(entries: &[&LedgerEntry], kind: EntryKind) -> f64 {
    entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.amount)
        .sum()
}

fn by_category(entries: &[LedgerEntry], kind: EntryKind) -> BTreeMap<Category, f64> {
    let mut totals: BTreeMap<Category, f64> =
        Category::ALL.iter().map(|category| (*category, 0.0)).collect();

    for entry in entries.iter().filter(|entry| entry.kind == kind) {
        *totals.entry(entry.category).or_insert(0.0) += entry.amount;
    }
    totals
}
