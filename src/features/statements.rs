//! Financial statement classification
//!
//! Filings publish each statement as a titled table ("Consolidated Balance
//! Sheets", "Condensed Statements of Operations (Unaudited)", ...). This
//! module maps titles onto statement kinds and keeps a filing's tables in
//! report order.

use std::fmt;

use indexmap::IndexMap;

use crate::core::table::Table;
use crate::features::search::{search_rows, RowQuery, SearchOutcome};

/// Kind of financial statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    BalanceSheet,
    Operations,
    Income,
    ComprehensiveIncome,
    CashFlows,
    Equity,
    Other,
}

impl StatementKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "balance sheet",
            StatementKind::Operations => "statement of operations",
            StatementKind::Income => "statement of income",
            StatementKind::ComprehensiveIncome => "statement of comprehensive income",
            StatementKind::CashFlows => "statement of cash flows",
            StatementKind::Equity => "statement of equity",
            StatementKind::Other => "other",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a statement title
///
/// Rules are tried in order; the first hit wins. Parenthetical companions
/// (share counts, par values) are never a statement of their own.
pub fn classify_title(title: &str) -> StatementKind {
    let t = title.to_lowercase();
    let has = |word: &str| t.contains(word);

    if has("parenthetical") {
        return StatementKind::Other;
    }

    let statement = has("statement");

    if (has("balance") && has("sheet"))
        || has("financial condition")
        || has("financial position")
    {
        StatementKind::BalanceSheet
    } else if has("cash flow") {
        StatementKind::CashFlows
    } else if statement && has("operation") {
        StatementKind::Operations
    } else if statement && (has("equity") || has("stockholders") || has("shareholders")) {
        StatementKind::Equity
    } else if statement && (has("income") || has("earning") || has("loss")) {
        if has("comprehensive") {
            StatementKind::ComprehensiveIncome
        } else {
            StatementKind::Income
        }
    } else {
        StatementKind::Other
    }
}

/// Titled tables of one filing, in insertion order
#[derive(Debug, Clone, Default)]
pub struct StatementSet {
    tables: IndexMap<String, Table>,
}

impl StatementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table under its title
    ///
    /// Re-inserting a title replaces its table but keeps its position.
    pub fn insert(&mut self, title: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(title.into(), table)
    }

    pub fn get(&self, title: &str) -> Option<&Table> {
        self.tables.get(title)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Titles in insertion order
    pub fn titles(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(title, table)| (title.as_str(), table))
    }

    /// First table whose title classifies as `kind`
    pub fn find(&self, kind: StatementKind) -> Option<(&str, &Table)> {
        self.iter().find(|(title, _)| classify_title(title) == kind)
    }

    /// Rows labelled "net income"
    ///
    /// Looks in the income statement first, then the comprehensive income
    /// statement, then the statement of operations.
    pub fn net_income_rows(&self) -> Option<SearchOutcome> {
        let (title, table) = [
            StatementKind::Income,
            StatementKind::ComprehensiveIncome,
            StatementKind::Operations,
        ]
        .into_iter()
        .find_map(|kind| self.find(kind))?;

        log::debug!("searching net income in '{}'", title);
        let query = RowQuery::new()
            .all_of(["net", "income"])
            .none_of(["per share", "per common share"]);
        Some(search_rows(table, &query))
    }
}

impl FromIterator<(String, Table)> for StatementSet {
    fn from_iter<I: IntoIterator<Item = (String, Table)>>(iter: I) -> Self {
        StatementSet {
            tables: iter.into_iter().collect(),
        }
    }
}
