//! Derived read-only views over repository state
//!
//! Everything here is recomputed on each call. Collections are small and
//! there is one writer, so nothing is cached.

use serde::Serialize;

use crate::model::{FeeRecord, Month, PaymentMethod};
use crate::repository::Collections;

/// Number of fee records shown in the earnings chart
pub const TREND_WINDOW: usize = 5;

/// Payment method selector for the fee list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodFilter {
    #[default]
    All,
    Only(PaymentMethod),
}

impl MethodFilter {
    /// `"all"` or a payment method name
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Some(MethodFilter::All);
        }
        PaymentMethod::parse(s).map(MethodFilter::Only)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodFilter::All => "all",
            MethodFilter::Only(method) => method.as_str(),
        }
    }

    pub fn matches(&self, method: PaymentMethod) -> bool {
        match self {
            MethodFilter::All => true,
            MethodFilter::Only(m) => *m == method,
        }
    }
}

/// Fee list filter state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeFilter {
    pub method: MethodFilter,
    /// Case-insensitive substring of the student's display name
    pub search: String,
    /// Exact billing month
    pub month: Option<Month>,
}

impl FeeFilter {
    pub fn new(method: MethodFilter, search: impl Into<String>) -> Self {
        Self {
            method,
            search: search.into(),
            month: None,
        }
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }
}

/// Sum of every fee amount
pub fn total_revenue(fees: &[FeeRecord]) -> f64 {
    fees.iter().map(|f| f.amount).sum()
}

/// The last `n` fees in entry order (not sorted by month)
pub fn recent_fees(fees: &[FeeRecord], n: usize) -> &[FeeRecord] {
    &fees[fees.len().saturating_sub(n)..]
}

/// Fees matching `filter`, in entry order.
///
/// The search runs against the resolved display name, so fees for missing
/// students match on "Unknown".
pub fn filter_fees<'a>(data: &'a Collections, filter: &FeeFilter) -> Vec<&'a FeeRecord> {
    let needle = filter.search.to_lowercase();
    data.fees
        .iter()
        .filter(|f| filter.method.matches(f.method))
        .filter(|f| filter.month.as_ref().is_none_or(|m| *m == f.month))
        .filter(|f| {
            needle.is_empty()
                || data
                    .display_name(f.student_id)
                    .to_lowercase()
                    .contains(&needle)
        })
        .collect()
}

/// One bar in the earnings chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub amount: f64,
}

/// Dashboard figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_students: usize,
    pub total_revenue: f64,
    pub trend: Vec<TrendPoint>,
}

pub fn dashboard(data: &Collections, trend_window: usize) -> Dashboard {
    Dashboard {
        total_students: data.students.len(),
        total_revenue: total_revenue(&data.fees),
        trend: recent_fees(&data.fees, trend_window)
            .iter()
            .map(|f| TrendPoint {
                month: f.month.to_string(),
                amount: f.amount,
            })
            .collect(),
    }
}
