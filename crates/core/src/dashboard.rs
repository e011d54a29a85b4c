//! Dashboard aggregation over an actor's visible products and mentorships.
//!
//! Pure read-side projection: the caller loads the visible set (using
//! [`access::product_scope`](crate::access::product_scope) and friends) and
//! this module groups it by status in a single pass.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::status::{MentorshipStatus, ProductStatus};

/// The fields of a product the summary needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductFacts {
    pub status: ProductStatus,
    pub funding_amount: Option<i64>,
}

/// Counts and derived metrics over a set of products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub total: usize,
    /// Every status is present, zero-filled.
    pub by_status: BTreeMap<ProductStatus, usize>,
    /// `(approved + funded) / (approved + funded + rejected)`; 0 when nothing is decided.
    pub approval_rate: f64,
    /// Sum of `funding_amount` over funded products.
    pub total_funding: i64,
}

/// Counts and derived metrics over a set of mentorships.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorshipSummary {
    pub total: usize,
    pub by_status: BTreeMap<MentorshipStatus, usize>,
    /// `completed / (completed + terminated)`; 0 when none have finished.
    pub success_rate: f64,
}

/// Ratio helper that treats an empty denominator as 0.
fn rate(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

pub fn summarize_products<I>(products: I) -> ProductSummary
where
    I: IntoIterator<Item = ProductFacts>,
{
    let mut by_status: BTreeMap<ProductStatus, usize> =
        ProductStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut total = 0;
    let mut total_funding: i64 = 0;

    for product in products {
        total += 1;
        *by_status.entry(product.status).or_insert(0) += 1;
        if product.status == ProductStatus::Funded {
            total_funding = total_funding.saturating_add(product.funding_amount.unwrap_or(0));
        }
    }

    let approved = by_status[&ProductStatus::Approved] + by_status[&ProductStatus::Funded];
    let decided = approved + by_status[&ProductStatus::Rejected];

    ProductSummary {
        total,
        by_status,
        approval_rate: rate(approved, decided),
        total_funding,
    }
}

pub fn summarize_mentorships<I>(statuses: I) -> MentorshipSummary
where
    I: IntoIterator<Item = MentorshipStatus>,
{
    let mut by_status: BTreeMap<MentorshipStatus, usize> =
        MentorshipStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut total = 0;

    for status in statuses {
        total += 1;
        *by_status.entry(status).or_insert(0) += 1;
    }

    let completed = by_status[&MentorshipStatus::Completed];
    let finished = completed + by_status[&MentorshipStatus::Terminated];

    MentorshipSummary {
        total,
        by_status,
        success_rate: rate(completed, finished),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(status: ProductStatus, funding_amount: Option<i64>) -> ProductFacts {
        ProductFacts {
            status,
            funding_amount,
        }
    }

    #[test]
    fn empty_set_is_zero_filled() {
        let summary = summarize_products(Vec::new());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.by_status.len(), ProductStatus::ALL.len());
        assert!(summary.by_status.values().all(|c| *c == 0));
        assert_eq!(summary.approval_rate, 0.0);
        assert_eq!(summary.total_funding, 0);
    }

    #[test]
    fn counts_rates_and_funding() {
        let products = vec![
            facts(ProductStatus::Pending, None),
            facts(ProductStatus::Approved, None),
            facts(ProductStatus::Rejected, None),
            facts(ProductStatus::Funded, Some(25_000)),
            facts(ProductStatus::Funded, Some(75_000)),
        ];
        let summary = summarize_products(products.clone());

        assert_eq!(summary.total, 5);
        assert_eq!(summary.by_status[&ProductStatus::Funded], 2);
        assert_eq!(summary.by_status.values().sum::<usize>(), products.len());
        assert!((summary.approval_rate - 0.75).abs() < f64::EPSILON);
        assert_eq!(summary.total_funding, 100_000);
    }

    #[test]
    fn mentorship_success_rate() {
        let summary = summarize_mentorships([
            MentorshipStatus::Active,
            MentorshipStatus::Completed,
            MentorshipStatus::Completed,
            MentorshipStatus::Terminated,
        ]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_status.values().sum::<usize>(), 4);
        assert!((summary.success_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_serializes_status_labels() {
        let summary = summarize_products([facts(ProductStatus::Approved, None)]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["by_status"]["approved"], 1);
        assert_eq!(json["by_status"]["pending"], 0);
    }
}
