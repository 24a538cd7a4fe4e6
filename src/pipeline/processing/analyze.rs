use crate::domain::{AnalysisSummary, CleanRecord, PaymentStatus, StatusCounts};
use crate::pipeline::utils::round_to_cents;

/// Compute revenue and status statistics.
///
/// Revenue counts paid orders only. `total_revenue` is rounded to cents;
/// `average_revenue` divides the unrounded paid sum by the number of orders
/// of any status and is not rounded. Empty input gives an all-zero summary.
pub fn analyze(records: &[CleanRecord]) -> AnalysisSummary {
    if records.is_empty() {
        return AnalysisSummary::default();
    }

    let mut paid_revenue = 0.0;
    let mut status_counts = StatusCounts::default();

    for record in records {
        if record.payment_status == PaymentStatus::Paid {
            paid_revenue += record.total;
        }
        status_counts.increment(record.payment_status);
    }

    let total_orders = records.len();

    AnalysisSummary {
        total_revenue: round_to_cents(paid_revenue),
        average_revenue: paid_revenue / total_orders as f64,
        total_orders,
        status_counts,
    }
}
