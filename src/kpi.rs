use crate::employee::Employee;
use serde::Serialize;

/// Scalar summaries of a filtered subset, split by derived status.
///
/// The averages are `None` (rendered "N/A") when the backing column is
/// absent or has no value among the active rows; that is deliberately
/// distinct from a numeric zero. Pure function of its input, no hidden
/// state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KpiSummary {
    pub active_count: usize,
    pub terminated_count: usize,
    /// Sum of base salary over active rows only.
    pub payroll_total: f64,
    /// Sum of total monthly cost over active rows only.
    pub total_cost: f64,
    pub avg_age: Option<f64>,
    pub avg_tenure_months: Option<f64>,
    pub avg_evaluation: Option<f64>,
}

impl KpiSummary {
    pub fn compute(rows: &[Employee]) -> Self {
        let active: Vec<&Employee> = rows.iter().filter(|e| e.is_active()).collect();
        let terminated_count = rows.iter().filter(|e| e.is_terminated()).count();

        let payroll_total = active.iter().map(|e| e.base_salary).sum();
        let total_cost = active.iter().map(|e| e.total_monthly_cost).sum();

        let avg_age = mean(active.iter().filter_map(|e| e.age.map(f64::from)));
        let avg_tenure_months =
            mean(active.iter().filter_map(|e| e.tenure_months.map(f64::from)));
        let avg_evaluation = mean(active.iter().filter_map(|e| e.evaluation));

        KpiSummary {
            active_count: active.len(),
            terminated_count,
            payroll_total,
            total_cost,
            avg_age,
            avg_tenure_months,
            avg_evaluation,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 { None } else { Some(sum / count as f64) }
}
