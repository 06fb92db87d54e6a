//! Summary metrics over a filtered view.

use serde::Serialize;

use crate::input::coerce::format_currency;
use crate::schema::{JobTable, PROJECT_VALUE};

/// Shown instead of a number when no project value is available.
pub const NOT_AVAILABLE: &str = "N/A";

/// Row count and project value extremes of a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub count: usize,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

/// One labeled card in the metrics row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

impl Metrics {
    pub fn min_display(&self) -> String {
        display(self.min_value)
    }

    pub fn max_display(&self) -> String {
        display(self.max_value)
    }

    /// The three cards, in display order.
    pub fn cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard {
                label: "Total Projects".to_string(),
                value: self.count.to_string(),
            },
            MetricCard {
                label: "Lowest Project Value".to_string(),
                value: self.min_display(),
            },
            MetricCard {
                label: "Highest Project Value".to_string(),
                value: self.max_display(),
            },
        ]
    }
}

fn display(value: Option<f64>) -> String {
    value
        .map(format_currency)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Summarize a filtered view.
pub fn summarize(view: &JobTable) -> Metrics {
    let values = view.numbers(PROJECT_VALUE);
    Metrics {
        count: view.row_count(),
        min_value: values.iter().copied().reduce(f64::min),
        max_value: values.iter().copied().reduce(f64::max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnKind, ColumnSchema, Value};

    fn values(vals: &[Option<f64>]) -> JobTable {
        let mut table = JobTable::new(vec![ColumnSchema::new("Project Value", ColumnKind::Number)]);
        for v in vals {
            table.push_row(vec![v.map(Value::Number).unwrap_or(Value::Null)]);
        }
        table
    }

    #[test]
    fn test_summarize() {
        let metrics = summarize(&values(&[Some(1500.0), None, Some(250_000.4)]));
        assert_eq!(metrics.count, 3);
        assert_eq!(metrics.min_display(), "$1,500");
        assert_eq!(metrics.max_display(), "$250,000");
    }

    #[test]
    fn test_all_missing_is_not_available() {
        let metrics = summarize(&values(&[None, None]));
        assert_eq!(metrics.count, 2);
        assert_eq!(metrics.min_display(), "N/A");
        assert_eq!(metrics.max_display(), "N/A");
    }

    #[test]
    fn test_absent_column_is_not_available() {
        let mut table = JobTable::new(vec![ColumnSchema::new("Job Title", ColumnKind::Text)]);
        table.push_row(vec![Value::Text("Roof".into())]);
        let cards = summarize(&table).cards();
        assert_eq!(cards[0].value, "1");
        assert_eq!(cards[1].value, "N/A");
        assert_eq!(cards[2].label, "Highest Project Value");
    }
}
