//! Display helpers for the optimization results table.
//!
//! Missing numbers stay `None` all the way to the screen and render as
//! [`NOT_AVAILABLE`]. They are left out of totals rather than counted as zero.

use crate::api::{OptimizationReport, OptimizationResultRow};

pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            if v < 0.0 {
                format!("-${:.2}", v.abs())
            } else {
                format!("${:.2}", v)
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_count(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.0}", v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `to - from` in percent of `from`; undefined for a zero base.
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 || !from.is_finite() || !to.is_finite() {
        return None;
    }
    Some((to - from) / from * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn css_class(self) -> &'static str {
        match self {
            Trend::Up => "delta-up",
            Trend::Down => "delta-down",
            Trend::Flat => "delta-flat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub delta: f64,
    pub percent: Option<f64>,
}

impl PriceChange {
    /// Only defined when both prices are present.
    pub fn between(current: Option<f64>, optimal: Option<f64>) -> Option<Self> {
        let (current, optimal) = (current?, optimal?);
        if !current.is_finite() || !optimal.is_finite() {
            return None;
        }
        Some(Self {
            delta: optimal - current,
            percent: percent_change(current, optimal),
        })
    }

    pub fn trend(&self) -> Trend {
        // Sub-cent moves display as $0.00 and count as flat.
        if self.delta >= 0.005 {
            Trend::Up
        } else if self.delta <= -0.005 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    pub fn label(&self) -> String {
        let sign = match self.trend() {
            Trend::Up => "+",
            Trend::Down => "-",
            Trend::Flat => "",
        };
        let amount = format!("{}${:.2}", sign, self.delta.abs());
        match self.percent {
            Some(p) => format!("{} ({:+.1}%)", amount, p),
            None => amount,
        }
    }
}

/// Cell text and CSS class for a row's price change.
pub fn price_change_cell(row: &OptimizationResultRow) -> (String, &'static str) {
    match PriceChange::between(row.current_price, row.optimal_price) {
        Some(change) => (change.label(), change.trend().css_class()),
        None => (NOT_AVAILABLE.to_string(), "delta-na"),
    }
}

/// Price elasticity with its demand classification.
pub fn elasticity_label(elasticity: Option<f64>) -> String {
    match elasticity {
        Some(e) if e.is_finite() => {
            let kind = if e.abs() < 1.0 { "Inelastic" } else { "Elastic" };
            format!("{:.2} ({})", e, kind)
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn row_title(row: &OptimizationResultRow) -> String {
    match &row.dish_name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("Item {}", row.dish_id),
    }
}

/// Column sums over the values that are present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub profit: f64,
    pub demand: f64,
    pub profit_missing: usize,
    pub demand_missing: usize,
}

impl Totals {
    pub fn of(rows: &[OptimizationResultRow]) -> Self {
        let mut totals = Totals::default();
        for row in rows {
            match row.expected_profit.filter(|v| v.is_finite()) {
                Some(p) => totals.profit += p,
                None => totals.profit_missing += 1,
            }
            match row.expected_demand.filter(|v| v.is_finite()) {
                Some(d) => totals.demand += d,
                None => totals.demand_missing += 1,
            }
        }
        totals
    }

    /// e.g. "2 rows without data excluded"; empty when nothing was excluded.
    pub fn exclusion_note(&self) -> String {
        let missing = self.profit_missing.max(self.demand_missing);
        match missing {
            0 => String::new(),
            1 => "1 row without data excluded".to_string(),
            n => format!("{} rows without data excluded", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitSummary {
    pub baseline: String,
    pub optimized: String,
    pub improvement: String,
}

impl ProfitSummary {
    pub fn of(report: &OptimizationReport) -> Self {
        let improvement = match (report.baseline_profit, report.optimized_profit) {
            (Some(base), Some(opt)) => percent_change(base, opt)
                .map(|p| format!("{:+.1}%", p))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            _ => NOT_AVAILABLE.to_string(),
        };
        Self {
            baseline: format_money(report.baseline_profit),
            optimized: format_money(report.optimized_profit),
            improvement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DishId;

    fn row(current: Option<f64>, optimal: Option<f64>) -> OptimizationResultRow {
        OptimizationResultRow {
            dish_id: DishId::from("EN005"),
            dish_name: Some("Orange Chicken".into()),
            current_price: current,
            optimal_price: optimal,
            expected_profit: None,
            expected_demand: None,
            elasticity: None,
        }
    }

    #[test]
    fn test_missing_optimal_price_is_not_available() {
        let (text, class) = price_change_cell(&row(Some(12.5), None));
        assert_eq!(text, "N/A");
        assert_eq!(class, "delta-na");
    }

    #[test]
    fn test_missing_current_price_is_not_available() {
        assert_eq!(price_change_cell(&row(None, Some(3.0))).0, "N/A");
    }

    #[test]
    fn test_price_increase() {
        let (text, class) = price_change_cell(&row(Some(10.0), Some(11.5)));
        assert_eq!(text, "+$1.50 (+15.0%)");
        assert_eq!(class, "delta-up");
    }

    #[test]
    fn test_price_decrease() {
        let (text, class) = price_change_cell(&row(Some(8.0), Some(6.0)));
        assert_eq!(text, "-$2.00 (-25.0%)");
        assert_eq!(class, "delta-down");
    }

    #[test]
    fn test_zero_current_price_is_a_value() {
        // Delta is defined, only the percentage is not.
        let (text, class) = price_change_cell(&row(Some(0.0), Some(2.0)));
        assert_eq!(text, "+$2.00");
        assert_eq!(class, "delta-up");
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(format_money(Some(3.456)), "$3.46");
        assert_eq!(format_money(Some(-1.2)), "-$1.20");
        assert_eq!(format_money(Some(0.0)), "$0.00");
        assert_eq!(format_money(None), "N/A");
        assert_eq!(format_money(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn test_elasticity_classification() {
        assert_eq!(elasticity_label(Some(-0.4)), "-0.40 (Inelastic)");
        assert_eq!(elasticity_label(Some(-1.8)), "-1.80 (Elastic)");
        assert_eq!(elasticity_label(Some(0.0)), "0.00 (Inelastic)");
        assert_eq!(elasticity_label(None), "N/A");
    }

    #[test]
    fn test_totals_exclude_missing_values() {
        let mut a = row(Some(1.0), Some(2.0));
        a.expected_profit = Some(100.0);
        a.expected_demand = Some(40.0);
        let mut b = row(Some(1.0), Some(2.0));
        b.expected_profit = Some(0.0);
        let c = row(None, None);

        let totals = Totals::of(&[a, b, c]);
        assert_eq!(totals.profit, 100.0);
        assert_eq!(totals.profit_missing, 1);
        assert_eq!(totals.demand, 40.0);
        assert_eq!(totals.demand_missing, 2);
        assert_eq!(totals.exclusion_note(), "2 rows without data excluded");
    }

    #[test]
    fn test_profit_summary() {
        let report = OptimizationReport {
            results: vec![],
            baseline_profit: Some(200.0),
            optimized_profit: Some(250.0),
            co_occurrence_info: None,
            ai_explanation: None,
        };
        let summary = ProfitSummary::of(&report);
        assert_eq!(summary.baseline, "$200.00");
        assert_eq!(summary.optimized, "$250.00");
        assert_eq!(summary.improvement, "+25.0%");

        let zero_base = OptimizationReport {
            baseline_profit: Some(0.0),
            ..report
        };
        assert_eq!(ProfitSummary::of(&zero_base).improvement, "N/A");
    }

    #[test]
    fn test_row_title_falls_back_to_id() {
        let mut r = row(None, None);
        r.dish_name = None;
        assert_eq!(row_title(&r), "Item EN005");
    }
}
