use leptos::prelude::*;

use crate::api::OptimizationReport;
use crate::results::ProfitSummary;

/// Baseline vs. optimized profit plus the service's notes.
#[component]
pub fn ProfitSummaryPanel(report: OptimizationReport) -> impl IntoView {
    let summary = ProfitSummary::of(&report);

    view! {
        <div class="profit-summary">
            <div class="summary-grid">
                <div class="summary-card">
                    <span class="summary-label">"Baseline Profit"</span>
                    <span class="summary-value">{summary.baseline}</span>
                </div>
                <div class="summary-card">
                    <span class="summary-label">"Optimized Profit"</span>
                    <span class="summary-value">{summary.optimized}</span>
                </div>
                <div class="summary-card">
                    <span class="summary-label">"Improvement"</span>
                    <span class="summary-value">{summary.improvement}</span>
                </div>
            </div>
            {report.co_occurrence_info.map(|info| view! {
                <p class="summary-note co-occurrence">{info}</p>
            })}
            {report.ai_explanation.filter(|t| !t.trim().is_empty()).map(|text| view! {
                <div class="summary-explanation">
                    <h4>"Why these prices"</h4>
                    <p>{text}</p>
                </div>
            })}
        </div>
    }
}
