//! Optimization results with expandable per-item seasonal detail.

use leptos::prelude::*;

use crate::api::{DishId, OptimizationResultRow};
use crate::components::seasonal_detail::SeasonalDetail;
use crate::expansion::{RowExpansionState, RowExpansions};
use crate::results::{
    elasticity_label, format_count, format_money, price_change_cell, row_title, Totals,
};

const DETAIL_COLSPAN: &str = "8";

#[component]
pub fn ResultsTable(
    rows: Vec<OptimizationResultRow>,
    expansions: RwSignal<RowExpansions>,
    /// Invoked with the item id when its Details button is clicked.
    on_toggle: Callback<DishId>,
    heatmap_size: (f64, f64),
) -> impl IntoView {
    let totals = Totals::of(&rows);

    let body = rows
        .into_iter()
        .map(|row| view! { <ResultRow row=row expansions=expansions on_toggle=on_toggle heatmap_size=heatmap_size /> })
        .collect::<Vec<_>>();

    view! {
        <table class="results-table">
            <thead>
                <tr>
                    <th>"Item"</th>
                    <th>"Current Price"</th>
                    <th>"Optimal Price"</th>
                    <th>"Change"</th>
                    <th>"Expected Profit"</th>
                    <th>"Expected Demand"</th>
                    <th>"Elasticity"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>{body}</tbody>
            <tfoot>
                <tr class="totals-row">
                    <td>"Total"</td>
                    <td></td>
                    <td></td>
                    <td></td>
                    <td>{format_money(Some(totals.profit))}</td>
                    <td>{format_count(Some(totals.demand))}</td>
                    <td colspan="2" class="totals-note">{totals.exclusion_note()}</td>
                </tr>
            </tfoot>
        </table>
    }
}

#[component]
fn ResultRow(
    row: OptimizationResultRow,
    expansions: RwSignal<RowExpansions>,
    on_toggle: Callback<DishId>,
    heatmap_size: (f64, f64),
) -> impl IntoView {
    let id = row.dish_id.clone();
    let (delta_text, delta_class) = price_change_cell(&row);

    // Only this row's state; other rows toggling does not redraw our heatmaps.
    let state = {
        let id = id.clone();
        Memo::new(move |_| expansions.with(|e| e.state(&id)))
    };
    let error = {
        let id = id.clone();
        Memo::new(move |_| expansions.with(|e| e.error(&id)))
    };

    let button_label = move || match state.get() {
        RowExpansionState::Collapsed => "Details",
        RowExpansionState::Expanding => "Loading...",
        RowExpansionState::Expanded(_) => "Hide",
    };

    let detail = move || match state.get() {
        RowExpansionState::Collapsed => error
            .get()
            .map(|e| {
                view! {
                    <tr class="detail-row">
                        <td colspan=DETAIL_COLSPAN class="detail-error">
                            {format!("Could not load seasonal data: {}", e)}
                        </td>
                    </tr>
                }
            })
            .into_any(),
        RowExpansionState::Expanding => view! {
            <tr class="detail-row">
                <td colspan=DETAIL_COLSPAN class="detail-loading">"Loading seasonal data..."</td>
            </tr>
        }
        .into_any(),
        RowExpansionState::Expanded(dataset) => view! {
            <tr class="detail-row">
                <td colspan=DETAIL_COLSPAN>
                    <SeasonalDetail dataset=dataset size=heatmap_size />
                </td>
            </tr>
        }
        .into_any(),
    };

    view! {
        <tr class="result-row">
            <td class="item-name">{row_title(&row)}</td>
            <td>{format_money(row.current_price)}</td>
            <td>{format_money(row.optimal_price)}</td>
            <td class=delta_class>{delta_text}</td>
            <td>{format_money(row.expected_profit)}</td>
            <td>{format_count(row.expected_demand)}</td>
            <td>{elasticity_label(row.elasticity)}</td>
            <td>
                <button
                    class="btn btn-small btn-secondary"
                    on:click=move |_| on_toggle.run(id.clone())
                >
                    {button_label}
                </button>
            </td>
        </tr>
        {detail}
    }
}
