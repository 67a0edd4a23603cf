//! Price optimization dashboard.
//!
//! Owns the result list, the per-row expansion map and the session's detail
//! cache. The optimize and combo requests run concurrently; each panel
//! renders as soon as its own payload is in.

use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::{ComboPopularity, DishId, GlooTransport, OptimizationReport, ServiceClient};
use crate::components::combo_list::ComboList;
use crate::components::heatmap::TooltipContext;
use crate::components::profit_summary::ProfitSummaryPanel;
use crate::components::results_table::ResultsTable;
use crate::config::DashboardConfig;
use crate::detail_cache::DetailCache;
use crate::expansion::{RowExpansions, Toggle};
use crate::heatmap::{DomTooltip, TooltipLayer};

#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeState {
    Idle,
    Running,
    Ready(OptimizationReport),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComboState {
    Idle,
    Loading,
    Ready(ComboPopularity),
    Failed(String),
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let config = use_context::<DashboardConfig>().unwrap_or_default();
    let heatmap_size = config.heatmap_size();
    let client = ServiceClient::new(config.api_base.clone(), GlooTransport);

    let cache = StoredValue::new_local(DetailCache::new(client.clone()));
    let expansions = RwSignal::new(RowExpansions::new());
    provide_context(TooltipContext(StoredValue::new_local(TooltipLayer::new(
        DomTooltip::default(),
    ))));

    let (optimize, set_optimize) = signal(OptimizeState::Idle);
    let (combos, set_combos) = signal(ComboState::Idle);

    let run_optimize = move |_| {
        set_optimize.set(OptimizeState::Running);
        set_combos.set(ComboState::Loading);
        // Detail cache survives re-runs; row states do not.
        expansions.update(|e| e.reset());

        let optimize_client = client.clone();
        spawn_local(async move {
            match optimize_client.optimize_prices().await {
                Ok(report) => set_optimize.set(OptimizeState::Ready(report)),
                Err(e) => {
                    warn!("Optimization failed: {}", e);
                    set_optimize.set(OptimizeState::Failed(format!("Optimization failed: {}", e)));
                }
            }
        });

        let combo_client = client.clone();
        spawn_local(async move {
            match combo_client.combo_popularity().await {
                Ok(c) => set_combos.set(ComboState::Ready(c)),
                Err(e) => {
                    warn!("Combo popularity failed: {}", e);
                    set_combos.set(ComboState::Failed(format!("Could not load combos: {}", e)));
                }
            }
        });
    };

    let on_toggle = Callback::new(move |id: DishId| {
        let step = cache.with_value(|c| expansions.try_update(|e| e.toggle(&id, c)));
        let Some(Toggle::Fetch(ticket)) = step else {
            return;
        };

        info!("Loading seasonal detail for dish {}", id);
        let fetch = cache.with_value(|c| c.get_or_fetch(id.clone()));
        spawn_local(async move {
            let outcome = fetch.await;
            expansions.update(|e| {
                e.resolve(&id, ticket, &outcome);
            });
        });
    });

    view! {
        <div class="page dashboard-page">
            <style>{include_str!("dashboard.css")}</style>
            <h2>"Menu Price Optimization"</h2>
            <p class="page-description">
                "Run the optimizer to get recommended prices, then open any item to see how it sells across seasons."
            </p>

            <button
                class="btn btn-primary"
                on:click=run_optimize
                disabled=move || optimize.get() == OptimizeState::Running
            >
                {move || {
                    if optimize.get() == OptimizeState::Running {
                        "Optimizing..."
                    } else {
                        "Optimize Prices"
                    }
                }}
            </button>

            {move || match optimize.get() {
                OptimizeState::Idle => view! {
                    <p class="hint">"No results yet."</p>
                }
                .into_any(),
                OptimizeState::Running => view! {
                    <div class="loading-indicator">
                        <div class="spinner"></div>
                        <p>"Optimizing prices..."</p>
                    </div>
                }
                .into_any(),
                OptimizeState::Failed(message) => view! {
                    <div class="dashboard-error">
                        <span class="status-text status-error">{message}</span>
                    </div>
                }
                .into_any(),
                OptimizeState::Ready(report) => {
                    let rows = report.results.clone();
                    view! {
                        <section class="results-section">
                            <ProfitSummaryPanel report=report />
                            <h3>"Recommended Prices"</h3>
                            <ResultsTable
                                rows=rows
                                expansions=expansions
                                on_toggle=on_toggle
                                heatmap_size=heatmap_size
                            />
                        </section>
                    }
                    .into_any()
                }
            }}

            {move || match combos.get() {
                ComboState::Idle => ().into_any(),
                ComboState::Loading => view! {
                    <section class="combo-section">
                        <h3>"Popular Combinations"</h3>
                        <p class="hint">"Loading combinations..."</p>
                    </section>
                }
                .into_any(),
                ComboState::Failed(message) => view! {
                    <section class="combo-section">
                        <h3>"Popular Combinations"</h3>
                        <p class="status-text status-error">{message}</p>
                    </section>
                }
                .into_any(),
                ComboState::Ready(popularity) => view! {
                    <section class="combo-section">
                        <h3>"Popular Combinations"</h3>
                        <ComboList combos=popularity.top_combos />
                    </section>
                }
                .into_any(),
            }}
        </div>
    }
}
