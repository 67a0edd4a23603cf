use std::sync::Arc;

use leptos::prelude::*;

use crate::api::{Season, SeasonalDataset};
use crate::components::heatmap::SeasonHeatmap;

/// The four season heatmaps shown under an expanded result row.
#[component]
pub fn SeasonalDetail(dataset: Arc<SeasonalDataset>, size: (f64, f64)) -> impl IntoView {
    view! {
        <div class="seasonal-detail">
            {Season::ALL
                .iter()
                .map(|season| {
                    view! { <SeasonHeatmap dataset=Arc::clone(&dataset) season=*season size=size /> }
                })
                .collect::<Vec<_>>()}
        </div>
    }
}
