use leptos::prelude::*;

use crate::api::Combo;

/// Most frequently co-ordered item combinations.
#[component]
pub fn ComboList(combos: Vec<Combo>) -> impl IntoView {
    if combos.is_empty() {
        return view! { <p class="combo-empty">"No popular combinations found."</p> }.into_any();
    }

    view! {
        <ol class="combo-list">
            {combos
                .into_iter()
                .map(|combo| {
                    view! {
                        <li class="combo-item">
                            <span class="combo-names">{combo.label()}</span>
                            <span class="combo-score">
                                {format!("{} orders", combo.popularity_score)}
                            </span>
                        </li>
                    }
                })
                .collect::<Vec<_>>()}
        </ol>
    }
    .into_any()
}
