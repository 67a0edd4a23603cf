//! SVG drawing of one season's heatmap.

use std::sync::Arc;

use leptos::prelude::*;

use crate::api::{Season, SeasonalDataset};
use crate::heatmap::render::TITLE_OFFSET;
use crate::heatmap::{render, DomTooltip, TooltipLayer, DEFAULT_SIZE};

/// The page's tooltip layer, provided by the dashboard.
#[derive(Clone, Copy)]
pub struct TooltipContext(pub StoredValue<TooltipLayer<DomTooltip>, LocalStorage>);

/// Heatmap for `season` of one item's dataset.
///
/// Inputs are plain values: the parent re-creates the component when the
/// dataset, season or size changes, which redraws the whole chart.
#[component]
pub fn SeasonHeatmap(
    dataset: Arc<SeasonalDataset>,
    season: Season,
    #[prop(optional)] size: Option<(f64, f64)>,
) -> impl IntoView {
    let size = size.unwrap_or(DEFAULT_SIZE);

    let Some(scene) = render(dataset.season(season), season, size) else {
        return view! {
            <div class="heatmap heatmap-empty">
                <h4 class="heatmap-title">{season.name()}</h4>
                <p class="heatmap-empty-note">"No data"</p>
            </div>
        }
        .into_any();
    };

    // One lease per mounted heatmap; released when this component unmounts.
    let lease = StoredValue::new_local(
        use_context::<TooltipContext>().map(|ctx| ctx.0.with_value(|layer| layer.attach())),
    );
    on_cleanup(move || {
        if let Some(Some(lease)) = lease.try_update_value(Option::take) {
            lease.detach();
        }
    });

    let (hovered, set_hovered) = signal::<Option<String>>(None);

    let x_ticks = scene
        .x_ticks
        .into_iter()
        .map(|tick| {
            view! {
                <text x=format!("{:.2}", tick.position) y="20" text-anchor="middle">
                    {tick.label}
                </text>
            }
        })
        .collect::<Vec<_>>();

    let y_ticks = scene
        .y_ticks
        .into_iter()
        .map(|tick| {
            view! {
                <text x="-6" y=format!("{:.2}", tick.position) dy="0.32em" text-anchor="end">
                    {tick.label}
                </text>
            }
        })
        .collect::<Vec<_>>();

    let cells = scene
        .cells
        .into_iter()
        .map(|cell| {
            let key = cell.key();
            let key_for_class = key.clone();
            let point = cell.point.clone();

            let on_enter = move |_: leptos::ev::MouseEvent| {
                lease.update_value(|l| {
                    if let Some(l) = l {
                        l.hover_enter(&key);
                    }
                });
                set_hovered.set(Some(key.clone()));
            };
            let on_move = move |ev: leptos::ev::MouseEvent| {
                lease.update_value(|l| {
                    if let Some(l) = l {
                        l.hover_move(&point, ev.page_x() as f64, ev.page_y() as f64);
                    }
                });
            };
            let on_leave = move |_: leptos::ev::MouseEvent| {
                lease.update_value(|l| {
                    if let Some(l) = l {
                        l.hover_leave();
                    }
                });
                set_hovered.set(None);
            };

            view! {
                <rect
                    class="heatmap-cell"
                    class:highlighted=move || hovered.get().as_deref() == Some(key_for_class.as_str())
                    x=format!("{:.2}", cell.x)
                    y=format!("{:.2}", cell.y)
                    width=format!("{:.2}", cell.width)
                    height=format!("{:.2}", cell.height)
                    rx="4"
                    ry="4"
                    fill=cell.fill.to_hex()
                    on:mouseenter=on_enter
                    on:mousemove=on_move
                    on:mouseleave=on_leave
                />
            }
        })
        .collect::<Vec<_>>();

    let origin = format!("translate({},{})", scene.margins.left, scene.margins.top);
    let x_axis_origin = format!("translate(0,{:.2})", scene.inner_height);

    view! {
        <div class="heatmap">
            <style>{include_str!("heatmap.css")}</style>
            <svg
                width=format!("{}", scene.width)
                height=format!("{}", scene.height)
                role="img"
                aria-label=format!("{} heatmap", scene.title)
            >
                <g transform=origin>
                    <g class="heatmap-axis heatmap-x-axis" transform=x_axis_origin>
                        {x_ticks}
                    </g>
                    <g class="heatmap-axis heatmap-y-axis">
                        {y_ticks}
                    </g>
                    {cells}
                    <text class="heatmap-title" x="0" y=format!("{}", TITLE_OFFSET)>
                        {scene.title.clone()}
                    </text>
                </g>
            </svg>
        </div>
    }
    .into_any()
}
