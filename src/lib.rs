pub mod api;
mod app;
mod components;
pub mod config;
pub mod detail_cache;
pub mod error;
pub mod expansion;
pub mod heatmap;
mod pages;
pub mod results;

pub use app::App;
pub use config::DashboardConfig;

use leptos::prelude::*;
use tracing::info;

/// Install the panic hook and console logging, then mount the dashboard.
pub fn run() {
    console_error_panic_hook::set_once();

    let config = DashboardConfig::load();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(config.log_level)
            .build(),
    );
    info!("Using optimization service at {}", config.api_base);

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
