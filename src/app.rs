use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::config::DashboardConfig;
use crate::pages::dashboard::DashboardPage;

#[component]
pub fn App(config: DashboardConfig) -> impl IntoView {
    provide_context(config);

    view! {
        <Router>
            <main class="content">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=DashboardPage />
                    <Route path=path!("/dashboard") view=DashboardPage />
                </Routes>
            </main>
        </Router>
    }
}
