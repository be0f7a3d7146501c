pub mod global_context;
pub mod sidebar;

use global_context::AppGlobalContext;
use leptos::prelude::*;

/// Sidebar on the left, active page in the main area
#[component]
pub fn Shell<L, C>(left: L, center: C) -> impl IntoView
where
    L: Fn() -> AnyView + 'static + Send,
    C: Fn() -> AnyView + 'static + Send,
{
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <div class="app-layout">
            <div class="app-body">
                <div data-zone="left" class="left" class:left--collapsed=move || !ctx.left_open.get()>
                    {left()}
                </div>
                <div class="app-main">
                    {center()}
                </div>
            </div>
        </div>
    }
}
