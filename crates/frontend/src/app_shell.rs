//! Root components: the auth gate and the main layout

use crate::domain::a001_material::ui::list::MaterialList;
use crate::domain::a002_tool::ui::list::ToolList;
use crate::domain::a003_budget::ui::list::BudgetList;
use crate::layout::global_context::{
    AppGlobalContext, PAGE_MATERIALS, PAGE_SALES, PAGE_TOOLS, PAGE_USERS,
};
use crate::layout::sidebar::Sidebar;
use crate::layout::Shell;
use crate::projections::p900_sales::ui::SalesList;
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;
use crate::system::users::ui::list::UsersListPage;
use leptos::prelude::*;

fn page_view(key: &str) -> AnyView {
    match key {
        PAGE_MATERIALS => view! { <MaterialList /> }.into_any(),
        PAGE_TOOLS => view! { <ToolList /> }.into_any(),
        PAGE_SALES => view! { <SalesList /> }.into_any(),
        PAGE_USERS => view! { <UsersListPage /> }.into_any(),
        _ => view! { <BudgetList /> }.into_any(),
    }
}

/// Sidebar plus the active page, kept in sync with `?active=`
#[component]
fn MainLayout() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    ctx.init_router_integration();

    view! {
        <Shell
            left=|| view! { <Sidebar /> }.into_any()
            center=move || (move || page_view(&ctx.active.get())).into_any()
        />
    }
}

/// Auth gate: login page until the session is known to be valid
#[component]
pub fn AppShell() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().checked
            fallback=|| view! { <div class="app-loading">"Cargando..."</div> }
        >
            <Show
                when=move || auth_state.get().is_authenticated()
                fallback=|| view! { <LoginPage /> }
            >
                <MainLayout />
            </Show>
        </Show>
    }
}
