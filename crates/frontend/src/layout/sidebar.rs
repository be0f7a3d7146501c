use crate::layout::global_context::{
    page_label, AppGlobalContext, PAGE_BUDGETS, PAGE_MATERIALS, PAGE_SALES, PAGE_TOOLS, PAGE_USERS,
};
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use crate::system::users::ui::change_password::ChangePasswordForm;
use leptos::prelude::*;

struct MenuItem {
    key: &'static str,
    icon: &'static str,
    admin_only: bool,
}

const MENU: [MenuItem; 5] = [
    MenuItem { key: PAGE_MATERIALS, icon: "materials", admin_only: false },
    MenuItem { key: PAGE_TOOLS, icon: "tools", admin_only: false },
    MenuItem { key: PAGE_BUDGETS, icon: "budgets", admin_only: false },
    MenuItem { key: PAGE_SALES, icon: "sales", admin_only: false },
    MenuItem { key: PAGE_USERS, icon: "users", admin_only: true },
];

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, set_auth_state) = use_auth();
    let show_password_form = RwSignal::new(false);

    let is_admin = auth_state.with_untracked(|state| state.is_admin());
    let user_name = move || {
        auth_state
            .get()
            .user_info
            .map(|u| u.display_name().to_string())
            .unwrap_or_default()
    };
    let user_id = move || {
        auth_state
            .get_untracked()
            .user_info
            .map(|u| u.id)
            .unwrap_or_default()
    };

    view! {
        <div class="app-sidebar__content">
            <div class="app-sidebar__header">
                <button class="button button--icon" title="Menú" on:click=move |_| ctx.toggle_left()>
                    {icon("chevron-left")}
                </button>
                <span class="app-sidebar__title">"Imprenta"</span>
            </div>

            {MENU.iter().filter(|item| !item.admin_only || is_admin).map(|item| {
                let key = item.key;
                view! {
                    <div
                        class="app-sidebar__item"
                        class:app-sidebar__item--active=move || ctx.active.get() == key
                        on:click=move |_| ctx.open(key)
                    >
                        <div class="app-sidebar__item-content">
                            {icon(item.icon)}
                            <span>{page_label(key)}</span>
                        </div>
                    </div>
                }
            }).collect_view()}

            <div class="app-sidebar__footer">
                <div class="app-sidebar__user" title="Cambiar contraseña" on:click=move |_| show_password_form.set(true)>
                    {icon("users")}
                    <span>{user_name}</span>
                </div>
                <div class="app-sidebar__item" on:click=move |_| do_logout(set_auth_state)>
                    <div class="app-sidebar__item-content">
                        {icon("log-out")}
                        <span>"Cerrar sesión"</span>
                    </div>
                </div>
            </div>

            <Show when=move || show_password_form.get()>
                <ChangePasswordForm
                    user_id=user_id()
                    on_close=Callback::new(move |_| show_password_form.set(false))
                />
            </Show>
        </div>
    }
}
