use contracts::system::users::User;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::api_utils::confirm;
use crate::shared::icons::icon;
use crate::system::auth::guard::RequireAdmin;
use crate::system::users::api;
use crate::system::users::ui::details::UserForm;

/// `None` closed, `Some(None)` creating, `Some(Some(user))` editing
type Editing = Option<Option<User>>;

fn short_date(value: &str) -> String {
    value.get(..10).unwrap_or(value).to_string()
}

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequireAdmin>
            <UsersList />
        </RequireAdmin>
    }
}

#[component]
fn UsersList() -> impl IntoView {
    let users: RwSignal<Vec<User>> = RwSignal::new(Vec::new());
    let error = RwSignal::new(Option::<String>::None);
    let loading = RwSignal::new(false);
    let editing: RwSignal<Editing> = RwSignal::new(None);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            match api::fetch_users().await {
                Ok(data) => {
                    users.set(data);
                    error.set(None);
                }
                Err(e) => error.set(Some(format!("No se pudieron cargar los usuarios: {}", e))),
            }
            loading.set(false);
        });
    };

    let remove = move |user: User| {
        if !confirm(&format!("¿Eliminar al usuario {}?", user.email)) {
            return;
        }
        spawn_local(async move {
            match api::delete_user(&user.id).await {
                Ok(()) => load(),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    load();

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Usuarios"</h1>
                    <Badge>{move || users.with(Vec::len).to_string()}</Badge>
                </div>
                <div class="header__actions">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| editing.set(Some(None))>
                        {icon("plus")}
                        " Nuevo usuario"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Cargando..." } else { " Actualizar" }}
                    </Button>
                </div>
            </div>

            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="table-wrapper">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell min_width=180.0>"Email"</TableHeaderCell>
                            <TableHeaderCell min_width=160.0>"Nombre"</TableHeaderCell>
                            <TableHeaderCell min_width=100.0>"Rol"</TableHeaderCell>
                            <TableHeaderCell min_width=90.0>"Estado"</TableHeaderCell>
                            <TableHeaderCell min_width=110.0>"Último ingreso"</TableHeaderCell>
                            <TableHeaderCell min_width=110.0>"Creado"</TableHeaderCell>
                            <TableHeaderCell min_width=60.0></TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || users.get()
                            key=|u| (u.id.clone(), u.updated_at.clone())
                            children=move |user| {
                                let for_edit = user.clone();
                                let for_delete = user.clone();
                                let last_login = user
                                    .last_login_at
                                    .as_deref()
                                    .map(short_date)
                                    .unwrap_or_else(|| "-".into());
                                view! {
                                    <TableRow
                                        on:click=move |_| editing.set(Some(Some(for_edit.clone())))
                                        attr:style="cursor: pointer;"
                                    >
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <span style="font-weight: 500;">{user.email.clone()}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                {user.full_name.clone().unwrap_or_else(|| "-".into())}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                {if user.is_admin {
                                                    view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Warning>"Administrador"</Badge> }.into_any()
                                                } else {
                                                    view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Informative>"Usuario"</Badge> }.into_any()
                                                }}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                {if user.is_active {
                                                    view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Success>"Activo"</Badge> }.into_any()
                                                } else {
                                                    view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Danger>"Inactivo"</Badge> }.into_any()
                                                }}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{last_login}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{short_date(&user.created_at)}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    size=ButtonSize::Small
                                                    on_click=move |ev: leptos::ev::MouseEvent| {
                                                        ev.stop_propagation();
                                                        remove(for_delete.clone());
                                                    }
                                                >
                                                    {icon("delete")}
                                                </Button>
                                            </TableCellLayout>
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
            </div>

            {move || editing.get().map(|user| view! {
                <UserForm
                    user=user
                    on_close=Callback::new(move |_| editing.set(None))
                    on_saved=Callback::new(move |_| {
                        editing.set(None);
                        load();
                    })
                />
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::short_date;

    #[test]
    fn test_short_date_keeps_day() {
        assert_eq!(short_date("2024-05-01T10:00:00Z"), "2024-05-01");
        assert_eq!(short_date("n/a"), "n/a");
    }
}
