use contracts::system::users::{CreateUserDto, UpdateUserDto, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::modal::Modal;
use crate::system::users::api;

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Create (`user = None`) or edit a user.
/// On edit a non-empty password resets it.
#[component]
pub fn UserForm(user: Option<User>, on_close: Callback<()>, on_saved: Callback<()>) -> impl IntoView {
    let editing_id = user.as_ref().map(|u| u.id.clone());
    let is_edit = editing_id.is_some();

    let email = RwSignal::new(user.as_ref().map(|u| u.email.clone()).unwrap_or_default());
    let full_name = RwSignal::new(
        user.as_ref()
            .and_then(|u| u.full_name.clone())
            .unwrap_or_default(),
    );
    let password = RwSignal::new(String::new());
    let is_admin = RwSignal::new(user.as_ref().map(|u| u.is_admin).unwrap_or(false));
    let is_active = RwSignal::new(user.as_ref().map(|u| u.is_active).unwrap_or(true));
    let error = RwSignal::new(Option::<String>::None);
    let is_saving = RwSignal::new(false);

    let on_save = move |_| {
        is_saving.set(true);
        error.set(None);

        let editing_id = editing_id.clone();
        spawn_local(async move {
            let result = match editing_id {
                Some(id) => {
                    let dto = UpdateUserDto {
                        id,
                        email: email.get_untracked(),
                        full_name: optional(full_name.get_untracked()),
                        is_active: is_active.get_untracked(),
                        is_admin: is_admin.get_untracked(),
                        password: optional(password.get_untracked()),
                    };
                    api::update_user(&dto).await
                }
                None => {
                    let dto = CreateUserDto {
                        email: email.get_untracked(),
                        password: password.get_untracked(),
                        full_name: optional(full_name.get_untracked()),
                        is_admin: is_admin.get_untracked(),
                    };
                    api::create_user(&dto).await.map(|_| ())
                }
            };
            is_saving.set(false);
            match result {
                Ok(()) => on_saved.run(()),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let title = if is_edit { "Editar usuario" } else { "Nuevo usuario" };
    let disabled = Signal::derive(move || is_saving.get());

    view! {
        <Modal title=title.to_string() on_close=on_close>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <Flex vertical=true gap=FlexGap::Medium>
                <div class="form__group">
                    <Label>"Email *"</Label>
                    <Input value=email input_type=InputType::Email disabled=disabled />
                </div>

                <div class="form__group">
                    <Label>"Nombre"</Label>
                    <Input value=full_name disabled=disabled />
                </div>

                <div class="form__group">
                    <Label>
                        {if is_edit { "Nueva contraseña (opcional)" } else { "Contraseña *" }}
                    </Label>
                    <Input
                        value=password
                        input_type=InputType::Password
                        disabled=disabled
                        attr:autocomplete="new-password"
                    />
                </div>

                <div class="form__group">
                    <Checkbox checked=is_admin label="Administrador" />
                </div>

                <Show when=move || is_edit>
                    <div class="form__group">
                        <Checkbox checked=is_active label="Activo" />
                    </div>
                </Show>
            </Flex>

            <div class="details-actions">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(()) disabled=disabled>
                    "Cancelar"
                </Button>
                <Button appearance=ButtonAppearance::Primary on_click=on_save disabled=disabled>
                    {move || if is_saving.get() { "Guardando..." } else { "Guardar" }}
                </Button>
            </div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::optional;

    #[test]
    fn test_optional_trims_and_drops_blank() {
        assert_eq!(optional("  Ana ".into()), Some("Ana".into()));
        assert_eq!(optional("   ".into()), None);
    }
}
