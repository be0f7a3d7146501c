use contracts::system::users::{check_password_length, ChangePasswordDto};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::modal::Modal;
use crate::system::users::api;

/// Change the signed-in user's own password (the current one is required)
#[component]
pub fn ChangePasswordForm(user_id: String, on_close: Callback<()>) -> impl IntoView {
    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let done = RwSignal::new(false);

    let on_save = move |_| {
        error.set(None);

        let new_value = new_password.get_untracked();
        if new_value != confirm_password.get_untracked() {
            error.set(Some("Las contraseñas no coinciden".to_string()));
            return;
        }
        if let Err(e) = check_password_length(&new_value) {
            error.set(Some(e));
            return;
        }

        let dto = ChangePasswordDto {
            user_id: user_id.clone(),
            old_password: Some(old_password.get_untracked()),
            new_password: new_value,
        };
        spawn_local(async move {
            match api::change_password(&dto).await {
                Ok(()) => done.set(true),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    view! {
        <Modal title="Cambiar contraseña".to_string() on_close=on_close>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <Show
                when=move || !done.get()
                fallback=|| view! { <div class="alert alert--success">"Contraseña actualizada"</div> }
            >
                <Flex vertical=true gap=FlexGap::Medium>
                    <div class="form__group">
                        <Label>"Contraseña actual"</Label>
                        <Input
                            value=old_password
                            input_type=InputType::Password
                            attr:autocomplete="current-password"
                        />
                    </div>
                    <div class="form__group">
                        <Label>"Nueva contraseña"</Label>
                        <Input
                            value=new_password
                            input_type=InputType::Password
                            attr:autocomplete="new-password"
                        />
                    </div>
                    <div class="form__group">
                        <Label>"Repetir contraseña"</Label>
                        <Input
                            value=confirm_password
                            input_type=InputType::Password
                            attr:autocomplete="new-password"
                        />
                    </div>
                </Flex>
                <div class="details-actions">
                    <Button appearance=ButtonAppearance::Primary on_click=on_save.clone()>
                        "Guardar"
                    </Button>
                </div>
            </Show>
        </Modal>
    }
}
