use super::view_model::MaterialDetailsViewModel;
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use contracts::shared::format::format_money;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn MaterialDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = MaterialDetailsViewModel::new();
    vm.load_if_needed(id);

    let title = Signal::derive(move || {
        if vm.is_edit_mode() { "Editar material" } else { "Nuevo material" }.to_string()
    });

    view! {
        <Modal title=title on_close=on_cancel>
            <div class="details-container material-details">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <Flex vertical=true gap=FlexGap::Medium>
                    <div class="form__group">
                        <Label>"Nombre"</Label>
                        <Input value=vm.description placeholder="Ej. Hojas" />
                    </div>

                    <Flex gap=FlexGap::Medium>
                        <div class="form__group">
                            <Label>"Cantidad"</Label>
                            <Input value=vm.quantity input_type=InputType::Number attr:min="1" />
                        </div>
                        <div class="form__group">
                            <Label>"Stock"</Label>
                            <Input
                                value=vm.stock
                                input_type=InputType::Number
                                placeholder="Stock inicial igual a la cantidad"
                                attr:min="0"
                            />
                        </div>
                    </Flex>

                    <Flex gap=FlexGap::Medium align=FlexAlign::End>
                        <div class="form__group">
                            <Label>"Precio"</Label>
                            <Input
                                value=vm.price
                                input_type=InputType::Number
                                attr:min="0"
                                attr:step="0.01"
                            />
                        </div>
                        <div class="form__group">
                            <Label>"Precio unitario"</Label>
                            <div class="form-value">{move || format_money(vm.unit_price())}</div>
                        </div>
                    </Flex>

                    <div class="form__group">
                        <Label>"Comentario"</Label>
                        <Textarea value=vm.comment />
                    </div>
                </Flex>

                <Flex gap=FlexGap::Small class="details-actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || vm.is_saving.get())
                        on_click=move |_| vm.save_command(on_saved)
                    >
                        {icon("save")}
                        " Guardar"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                        "Cancelar"
                    </Button>
                </Flex>
            </div>
        </Modal>
    }
}
