use crate::domain::a002_tool::api;
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use crate::shared::parse_number;
use contracts::domain::a002_tool::aggregate::{Tool, ToolDto};
use contracts::domain::common::AggregateId;
use contracts::shared::format::format_money;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn ToolDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let existing: RwSignal<Option<(String, String)>> = RwSignal::new(None);
    let description = RwSignal::new(String::new());
    let comment = RwSignal::new(String::new());
    let quantity = RwSignal::new(String::new());
    let unit_price = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let is_edit = id.is_some();

    if let Some(existing_id) = id {
        spawn_local(async move {
            match api::fetch_by_id(&existing_id).await {
                Ok(tool) => {
                    existing.set(Some((tool.base.id.as_string(), tool.base.code)));
                    description.set(tool.base.description);
                    comment.set(tool.base.comment.unwrap_or_default());
                    quantity.set(tool.quantity.to_string());
                    unit_price.set(tool.unit_price.to_string());
                }
                Err(e) => error.set(Some(format!("Error al cargar: {}", e))),
            }
        });
    }

    let total = move || {
        Tool::compute_total_price(parse_number(&quantity.get()), parse_number(&unit_price.get()))
    };

    let save = move || {
        let (id, code) = existing.get_untracked().unzip();
        let text = comment.get_untracked();
        let dto = ToolDto {
            id,
            code,
            description: description.get_untracked(),
            comment: (!text.trim().is_empty()).then_some(text),
            quantity: parse_number(&quantity.get_untracked()),
            unit_price: parse_number(&unit_price.get_untracked()),
        };
        spawn_local(async move {
            match api::save(&dto).await {
                Ok(_) => on_saved.run(()),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let title = if is_edit { "Editar herramienta" } else { "Nueva herramienta" };

    view! {
        <Modal title=title.to_string() on_close=on_cancel>
            <div class="details-container tool-details">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <Flex vertical=true gap=FlexGap::Medium>
                    <div class="form__group">
                        <Label>"Nombre"</Label>
                        <Input value=description />
                    </div>
                    <Flex gap=FlexGap::Medium align=FlexAlign::End>
                        <div class="form__group">
                            <Label>"Cantidad"</Label>
                            <Input value=quantity input_type=InputType::Number attr:min="1" />
                        </div>
                        <div class="form__group">
                            <Label>"Precio unitario"</Label>
                            <Input
                                value=unit_price
                                input_type=InputType::Number
                                attr:min="0"
                                attr:step="0.01"
                            />
                        </div>
                        <div class="form__group">
                            <Label>"Total"</Label>
                            <div class="form-value">{move || format_money(total())}</div>
                        </div>
                    </Flex>
                    <div class="form__group">
                        <Label>"Comentario"</Label>
                        <Textarea value=comment />
                    </div>
                </Flex>

                <Flex gap=FlexGap::Small class="details-actions">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| save()>
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
