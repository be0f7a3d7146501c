use super::view_model::{BudgetDetailsViewModel, FormLine};
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use crate::shared::parse_number;
use contracts::domain::common::AggregateId;
use contracts::shared::format::format_money;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn BudgetDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = BudgetDetailsViewModel::new();
    vm.load(id);

    let title = Signal::derive(move || {
        if vm.is_edit_mode() { "Editar presupuesto" } else { "Nuevo presupuesto" }.to_string()
    });

    view! {
        <Modal title=title on_close=on_cancel>
            <div class="details-container budget-details">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <Flex vertical=true gap=FlexGap::Medium>
                    <div class="form__group">
                        <Label>"Nombre"</Label>
                        <Input value=vm.description placeholder="Ej. 100 cuadernos A5" />
                    </div>

                    <div class="form__group">
                        <Label>"Comentario"</Label>
                        <Textarea value=vm.comment />
                    </div>

                    <Flex gap=FlexGap::Small align=FlexAlign::End>
                        <div class="form__group material-picker__select">
                            <Label>"Material"</Label>
                            <Select value=vm.picked_material>
                                <option value="">"Selecciona un material"</option>
                                {move || vm.materials.get().into_iter().map(|m| {
                                    let id = m.base.id.as_string();
                                    let label = format!(
                                        "{} (stock: {}, {} c/u)",
                                        m.base.description,
                                        m.stock,
                                        format_money(m.unit_price)
                                    );
                                    view! { <option value=id>{label}</option> }
                                }).collect_view()}
                            </Select>
                        </div>
                        <div class="form__group">
                            <Label>"Cantidad"</Label>
                            <Input value=vm.picked_quantity input_type=InputType::Number attr:min="1" />
                        </div>
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| vm.add_picked()>
                            {icon("plus")}
                            " Agregar"
                        </Button>
                    </Flex>

                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell min_width=160.0>"Material"</TableHeaderCell>
                                <TableHeaderCell min_width=90.0>"Cantidad"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"Precio unitario"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"Subtotal"</TableHeaderCell>
                                <TableHeaderCell min_width=50.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || vm.lines.get()
                                key=|line: &FormLine| line.material_id.clone()
                                children=move |line: FormLine| {
                                    let id_for_qty = line.material_id.clone();
                                    let id_for_subtotal = line.material_id.clone();
                                    let id_for_remove = line.material_id.clone();
                                    let quantity = RwSignal::new(line.quantity.to_string());
                                    Effect::new(move |_| {
                                        vm.set_line_quantity(&id_for_qty, parse_number(&quantity.get()));
                                    });
                                    let subtotal = move || {
                                        vm.lines.with(|lines| {
                                            lines
                                                .iter()
                                                .find(|l| l.material_id == id_for_subtotal)
                                                .map(FormLine::subtotal)
                                                .unwrap_or_default()
                                        })
                                    };
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{line.material_name}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Input
                                                    value=quantity
                                                    input_type=InputType::Number
                                                    attr:min="1"
                                                />
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class="cell-number">{format_money(line.unit_price)}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class="cell-number">{move || format_money(subtotal())}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    size=ButtonSize::Small
                                                    on_click=move |_| vm.remove_line(&id_for_remove)
                                                >
                                                    {icon("delete")}
                                                </Button>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>

                    <Flex gap=FlexGap::Medium align=FlexAlign::End>
                        <div class="form__group">
                            <Label>"Costo total"</Label>
                            <div class="form-value">{move || format_money(vm.cost())}</div>
                        </div>
                        <div class="form__group">
                            <Label>"Precio de venta"</Label>
                            <Input
                                value=vm.sales_price
                                input_type=InputType::Number
                                attr:min="0"
                                attr:step="0.01"
                            />
                        </div>
                        <div class="form__group">
                            <Label>"Margen"</Label>
                            <div class="form-value" class:form-value--negative=move || vm.margin() < 0.0>
                                {move || format_money(vm.margin())}
                            </div>
                        </div>
                    </Flex>
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
