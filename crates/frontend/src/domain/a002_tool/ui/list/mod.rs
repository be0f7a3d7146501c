use crate::domain::a002_tool::api;
use crate::domain::a002_tool::ui::details::ToolDetails;
use crate::shared::api_utils::confirm;
use crate::shared::components::search_box::SearchBox;
use crate::shared::icons::icon;
use crate::shared::paged_list::PagedList;
use contracts::domain::a002_tool::aggregate::Tool;
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::format::format_money;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
#[allow(non_snake_case)]
pub fn ToolList() -> impl IntoView {
    let list = PagedList::new(api::fetch_page);
    let editing: RwSignal<Option<Option<String>>> = RwSignal::new(None);

    let remove = move |id: String, name: String| {
        if !confirm(&format!("¿Eliminar {}?", name)) {
            return;
        }
        spawn_local(async move {
            match api::delete(&id).await {
                Ok(()) => list.reload(),
                Err(e) => list.error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{Tool::list_name()}</h1>
                    <Badge>{move || list.total().to_string()}</Badge>
                </div>
                <div class="header__actions">
                    <SearchBox
                        placeholder="Buscar por nombre o código"
                        on_search=Callback::new(move |text| list.search(text))
                    />
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| editing.set(Some(None))>
                        {icon("plus")}
                        " Nueva herramienta"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| list.reload()>
                        {icon("refresh")}
                        " Actualizar"
                    </Button>
                </div>
            </div>

            {move || list.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="table-wrapper">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell min_width=110.0>"Código"</TableHeaderCell>
                            <TableHeaderCell min_width=180.0>"Nombre"</TableHeaderCell>
                            <TableHeaderCell min_width=80.0>"Cantidad"</TableHeaderCell>
                            <TableHeaderCell min_width=110.0>"Precio unitario"</TableHeaderCell>
                            <TableHeaderCell min_width=110.0>"Total"</TableHeaderCell>
                            <TableHeaderCell min_width=60.0></TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || list.items()
                            key=|t: &Tool| (t.base.id.as_string(), t.base.metadata.version)
                            children=move |tool: Tool| {
                                let id = tool.base.id.as_string();
                                let id_for_edit = id.clone();
                                let name = tool.base.description.clone();
                                view! {
                                    <TableRow
                                        on:click=move |_| editing.set(Some(Some(id_for_edit.clone())))
                                        attr:style="cursor: pointer;"
                                    >
                                        <TableCell><TableCellLayout>{tool.base.code}</TableCellLayout></TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{tool.base.description}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout><span class="cell-number">{tool.quantity}</span></TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class="cell-number">{format_money(tool.unit_price)}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class="cell-number">{format_money(tool.total_price)}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    size=ButtonSize::Small
                                                    on_click=move |ev: leptos::ev::MouseEvent| {
                                                        ev.stop_propagation();
                                                        remove(id.clone(), name.clone());
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

            {list.pagination()}

            {move || editing.get().map(|id| view! {
                <ToolDetails
                    id=id
                    on_saved=Callback::new(move |_| {
                        editing.set(None);
                        list.reload();
                    })
                    on_cancel=Callback::new(move |_| editing.set(None))
                />
            })}
        </div>
    }
}
