use crate::domain::a003_budget::api;
use crate::domain::a003_budget::ui::details::BudgetDetails;
use crate::shared::api_utils::confirm;
use crate::shared::components::search_box::SearchBox;
use crate::shared::icons::icon;
use crate::shared::paged_list::PagedList;
use contracts::domain::a003_budget::aggregate::{Budget, BudgetStatusInfo};
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::format::format_money;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Pending and rejected budgets. Confirming one moves it to the sales view.
#[component]
#[allow(non_snake_case)]
pub fn BudgetList() -> impl IntoView {
    let list = PagedList::new(api::fetch_page);
    let statuses: RwSignal<Vec<BudgetStatusInfo>> = RwSignal::new(Vec::new());
    let editing: RwSignal<Option<Option<String>>> = RwSignal::new(None);

    spawn_local(async move {
        match api::fetch_statuses().await {
            Ok(data) => statuses.set(data),
            Err(e) => list.error.set(Some(e)),
        }
    });

    let change_status = move |id: String, status_id: i32| {
        spawn_local(async move {
            match api::change_status(&id, status_id).await {
                Ok(()) => list.reload(),
                Err(e) => list.error.set(Some(e)),
            }
        });
    };

    let remove = move |id: String, name: String| {
        if !confirm(&format!("¿Eliminar el presupuesto {}? El stock de sus materiales se repone.", name)) {
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
                    <h1 class="header__title">{Budget::list_name()}</h1>
                    <Badge>{move || list.total().to_string()}</Badge>
                </div>
                <div class="header__actions">
                    <SearchBox
                        placeholder="Buscar por nombre o código"
                        on_search=Callback::new(move |text| list.search(text))
                    />
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| editing.set(Some(None))>
                        {icon("plus")}
                        " Nuevo presupuesto"
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
                            <TableHeaderCell min_width=80.0>"Materiales"</TableHeaderCell>
                            <TableHeaderCell min_width=100.0>"Costo"</TableHeaderCell>
                            <TableHeaderCell min_width=110.0>"Precio de venta"</TableHeaderCell>
                            <TableHeaderCell min_width=100.0>"Margen"</TableHeaderCell>
                            <TableHeaderCell min_width=150.0>"Estado"</TableHeaderCell>
                            <TableHeaderCell min_width=60.0></TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || list.items()
                            key=|b: &Budget| (b.base.id.as_string(), b.base.metadata.version)
                            children=move |budget: Budget| {
                                let id = budget.base.id.as_string();
                                let id_for_edit = id.clone();
                                let id_for_status = id.clone();
                                let name = budget.base.description.clone();
                                let cost = budget.cost();
                                let margin = budget.margin();
                                let current_status = budget.status.id();

                                let status_value = RwSignal::new(current_status.to_string());
                                Effect::new(move |_| {
                                    let picked = status_value.get().parse().unwrap_or(current_status);
                                    if picked != current_status {
                                        change_status(id_for_status.clone(), picked);
                                    }
                                });

                                view! {
                                    <TableRow
                                        on:click=move |_| editing.set(Some(Some(id_for_edit.clone())))
                                        attr:style="cursor: pointer;"
                                    >
                                        <TableCell><TableCellLayout>{budget.base.code.clone()}</TableCellLayout></TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{budget.base.description.clone()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class="cell-number">{budget.lines.len()}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class="cell-number">{format_money(cost)}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class="cell-number">{format_money(budget.sales_price)}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class="cell-number" class:cell-number--negative=margin < 0.0>
                                                    {format_money(margin)}
                                                </span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <div on:click=|ev| ev.stop_propagation()>
                                                <Select value=status_value size=SelectSize::Small>
                                                    {move || statuses.get().into_iter().map(|s| view! {
                                                        <option value=s.id.to_string() selected=s.id == current_status>
                                                            {s.name}
                                                        </option>
                                                    }).collect_view()}
                                                </Select>
                                            </div>
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
                <BudgetDetails
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
