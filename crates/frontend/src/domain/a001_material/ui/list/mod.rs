use crate::domain::a001_material::api;
use crate::domain::a001_material::ui::details::MaterialDetails;
use crate::shared::api_utils::confirm;
use crate::shared::components::search_box::SearchBox;
use crate::shared::icons::icon;
use crate::shared::paged_list::PagedList;
use contracts::domain::a001_material::aggregate::Material;
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::format::format_money;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[derive(Clone, Debug)]
pub struct MaterialRow {
    pub id: String,
    pub code: String,
    pub description: String,
    pub stock: i32,
    pub quantity: i32,
    pub price: String,
    pub unit_price: String,
}

impl From<Material> for MaterialRow {
    fn from(m: Material) -> Self {
        Self {
            id: m.base.id.as_string(),
            code: m.base.code,
            description: m.base.description,
            stock: m.stock,
            quantity: m.quantity,
            price: format_money(m.price),
            unit_price: format_money(m.unit_price),
        }
    }
}

#[component]
#[allow(non_snake_case)]
pub fn MaterialList() -> impl IntoView {
    let list = PagedList::new(api::fetch_page);
    // None: closed, Some(None): new, Some(Some(id)): edit
    let editing: RwSignal<Option<Option<String>>> = RwSignal::new(None);

    let remove = move |row: MaterialRow| {
        if !confirm(&format!("¿Eliminar {}?", row.description)) {
            return;
        }
        spawn_local(async move {
            match api::delete(&row.id).await {
                Ok(()) => list.reload(),
                Err(e) => list.error.set(Some(e)),
            }
        });
    };

    let load_test_data = move || {
        spawn_local(async move {
            match api::insert_test_data().await {
                Ok(()) => list.reload(),
                Err(e) => list.error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{Material::list_name()}</h1>
                    <Badge>{move || list.total().to_string()}</Badge>
                </div>
                <div class="header__actions">
                    <SearchBox
                        placeholder="Buscar por nombre o código"
                        on_search=Callback::new(move |text| list.search(text))
                    />
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| editing.set(Some(None))>
                        {icon("plus")}
                        " Nuevo material"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| list.reload()>
                        {icon("refresh")}
                        " Actualizar"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load_test_data()>
                        "Datos de prueba"
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
                            <TableHeaderCell min_width=80.0>"Stock"</TableHeaderCell>
                            <TableHeaderCell min_width=80.0>"Cantidad"</TableHeaderCell>
                            <TableHeaderCell min_width=100.0>"Precio"</TableHeaderCell>
                            <TableHeaderCell min_width=110.0>"Precio unitario"</TableHeaderCell>
                            <TableHeaderCell min_width=60.0></TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each={move || list.items().into_iter().map(MaterialRow::from).collect::<Vec<_>>()}
                            key=|row| (row.id.clone(), row.stock, row.price.clone(), row.description.clone())
                            children=move |row| {
                                let id = row.id.clone();
                                let for_delete = row.clone();
                                view! {
                                    <TableRow
                                        on:click=move |_| editing.set(Some(Some(id.clone())))
                                        attr:style="cursor: pointer;"
                                    >
                                        <TableCell><TableCellLayout>{row.code}</TableCellLayout></TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{row.description}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                {if row.stock == 0 {
                                                    view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Warning>"0"</Badge> }.into_any()
                                                } else {
                                                    view! { <span class="cell-number">{row.stock}</span> }.into_any()
                                                }}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout><span class="cell-number">{row.quantity}</span></TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout><span class="cell-number">{row.price}</span></TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout><span class="cell-number">{row.unit_price}</span></TableCellLayout>
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

            {list.pagination()}

            {move || editing.get().map(|id| view! {
                <MaterialDetails
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
