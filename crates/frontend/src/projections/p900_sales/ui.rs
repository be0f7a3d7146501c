use contracts::projections::p900_sales::dto::{SalesReport, SalesRow, SalesSummary};
use contracts::shared::format::format_money;
use contracts::shared::list::ListQuery;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::api;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::search_box::SearchBox;
use crate::shared::icons::icon;

/// Confirmed budgets with their totals
#[component]
pub fn SalesList() -> impl IntoView {
    let query = RwSignal::new(ListQuery::default());
    let report: RwSignal<Option<SalesReport>> = RwSignal::new(None);
    let error = RwSignal::new(Option::<String>::None);

    Effect::new(move |_| {
        let current = query.get();
        spawn_local(async move {
            match api::fetch_report(current).await {
                Ok(data) => {
                    report.set(Some(data));
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    });

    let summary = move || report.with(|r| r.as_ref().map(|r| r.summary.clone()).unwrap_or_default());
    let field = move |f: fn(&SalesReport) -> u64| {
        Signal::derive(move || report.with(|r| r.as_ref().map(f).unwrap_or(0)))
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Ventas"</h1>
                    <Badge>{move || field(|r| r.total).get().to_string()}</Badge>
                </div>
                <div class="header__actions">
                    <SearchBox
                        placeholder="Buscar por nombre o código"
                        on_search=Callback::new(move |text: String| query.update(|q| {
                            q.q = (!text.trim().is_empty()).then_some(text);
                            q.page = Some(0);
                        }))
                    />
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| query.update(|_| {})>
                        {icon("refresh")}
                        " Actualizar"
                    </Button>
                </div>
            </div>

            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <SummaryCards summary=Signal::derive(summary) />

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
                            <TableHeaderCell min_width=100.0>"Confirmado"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || report.get().map(|r| r.items).unwrap_or_default()
                            key=|row: &SalesRow| row.budget_id.clone()
                            children=move |row: SalesRow| view! {
                                <TableRow>
                                    <TableCell><TableCellLayout>{row.code}</TableCellLayout></TableCell>
                                    <TableCell>
                                        <TableCellLayout truncate=true>{row.description}</TableCellLayout>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout><span class="cell-number">{row.line_count}</span></TableCellLayout>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout><span class="cell-number">{format_money(row.cost)}</span></TableCellLayout>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout>
                                            <span class="cell-number">{format_money(row.sales_price)}</span>
                                        </TableCellLayout>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout>
                                            <span class="cell-number" class:cell-number--negative=row.margin < 0.0>
                                                {format_money(row.margin)}
                                            </span>
                                        </TableCellLayout>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout>{row.updated_at.get(..10).unwrap_or_default().to_string()}</TableCellLayout>
                                    </TableCell>
                                </TableRow>
                            }
                        />
                    </TableBody>
                </Table>
            </div>

            <PaginationControls
                current_page=field(|r| r.page)
                total_pages=field(|r| r.total_pages)
                total_count=field(|r| r.total)
                page_size=Signal::derive(move || query.with(|q| q.page_size()))
                on_page_change=Callback::new(move |page| query.update(|q| q.page = Some(page)))
                on_page_size_change=Callback::new(move |size| query.update(|q| {
                    q.page_size = Some(size);
                    q.page = Some(0);
                }))
            />
        </div>
    }
}

#[component]
fn SummaryCards(#[prop(into)] summary: Signal<SalesSummary>) -> impl IntoView {
    let card = move |label: &'static str, value: Signal<String>| {
        view! {
            <Card>
                <span class="stat-card__label">{label}</span>
                <span class="stat-card__value">{move || value.get()}</span>
            </Card>
        }
    };

    view! {
        <div class="stat-cards">
            {card("Ventas", Signal::derive(move || summary.get().count.to_string()))}
            {card("Costo total", Signal::derive(move || format_money(summary.get().total_cost)))}
            {card("Total vendido", Signal::derive(move || format_money(summary.get().total_sales)))}
            {card("Margen total", Signal::derive(move || format_money(summary.get().total_margin)))}
        </div>
    }
}
