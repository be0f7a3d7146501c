use crate::shared::icons::icon;
use contracts::shared::list::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use leptos::prelude::*;

/// Page navigation for lists backed by `PaginatedResponse` (0-based pages)
#[component]
pub fn PaginationControls(
    #[prop(into)] current_page: Signal<u64>,
    #[prop(into)] total_pages: Signal<u64>,
    #[prop(into)] total_count: Signal<u64>,
    #[prop(into)] page_size: Signal<u64>,
    on_page_change: Callback<u64>,
    on_page_size_change: Callback<u64>,
) -> impl IntoView {
    let page_size_opts = [DEFAULT_PAGE_SIZE, 100, 200, MAX_PAGE_SIZE];
    let is_last = move || current_page.get() + 1 >= total_pages.get();

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page > 0 {
                        on_page_change.run(page - 1);
                    }
                }
                disabled=move || current_page.get() == 0
                title="Página anterior"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || {
                    format!(
                        "{} / {} ({})",
                        current_page.get() + 1,
                        total_pages.get().max(1),
                        total_count.get()
                    )
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    if !is_last() {
                        on_page_change.run(current_page.get() + 1);
                    }
                }
                disabled=is_last
                title="Página siguiente"
            >
                {icon("chevron-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    let val = event_target_value(&ev).parse().unwrap_or(DEFAULT_PAGE_SIZE);
                    on_page_size_change.run(val);
                }
                prop:value=move || page_size.get().to_string()
            >
                {page_size_opts.iter().map(|&size| {
                    view! {
                        <option value={size.to_string()} selected=move || page_size.get() == size>
                            {size.to_string()}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}
