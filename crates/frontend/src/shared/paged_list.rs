use contracts::shared::list::{ListQuery, PaginatedResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

use crate::shared::components::pagination_controls::PaginationControls;

/// Query and current page of a server-paginated list
pub struct PagedList<T: Send + Sync + 'static> {
    pub query: RwSignal<ListQuery>,
    pub page: RwSignal<Option<PaginatedResponse<T>>>,
    pub error: RwSignal<Option<String>>,
}

impl<T: Send + Sync + 'static> Clone for PagedList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for PagedList<T> {}

impl<T: Clone + Send + Sync + 'static> PagedList<T> {
    /// Fetches again whenever the query changes
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn(ListQuery) -> Fut + 'static,
        Fut: Future<Output = Result<PaginatedResponse<T>, String>> + 'static,
    {
        let list = Self {
            query: RwSignal::new(ListQuery::default()),
            page: RwSignal::new(None),
            error: RwSignal::new(None),
        };
        Effect::new(move |_| {
            let request = fetch(list.query.get());
            spawn_local(async move {
                match request.await {
                    Ok(page) => {
                        list.page.set(Some(page));
                        list.error.set(None);
                    }
                    Err(e) => list.error.set(Some(e)),
                }
            });
        });
        list
    }

    pub fn reload(&self) {
        self.query.update(|_| {});
    }

    pub fn search(&self, text: String) {
        self.query.update(|q| {
            q.q = (!text.trim().is_empty()).then_some(text);
            q.page = Some(0);
        });
    }

    pub fn items(&self) -> Vec<T> {
        self.page
            .get()
            .map(|p| p.items)
            .unwrap_or_default()
    }

    pub fn total(&self) -> u64 {
        self.page.with(|p| p.as_ref().map(|p| p.total).unwrap_or(0))
    }

    pub fn pagination(&self) -> impl IntoView {
        let list = *self;
        let field = move |f: fn(&PaginatedResponse<T>) -> u64| {
            Signal::derive(move || list.page.with(|p| p.as_ref().map(f).unwrap_or(0)))
        };
        view! {
            <PaginationControls
                current_page=field(|p| p.page)
                total_pages=field(|p| p.total_pages)
                total_count=field(|p| p.total)
                page_size=Signal::derive(move || list.query.with(|q| q.page_size()))
                on_page_change=Callback::new(move |page| list.query.update(|q| q.page = Some(page)))
                on_page_size_change=Callback::new(move |size| list.query.update(|q| {
                    q.page_size = Some(size);
                    q.page = Some(0);
                }))
            />
        }
    }
}
