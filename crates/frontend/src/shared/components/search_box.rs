use leptos::prelude::*;
use thaw::*;

/// Text filter applied with the search button and reset with the clear one
#[component]
pub fn SearchBox(
    #[prop(into)] placeholder: String,
    on_search: Callback<String>,
) -> impl IntoView {
    let text = RwSignal::new(String::new());

    view! {
        <Flex gap=FlexGap::Small align=FlexAlign::End>
            <div class="search-box">
                <Input value=text placeholder=placeholder input_type=InputType::Search />
            </div>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=move |_| on_search.run(text.get_untracked().trim().to_string())
            >
                "Buscar"
            </Button>
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| {
                    text.set(String::new());
                    on_search.run(String::new());
                }
            >
                "Limpiar"
            </Button>
        </Flex>
    }
}
