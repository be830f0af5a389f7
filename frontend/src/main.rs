use shared::controller::ItineraryController;
use shared::view::Node;
use yew::prelude::*;

mod console;
mod rpc;
mod view;

/// Base URL of the itinerary service, fixed at build time. Empty means the
/// service is served from the same origin as the page.
fn api_base() -> &'static str {
    option_env!("TRAVELGPT_API_BASE").unwrap_or("")
}

#[function_component]
fn App() -> Html {
    let destination = use_node_ref();
    let days = use_node_ref();
    let interests = use_node_ref();

    let result: UseStateHandle<Option<Node>> = use_state(|| None);

    let controller = {
        let view = view::PageView {
            destination: destination.clone(),
            days: days.clone(),
            interests: interests.clone(),
            result: result.clone(),
        };
        use_memo(
            move |_| ItineraryController::new(rpc::Client::new(api_base()), view),
            (),
        )
    };

    let onsample = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| controller.populate_sample())
    };

    let onsubmit = {
        let controller = controller.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                controller.submit().await;
            });
        })
    };

    html! {
        <div class="container py-4">
            <h1 class="mb-4">{ "TravelGPT" }</h1>
            <form id="planForm" {onsubmit}>
                <div class="mb-3">
                    <label class="form-label">{ "Destination" }</label>
                    <input ref={destination} id="destination" class="form-control" type="text" placeholder="Lisbon, Portugal" />
                </div>
                <div class="mb-3">
                    <label class="form-label">{ "Days" }</label>
                    <input ref={days} id="days" class="form-control" type="number" min="1" placeholder="3" />
                </div>
                <div class="mb-3">
                    <label class="form-label">{ "Interests" }</label>
                    <input ref={interests} id="interests" class="form-control" type="text" placeholder="culture, food" />
                </div>
                <button type="submit" class="btn btn-primary me-2">{ "Plan my trip" }</button>
                <button id="sample" type="button" class="btn btn-outline-secondary" onclick={onsample}>{ "Try a sample" }</button>
            </form>
            <div id="resultArea" class="mt-4">
                { for (*result).as_ref().map(view::to_html) }
            </div>
        </div>
    }
}

fn main() {
    console::init();
    tracing::info!(api_base = api_base(), "travelgpt frontend starting");

    yew::Renderer::<App>::new().render();
}
