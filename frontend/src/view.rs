use shared::controller::{FormInput, FormView};
use shared::view::Node;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Binds the controller to the form inputs and the result-area state.
pub struct PageView {
    pub destination: NodeRef,
    pub days: NodeRef,
    pub interests: NodeRef,
    pub result: UseStateHandle<Option<Node>>,
}

fn input_value(input: &NodeRef) -> String {
    input
        .cast::<HtmlInputElement>()
        .map(|i| i.value())
        .unwrap_or_default()
}

fn set_input_value(input: &NodeRef, value: &str) {
    if let Some(input) = input.cast::<HtmlInputElement>() {
        input.set_value(value);
    }
}

impl FormView for PageView {
    fn read_form(&self) -> FormInput {
        FormInput {
            destination: input_value(&self.destination),
            days: input_value(&self.days),
            interests: input_value(&self.interests),
        }
    }

    fn write_form(&self, input: &FormInput) {
        set_input_value(&self.destination, &input.destination);
        set_input_value(&self.days, &input.days);
        set_input_value(&self.interests, &input.interests);
    }

    fn show(&self, node: Node) {
        self.result.set(Some(node));
    }
}

/// Text children become yew text nodes, which the DOM never parses as markup.
pub fn to_html(node: &Node) -> Html {
    match node {
        Node::Text(text) => html! { <>{ text.clone() }</> },
        Node::Element(element) => html! {
            <@{element.tag.to_string()} class={classes!(element.class)}>
                { for element.children.iter().map(to_html) }
            </@>
        },
    }
}
