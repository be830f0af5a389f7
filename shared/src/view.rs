//! Result-area rendering.
//!
//! Rendering produces a [`Node`] tree instead of markup. Text only ever lives in
//! [`Node::Text`] and is escaped when serialized with [`Node::to_html`], so no
//! interpolated field can inject markup.

use std::fmt::Write;

use crate::{DayPlan, FreeText, Generated, ItineraryItem, StructuredItinerary};

pub const PROGRESS_MESSAGE: &str = "Generating itinerary…";
pub const FAILURE_MESSAGE: &str = "Failed to generate itinerary. Check console for details.";
pub const EMPTY_MESSAGE: &str = "No data generated.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub class: Option<&'static str>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            class: None,
            children: vec![],
        }
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_owned())
    }
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                if let Some(class) = element.class {
                    let _ = write!(out, " class=\"{}\"", escape_html(class));
                }
                out.push('>');
                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn alert(class: &'static str, message: &str) -> Node {
    Element::new("div").class(class).child(message).into()
}

pub fn progress() -> Node {
    alert("alert alert-info", PROGRESS_MESSAGE)
}

pub fn failure() -> Node {
    alert("alert alert-danger", FAILURE_MESSAGE)
}

pub fn empty() -> Node {
    alert("alert alert-warning", EMPTY_MESSAGE)
}

pub fn render(generated: Option<&Generated>) -> Node {
    match generated {
        None => empty(),
        Some(Generated::FreeText(free_text)) => render_free_text(free_text),
        Some(Generated::Structured(structured)) => render_structured(structured),
    }
}

fn card(children: impl IntoIterator<Item = Node>) -> Node {
    Element::new("div")
        .class("card")
        .child(Element::new("div").class("card-body").children(children))
        .into()
}

fn render_free_text(free_text: &FreeText) -> Node {
    card([Element::new("pre").child(free_text.text.as_str()).into()])
}

fn render_structured(structured: &StructuredItinerary) -> Node {
    let meta = structured.meta.clone().unwrap_or_default();

    let destination = meta
        .destination
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "Trip".to_owned());
    let days = meta
        .days
        .filter(|d| *d != 0)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "?".to_owned());

    let mut body: Vec<Node> = vec![Element::new("h5")
        .child(format!("{destination} — {days} day(s)"))
        .into()];

    if let Some(note) = meta.weather_note.filter(|n| !n.is_empty()) {
        body.push(
            Element::new("p")
                .child(Element::new("strong").child("Weather:"))
                .child(format!(" {note}"))
                .into(),
        );
    }

    let days = structured.itinerary.iter().flatten().map(render_day);
    body.push(Element::new("div").class("list-group").children(days).into());

    card(body)
}

fn render_day(day: &DayPlan) -> Node {
    let label = match day.day {
        Some(n) => format!("Day {n}"),
        None => "Day ?".to_owned(),
    };

    Element::new("div")
        .class("list-group-item")
        .child(Element::new("strong").child(label))
        .child(Element::new("ul").children(day.items.iter().flatten().map(render_item)))
        .into()
}

fn render_item(item: &ItineraryItem) -> Node {
    let time = item.time.as_deref().unwrap_or_default();
    let activity = item.activity.as_deref().unwrap_or_default();

    Element::new("li")
        .child(Element::new("strong").child(format!("{time}:")))
        .child(format!(" {activity}"))
        .into()
}
