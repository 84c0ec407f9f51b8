//! Stateless views
//!
//! A view turns a data snapshot into a [`Node`] tree. Nodes carry the
//! [`ViewIntent`] a click or input should raise, so the host only has to
//! forward user actions to the broker. Nothing here reads a model.

pub mod basket;
pub mod card;
pub mod form;
pub mod layout;

use std::cell::RefCell;
use std::fmt::Write as _;

use rust_decimal::Decimal;

use crate::config::ShopConfig;
use crate::domain::events::ViewIntent;

pub use basket::{BasketData, BasketPanel};
pub use card::{BasketCard, CatalogCard, PreviewButton, PreviewCard, PreviewData};
pub use form::{ContactsForm, ContactsFormData, OrderForm, OrderFormData};
pub use layout::{Gallery, Header, ModalShell, SuccessData, SuccessPanel};

/// Text input whose edits become an intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputBinding {
    Address,
    Email,
    Phone,
}

impl InputBinding {
    pub fn intent(&self, value: impl Into<String>) -> ViewIntent {
        let value = value.into();
        match self {
            Self::Address => ViewIntent::AddressChange { address: value },
            Self::Email => ViewIntent::EmailChange { email: value },
            Self::Phone => ViewIntent::PhoneChange { phone: value },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub attrs: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<Node>,
    pub disabled: bool,
    pub on_click: Option<ViewIntent>,
    pub on_input: Option<InputBinding>,
}

impl Node {
    pub fn new(tag: &'static str) -> Self { Self { tag, ..Self::default() } }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn class_if(self, condition: bool, class: impl Into<String>) -> Self {
        if condition { self.class(class) } else { self }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_click(mut self, intent: ViewIntent) -> Self {
        self.on_click = Some(intent);
        self
    }

    pub fn on_input(mut self, binding: InputBinding) -> Self {
        self.on_input = Some(binding);
        self
    }

    pub fn has_class(&self, class: &str) -> bool { self.classes.iter().any(|c| c == class) }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    /// First node in document order carrying `class`.
    pub fn find(&self, class: &str) -> Option<&Node> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(class))
    }

    pub fn find_all(&self, class: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect(class, &mut found);
        found
    }

    fn collect<'a>(&'a self, class: &str, found: &mut Vec<&'a Node>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect(class, found);
        }
    }

    pub fn text_of(&self, class: &str) -> Option<&str> { self.find(class).and_then(|n| n.text.as_deref()) }

    /// The intent a click raises; disabled controls raise nothing.
    pub fn click(&self) -> Option<ViewIntent> {
        if self.disabled { None } else { self.on_click.clone() }
    }

    pub fn input(&self, value: impl Into<String>) -> Option<ViewIntent> {
        if self.disabled { None } else { self.on_input.map(|b| b.intent(value)) }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        if let Some(intent) = &self.on_click {
            let _ = write!(out, " data-intent=\"{}\"", intent.name());
        }
        if self.disabled {
            out.push_str(" disabled");
        }
        out.push('>');
        if matches!(self.tag, "img" | "input") {
            return;
        }
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Presentation settings shared by the views.
#[derive(Clone, Debug)]
pub struct ViewConfig {
    pub cdn_url: String,
    pub currency: String,
}

impl ViewConfig {
    pub fn from_config(config: &ShopConfig) -> Self {
        Self {
            cdn_url: config.cdn_url.as_str().trim_end_matches('/').to_string(),
            currency: config.currency_label.clone(),
        }
    }

    pub fn price(&self, price: Option<Decimal>) -> String {
        match price {
            Some(p) => format!("{p} {}", self.currency),
            None => "Priceless".to_string(),
        }
    }

    pub fn image(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.cdn_url, path.trim_start_matches('/'))
        }
    }

    pub fn category_class(&self, category: &str) -> &'static str {
        match category.trim().to_lowercase().as_str() {
            "soft skill" | "софт-скил" => "card__category_soft",
            "hard skill" | "хард-скил" => "card__category_hard",
            "additional" | "дополнительное" => "card__category_additional",
            "button" | "кнопка" => "card__category_button",
            _ => "card__category_other",
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self { Self::from_config(&ShopConfig::default()) }
}

/// Where rendered trees are mounted. Only one modal is ever visible;
/// showing a new one replaces the previous content.
pub trait Screen {
    fn mount_gallery(&self, node: Node);
    fn mount_header(&self, node: Node);
    fn show_modal(&self, node: Node);
    fn hide_modal(&self);
}

/// Keeps the latest mounted trees in memory.
#[derive(Debug, Default)]
pub struct MemoryScreen {
    gallery: RefCell<Option<Node>>,
    header: RefCell<Option<Node>>,
    modal: RefCell<Option<Node>>,
}

impl MemoryScreen {
    pub fn new() -> Self { Self::default() }

    pub fn gallery(&self) -> Option<Node> { self.gallery.borrow().clone() }
    pub fn header(&self) -> Option<Node> { self.header.borrow().clone() }
    pub fn modal(&self) -> Option<Node> { self.modal.borrow().clone() }
    pub fn is_modal_open(&self) -> bool { self.modal.borrow().is_some() }

    pub fn to_html(&self) -> String {
        let mut page = String::new();
        for slot in [&self.header, &self.gallery, &self.modal] {
            if let Some(node) = slot.borrow().as_ref() {
                page.push_str(&node.to_html());
                page.push('\n');
            }
        }
        page
    }
}

impl Screen for MemoryScreen {
    fn mount_gallery(&self, node: Node) { *self.gallery.borrow_mut() = Some(node); }
    fn mount_header(&self, node: Node) { *self.header.borrow_mut() = Some(node); }
    fn show_modal(&self, node: Node) { *self.modal.borrow_mut() = Some(node); }
    fn hide_modal(&self) { self.modal.borrow_mut().take(); }
}
