//! Page chrome: gallery, header badge, modal shell and the success panel

use std::rc::Rc;

use rust_decimal::Decimal;

use crate::domain::events::ViewIntent;
use crate::view::{Node, ViewConfig};

#[derive(Clone, Copy, Debug, Default)]
pub struct Gallery;

impl Gallery {
    pub fn render(&self, cards: Vec<Node>) -> Node { Node::new("main").class("gallery").children(cards) }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Header;

impl Header {
    pub fn render(&self, counter: usize) -> Node {
        Node::new("header").class("header").child(
            Node::new("button")
                .class("header__basket")
                .on_click(ViewIntent::BasketOpen)
                .child(Node::new("span").class("header__basket-counter").text(counter.to_string())),
        )
    }
}

/// Wraps modal content with the close control.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModalShell;

impl ModalShell {
    pub fn render(&self, content: Node) -> Node {
        Node::new("div")
            .class("modal")
            .class("modal_active")
            .attr("id", "modal-container")
            .child(
                Node::new("div")
                    .class("modal__container")
                    .child(Node::new("button").class("modal__close").attr("aria-label", "close").on_click(ViewIntent::ModalClose))
                    .child(Node::new("div").class("modal__content").child(content)),
            )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuccessData {
    pub total: Decimal,
}

#[derive(Clone, Debug)]
pub struct SuccessPanel {
    config: Rc<ViewConfig>,
}

impl SuccessPanel {
    pub fn new(config: Rc<ViewConfig>) -> Self { Self { config } }

    pub fn render(&self, data: &SuccessData) -> Node {
        Node::new("div")
            .class("order-success")
            .child(Node::new("h2").class("order-success__title").text("Order placed"))
            .child(
                Node::new("p")
                    .class("order-success__description")
                    .text(format!("Charged {}", self.config.price(Some(data.total)))),
            )
            .child(Node::new("button").class("button").class("order-success__close").text("Back to shopping").on_click(ViewIntent::SuccessClose))
    }
}
