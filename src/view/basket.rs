//! Basket panel

use std::rc::Rc;

use rust_decimal::Decimal;

use crate::domain::events::ViewIntent;
use crate::view::{Node, ViewConfig};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasketData {
    pub items: Vec<Node>,
    pub total: Decimal,
}

#[derive(Clone, Debug)]
pub struct BasketPanel {
    config: Rc<ViewConfig>,
}

impl BasketPanel {
    pub fn new(config: Rc<ViewConfig>) -> Self { Self { config } }

    /// The checkout button is enabled only for a non-empty basket.
    pub fn render(&self, data: &BasketData) -> Node {
        let empty = data.items.is_empty();
        Node::new("div")
            .class("basket")
            .child(Node::new("h2").class("modal__title").text("Basket"))
            .child(Node::new("ul").class("basket__list").children(data.items.iter().cloned()))
            .child(
                Node::new("div")
                    .class("modal__actions")
                    .child(
                        Node::new("button")
                            .class("button")
                            .class("basket__button")
                            .text("Checkout")
                            .disabled(empty)
                            .on_click(ViewIntent::OrderOpen),
                    )
                    .child(Node::new("span").class("basket__price").text(self.config.price(Some(data.total)))),
            )
    }
}
