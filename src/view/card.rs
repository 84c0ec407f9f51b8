//! Product cards: catalog tile, full preview and basket line

use std::rc::Rc;

use crate::domain::events::ViewIntent;
use crate::domain::models::Product;
use crate::view::{Node, ViewConfig};

fn category(config: &ViewConfig, product: &Product) -> Node {
    Node::new("span")
        .class("card__category")
        .class(config.category_class(&product.category))
        .text(product.category.clone())
}

fn image(config: &ViewConfig, product: &Product) -> Node {
    Node::new("img")
        .class("card__image")
        .attr("src", config.image(&product.image))
        .attr("alt", product.title.clone())
}

fn title(product: &Product) -> Node { Node::new("h2").class("card__title").text(product.title.clone()) }

fn price(config: &ViewConfig, product: &Product) -> Node {
    Node::new("span").class("card__price").text(config.price(product.price))
}

/// Gallery tile. Priceless products are marked `card_disabled` but can
/// still be opened for reading.
#[derive(Clone, Debug)]
pub struct CatalogCard {
    config: Rc<ViewConfig>,
}

impl CatalogCard {
    pub fn new(config: Rc<ViewConfig>) -> Self { Self { config } }

    pub fn render(&self, product: &Product) -> Node {
        Node::new("button")
            .class("gallery__item")
            .class("card")
            .class_if(!product.is_purchasable(), "card_disabled")
            .attr("data-id", product.id.clone())
            .on_click(ViewIntent::CardSelect { id: product.id.clone() })
            .child(category(&self.config, product))
            .child(title(product))
            .child(image(&self.config, product))
            .child(price(&self.config, product))
    }
}

/// What the preview's action button offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewButton {
    Add,
    Remove,
    Unavailable,
}

impl PreviewButton {
    pub fn resolve(product: &Product, in_basket: bool) -> Self {
        if !product.is_purchasable() {
            Self::Unavailable
        } else if in_basket {
            Self::Remove
        } else {
            Self::Add
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Add => "Add to basket",
            Self::Remove => "Remove from basket",
            Self::Unavailable => "Unavailable",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewData {
    pub product: Product,
    pub button: PreviewButton,
}

#[derive(Clone, Debug)]
pub struct PreviewCard {
    config: Rc<ViewConfig>,
}

impl PreviewCard {
    pub fn new(config: Rc<ViewConfig>) -> Self { Self { config } }

    pub fn render(&self, data: &PreviewData) -> Node {
        let product = &data.product;
        let button = Node::new("button")
            .class("button")
            .class("card__button")
            .text(data.button.label())
            .disabled(data.button == PreviewButton::Unavailable)
            .on_click(ViewIntent::CardAction { id: product.id.clone() });

        Node::new("div")
            .class("card")
            .class("card_full")
            .attr("data-id", product.id.clone())
            .child(image(&self.config, product))
            .child(
                Node::new("div")
                    .class("card__column")
                    .child(category(&self.config, product))
                    .child(title(product))
                    .child(Node::new("p").class("card__text").text(product.description.clone()))
                    .child(Node::new("div").class("card__row").child(button).child(price(&self.config, product))),
            )
    }
}

/// Numbered basket line with a delete control.
#[derive(Clone, Debug)]
pub struct BasketCard {
    config: Rc<ViewConfig>,
}

impl BasketCard {
    pub fn new(config: Rc<ViewConfig>) -> Self { Self { config } }

    pub fn render(&self, index: usize, product: &Product) -> Node {
        Node::new("li")
            .class("basket__item")
            .class("card")
            .class("card_compact")
            .attr("data-id", product.id.clone())
            .child(Node::new("span").class("basket__item-index").text(index.to_string()))
            .child(title(product))
            .child(price(&self.config, product))
            .child(
                Node::new("button")
                    .class("basket__item-delete")
                    .attr("aria-label", "delete")
                    .on_click(ViewIntent::BasketRemove { id: product.id.clone() }),
            )
    }
}
