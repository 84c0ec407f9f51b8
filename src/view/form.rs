//! Checkout forms. Validity and error text are computed by the presenter
//! from the customer model; the forms only display them.

use crate::domain::events::ViewIntent;
use crate::domain::value_objects::Payment;
use crate::view::{InputBinding, Node};

fn errors_line(errors: &str) -> Node { Node::new("span").class("form__errors").text(errors) }

fn submit(label: &str, class: &str, enabled: bool, intent: ViewIntent) -> Node {
    Node::new("button")
        .class("button")
        .class("form__submit")
        .class(class)
        .attr("type", "submit")
        .text(label)
        .disabled(!enabled)
        .on_click(intent)
}

fn text_input(name: &'static str, placeholder: &str, value: &str, binding: InputBinding) -> Node {
    Node::new("input")
        .class("form__input")
        .attr("name", name)
        .attr("type", "text")
        .attr("placeholder", placeholder)
        .attr("value", value)
        .on_input(binding)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderFormData {
    pub payment: Option<Payment>,
    pub address: String,
    pub valid: bool,
    pub errors: String,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OrderForm;

impl OrderForm {
    pub fn render(&self, data: &OrderFormData) -> Node {
        let buttons = Payment::ALL.into_iter().map(|payment| {
            Node::new("button")
                .class("button")
                .class("button_alt")
                .class_if(data.payment == Some(payment), "button_alt-active")
                .attr("name", payment.as_str())
                .attr("type", "button")
                .text(match payment {
                    Payment::Card => "Online",
                    Payment::Cash => "On delivery",
                })
                .on_click(ViewIntent::PaymentChange { payment })
        });

        Node::new("form")
            .class("form")
            .attr("name", "order")
            .child(Node::new("div").class("order__buttons").children(buttons))
            .child(text_input("address", "Enter a delivery address", &data.address, InputBinding::Address))
            .child(
                Node::new("div")
                    .class("modal__actions")
                    .child(submit("Next", "order__button", data.valid, ViewIntent::OrderSubmit))
                    .child(errors_line(&data.errors)),
            )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactsFormData {
    pub email: String,
    pub phone: String,
    pub valid: bool,
    pub errors: String,
    /// An order is in flight; the submit control stays disabled.
    pub submitting: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ContactsForm;

impl ContactsForm {
    pub fn render(&self, data: &ContactsFormData) -> Node {
        let label = if data.submitting { "Placing order..." } else { "Pay" };
        Node::new("form")
            .class("form")
            .attr("name", "contacts")
            .child(text_input("email", "Enter an email", &data.email, InputBinding::Email))
            .child(text_input("phone", "+7 (", &data.phone, InputBinding::Phone))
            .child(
                Node::new("div")
                    .class("modal__actions")
                    .child(submit(label, "contacts__button", data.valid && !data.submitting, ViewIntent::ContactsSubmit))
                    .child(errors_line(&data.errors)),
            )
    }
}
