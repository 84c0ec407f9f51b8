//! Presenter: the coordination core.
//!
//! Subscribes to every event on the broker, turns view intents into model
//! mutations and model changes into re-renders, and tracks which modal
//! content is active. Must run inside a [`tokio::task::LocalSet`]: order
//! submission is spawned as a local task so the handler that triggered it
//! returns immediately.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::{OrderResponse, ShopGateway};
use crate::broker::{EventBroker, EventPattern, SubscriptionId};
use crate::domain::events::{ModelChange, ShopEvent, ViewIntent};
use crate::domain::models::{Basket, Catalog, Customer, CustomerData, OrderRequest, Product};
use crate::domain::value_objects::{restrict, summary, CustomerField, FieldErrors};
use crate::view::{
    BasketCard, BasketData, BasketPanel, CatalogCard, ContactsForm, ContactsFormData, Gallery, Header, ModalShell, Node,
    OrderForm, OrderFormData, PreviewButton, PreviewCard, PreviewData, Screen, SuccessData, SuccessPanel, ViewConfig,
};
use crate::{Result, ShopError};

/// Shown on the contacts step when the backend rejects or never answers.
pub const SUBMISSION_FAILED: &str = "Failed to place the order, please try again";

/// Which modal content is active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Idle,
    Catalog { selected_id: String },
    Basket,
    Order { errors: FieldErrors, valid: bool },
    Contacts { errors: FieldErrors, valid: bool, submitting: bool, failure: Option<String> },
    Success { total: Decimal },
}

struct Views {
    gallery: Gallery,
    header: Header,
    modal: ModalShell,
    catalog_card: CatalogCard,
    preview_card: PreviewCard,
    basket_card: BasketCard,
    basket: BasketPanel,
    order_form: OrderForm,
    contacts_form: ContactsForm,
    success: SuccessPanel,
}

impl Views {
    fn new(config: ViewConfig) -> Self {
        let config = Rc::new(config);
        Self {
            gallery: Gallery,
            header: Header,
            modal: ModalShell,
            catalog_card: CatalogCard::new(Rc::clone(&config)),
            preview_card: PreviewCard::new(Rc::clone(&config)),
            basket_card: BasketCard::new(Rc::clone(&config)),
            basket: BasketPanel::new(Rc::clone(&config)),
            order_form: OrderForm,
            contacts_form: ContactsForm,
            success: SuccessPanel::new(config),
        }
    }
}

pub struct Presenter {
    broker: Rc<EventBroker<ShopEvent>>,
    catalog: Rc<Catalog>,
    basket: Rc<Basket>,
    customer: Rc<Customer>,
    gateway: Rc<dyn ShopGateway>,
    screen: Rc<dyn Screen>,
    views: Views,
    state: RefCell<ModalState>,
    subscription: Cell<Option<SubscriptionId>>,
    in_flight: RefCell<Option<JoinHandle<()>>>,
    submitting: Cell<bool>,
    weak_self: Weak<Presenter>,
}

impl Presenter {
    /// Wires the presenter to the broker and renders the header badge.
    pub fn new(
        broker: Rc<EventBroker<ShopEvent>>,
        catalog: Rc<Catalog>,
        basket: Rc<Basket>,
        customer: Rc<Customer>,
        gateway: Rc<dyn ShopGateway>,
        screen: Rc<dyn Screen>,
        view_config: ViewConfig,
    ) -> Rc<Self> {
        let presenter = Rc::new_cyclic(|weak_self| Self {
            broker,
            catalog,
            basket,
            customer,
            gateway,
            screen,
            views: Views::new(view_config),
            state: RefCell::new(ModalState::Idle),
            subscription: Cell::new(None),
            in_flight: RefCell::new(None),
            submitting: Cell::new(false),
            weak_self: weak_self.clone(),
        });

        let weak = Rc::downgrade(&presenter);
        let id = presenter.broker.on(EventPattern::Any, move |event: &ShopEvent| match weak.upgrade() {
            Some(presenter) => presenter.handle(event),
            None => Ok(()),
        });
        presenter.subscription.set(Some(id));
        presenter.render_header();
        presenter
    }

    /// Loads the catalog. A failed fetch is logged and leaves it empty.
    pub async fn start(&self) -> Result<()> {
        info!("loading catalog");
        match self.gateway.fetch_catalog().await {
            Ok(response) => {
                info!(count = response.items.len(), total = response.total, "catalog loaded");
                self.catalog.replace_all(response.items)?;
            }
            Err(e) => {
                error!(error = %e, "catalog fetch failed, continuing with an empty catalog");
                self.render_catalog(&[]);
            }
        }
        Ok(())
    }

    /// Waits for an in-flight order submission, if any.
    pub async fn settle(&self) {
        let handle = self.in_flight.borrow_mut().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = %e, "order submission task aborted");
            }
        }
    }

    pub fn stop(&self) {
        if let Some(id) = self.subscription.take() {
            self.broker.off(EventPattern::Any, id);
        }
    }

    pub fn state(&self) -> ModalState { self.state.borrow().clone() }

    /// Every transition goes through here; leaving the preview drops the
    /// catalog selection.
    fn set_state(&self, state: ModalState) -> Result<()> {
        debug!(?state, "modal state");
        let leaves_preview = !matches!(state, ModalState::Catalog { .. });
        let previous = std::mem::replace(&mut *self.state.borrow_mut(), state);
        if leaves_preview && matches!(previous, ModalState::Catalog { .. }) && self.catalog.selected().is_some() {
            self.catalog.clear_selection()?;
        }
        Ok(())
    }

    fn handle(&self, event: &ShopEvent) -> Result<()> {
        match event {
            ShopEvent::Intent(intent) => self.on_intent(intent),
            ShopEvent::Change(change) => self.on_change(change),
        }
    }

    fn on_change(&self, change: &ModelChange) -> Result<()> {
        match change {
            ModelChange::ItemsChanged { items } => self.render_catalog(items),
            ModelChange::ProductSelect { item } => self.open_preview(item)?,
            ModelChange::ProductDeselect => {
                if matches!(*self.state.borrow(), ModalState::Catalog { .. }) {
                    self.set_state(ModalState::Idle)?;
                    self.screen.hide_modal();
                }
            }
            ModelChange::BasketChanged => {
                self.render_header();
                let state = self.state();
                match state {
                    ModalState::Basket => self.render_basket(),
                    ModalState::Catalog { .. } => {
                        if let Some(item) = self.catalog.selected() {
                            self.open_preview(&item)?;
                        }
                    }
                    _ => {}
                }
            }
            ModelChange::CustomerChanged { .. } => {
                let state = self.state();
                match state {
                    ModalState::Order { .. } => self.refresh_order()?,
                    ModalState::Contacts { .. } => self.refresh_contacts()?,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn on_intent(&self, intent: &ViewIntent) -> Result<()> {
        match intent {
            ViewIntent::CardSelect { id } => {
                self.catalog.select_by_id(id)?;
            }
            ViewIntent::CardAction { id } => self.toggle_in_basket(id)?,
            ViewIntent::BasketOpen => {
                self.set_state(ModalState::Basket)?;
                self.render_basket();
            }
            ViewIntent::BasketRemove { id } => {
                self.basket.remove(id)?;
            }
            ViewIntent::OrderOpen => self.open_order()?,
            ViewIntent::OrderSubmit => self.submit_order_step()?,
            ViewIntent::PaymentChange { payment } => {
                self.customer.update(CustomerData::payment(*payment))?;
            }
            ViewIntent::AddressChange { address } => {
                self.customer.update(CustomerData::address(address.clone()))?;
            }
            ViewIntent::EmailChange { email } => {
                self.customer.update(CustomerData::email(email.clone()))?;
            }
            ViewIntent::PhoneChange { phone } => {
                self.customer.update(CustomerData::phone(phone.clone()))?;
            }
            ViewIntent::ContactsSubmit => self.submit_contacts()?,
            ViewIntent::SuccessClose | ViewIntent::ModalClose => self.close_modal()?,
        }
        Ok(())
    }

    fn show(&self, content: Node) { self.screen.show_modal(self.views.modal.render(content)); }

    fn close_modal(&self) -> Result<()> {
        self.screen.hide_modal();
        self.set_state(ModalState::Idle)
    }

    fn render_catalog(&self, items: &[Product]) {
        let cards = items.iter().map(|p| self.views.catalog_card.render(p)).collect();
        self.screen.mount_gallery(self.views.gallery.render(cards));
    }

    fn render_header(&self) { self.screen.mount_header(self.views.header.render(self.basket.count())); }

    fn open_preview(&self, item: &Product) -> Result<()> {
        let button = PreviewButton::resolve(item, self.basket.contains(&item.id));
        self.set_state(ModalState::Catalog { selected_id: item.id.clone() })?;
        self.show(self.views.preview_card.render(&PreviewData { product: item.clone(), button }));
        Ok(())
    }

    fn toggle_in_basket(&self, id: &str) -> Result<()> {
        let Some(product) = self.catalog.find_by_id(id) else {
            warn!(id, "basket action for unknown product");
            return Ok(());
        };
        if self.basket.contains(id) {
            self.basket.remove(id)?;
        } else if self.catalog.is_purchasable(&product) {
            self.basket.add(product)?;
        } else {
            warn!(id, "priceless product cannot be added to the basket");
        }
        Ok(())
    }

    fn render_basket(&self) {
        let items = self
            .basket
            .items()
            .iter()
            .enumerate()
            .map(|(i, p)| self.views.basket_card.render(i + 1, p))
            .collect();
        let data = BasketData { items, total: self.basket.total() };
        self.show(self.views.basket.render(&data));
    }

    fn step_errors(&self, fields: &[CustomerField]) -> FieldErrors { restrict(&self.customer.validate(), fields) }

    fn open_order(&self) -> Result<()> {
        if self.basket.is_empty() {
            warn!("checkout requested with an empty basket");
            return Ok(());
        }
        self.refresh_order()
    }

    fn refresh_order(&self) -> Result<()> {
        let errors = self.step_errors(&CustomerField::ORDER_STEP);
        let valid = errors.is_empty();
        let data = self.customer.get();
        let form = OrderFormData {
            payment: data.payment,
            address: data.address.unwrap_or_default(),
            valid,
            errors: summary(&errors),
        };
        self.set_state(ModalState::Order { errors, valid })?;
        self.show(self.views.order_form.render(&form));
        Ok(())
    }

    fn submit_order_step(&self) -> Result<()> {
        if !matches!(*self.state.borrow(), ModalState::Order { .. }) {
            warn!("order submit outside the order step");
            return Ok(());
        }
        if self.step_errors(&CustomerField::ORDER_STEP).is_empty() {
            self.refresh_contacts()
        } else {
            self.refresh_order()
        }
    }

    /// The submit control stays disabled while an order is in flight, even
    /// when the step was closed and reopened meanwhile.
    fn refresh_contacts(&self) -> Result<()> {
        let errors = self.step_errors(&CustomerField::CONTACTS_STEP);
        let valid = errors.is_empty();
        self.set_state(ModalState::Contacts { errors, valid, submitting: self.submitting.get(), failure: None })?;
        self.render_contacts();
        Ok(())
    }

    fn render_contacts(&self) {
        let ModalState::Contacts { errors, valid, submitting, failure } = self.state() else {
            return;
        };
        let data = self.customer.get();
        let form = ContactsFormData {
            email: data.email.unwrap_or_default(),
            phone: data.phone.unwrap_or_default(),
            valid,
            errors: failure.unwrap_or_else(|| summary(&errors)),
            submitting,
        };
        self.show(self.views.contacts_form.render(&form));
    }

    fn submit_contacts(&self) -> Result<()> {
        if self.submitting.get() {
            debug!("order already in flight, ignoring submit");
            return Ok(());
        }
        if !matches!(*self.state.borrow(), ModalState::Contacts { .. }) {
            warn!("contacts submit outside the contacts step");
            return Ok(());
        }

        let errors = self.customer.validate();
        if !errors.is_empty() {
            self.set_state(ModalState::Contacts { errors, valid: false, submitting: false, failure: None })?;
            self.render_contacts();
            return Ok(());
        }
        if self.basket.is_empty() {
            warn!("contacts submit with an empty basket");
            return Ok(());
        }

        let order = OrderRequest::assemble(&self.customer.get(), self.basket.total(), self.basket.item_ids())
            .ok_or_else(|| ShopError::Handler { event: "contacts:submit", message: "customer data incomplete".into() })?;
        let Some(this) = self.weak_self.upgrade() else {
            return Ok(());
        };

        self.submitting.set(true);
        self.set_state(ModalState::Contacts { errors: FieldErrors::new(), valid: true, submitting: true, failure: None })?;
        self.render_contacts();
        info!(items = order.items.len(), total = %order.total, "submitting order");
        let handle = tokio::task::spawn_local(async move {
            let result = this.gateway.submit_order(&order).await;
            if let Err(e) = this.complete_submission(result) {
                error!(error = %e, "order completion handler failed");
            }
        });
        *self.in_flight.borrow_mut() = Some(handle);
        Ok(())
    }

    fn complete_submission(&self, result: Result<OrderResponse>) -> Result<()> {
        self.submitting.set(false);
        match result {
            Ok(response) => {
                info!(order_id = %response.id, total = %response.total, "order placed");
                self.set_state(ModalState::Success { total: response.total })?;
                self.show(self.views.success.render(&SuccessData { total: response.total }));
                self.basket.clear()?;
                self.customer.clear()?;
            }
            Err(e) => {
                error!(error = %e, "order submission failed");
                let on_contacts = {
                    let mut state = self.state.borrow_mut();
                    match &mut *state {
                        ModalState::Contacts { submitting, failure, .. } => {
                            *submitting = false;
                            *failure = Some(SUBMISSION_FAILED.to_string());
                            true
                        }
                        _ => false,
                    }
                };
                if on_contacts {
                    self.render_contacts();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogResponse;
    use crate::domain::models::testing::product;
    use crate::domain::value_objects::Payment;
    use crate::view::MemoryScreen;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::Notify;
    use tokio::task::LocalSet;

    #[derive(Default)]
    struct ScriptedGateway {
        catalog: RefCell<Option<Result<CatalogResponse>>>,
        orders: RefCell<VecDeque<Result<OrderResponse>>>,
        submitted: RefCell<Vec<OrderRequest>>,
        hold: Option<Rc<Notify>>,
    }

    #[async_trait(?Send)]
    impl ShopGateway for ScriptedGateway {
        async fn fetch_catalog(&self) -> Result<CatalogResponse> {
            self.catalog.borrow_mut().take().unwrap_or(Ok(CatalogResponse { total: 0, items: vec![] }))
        }

        async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse> {
            self.submitted.borrow_mut().push(order.clone());
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            self.orders.borrow_mut().pop_front().unwrap_or(Err(ShopError::Api { status: 500, message: "no script".into() }))
        }
    }

    struct Harness {
        broker: Rc<EventBroker<ShopEvent>>,
        catalog: Rc<Catalog>,
        basket: Rc<Basket>,
        customer: Rc<Customer>,
        screen: Rc<MemoryScreen>,
        gateway: Rc<ScriptedGateway>,
        presenter: Rc<Presenter>,
    }

    impl Harness {
        fn new(gateway: ScriptedGateway) -> Self {
            let broker = Rc::new(EventBroker::new());
            let catalog = Rc::new(Catalog::new(Rc::clone(&broker)));
            let basket = Rc::new(Basket::new(Rc::clone(&broker)));
            let customer = Rc::new(Customer::new(Rc::clone(&broker)));
            let screen = Rc::new(MemoryScreen::new());
            let gateway = Rc::new(gateway);
            let presenter = Presenter::new(
                Rc::clone(&broker),
                Rc::clone(&catalog),
                Rc::clone(&basket),
                Rc::clone(&customer),
                Rc::clone(&gateway) as Rc<dyn ShopGateway>,
                Rc::clone(&screen) as Rc<dyn Screen>,
                ViewConfig::default(),
            );
            Self { broker, catalog, basket, customer, screen, gateway, presenter }
        }

        fn stocked() -> Self {
            let h = Self::new(ScriptedGateway::default());
            h.catalog.replace_all(vec![product("a", Some(100)), product("b", None), product("c", Some(250))]).unwrap();
            h
        }

        fn emit(&self, intent: ViewIntent) { self.broker.emit(&intent.into()).unwrap(); }

        fn modal(&self) -> Node { self.screen.modal().expect("modal is open") }

        fn badge(&self) -> String {
            self.screen.header().unwrap().text_of("header__basket-counter").unwrap().to_string()
        }

        fn fill_order_step(&self) {
            self.emit(ViewIntent::PaymentChange { payment: Payment::Card });
            self.emit(ViewIntent::AddressChange { address: "Main st 1".into() });
        }

        fn fill_contacts(&self) {
            self.emit(ViewIntent::EmailChange { email: "e@x.com".into() });
            self.emit(ViewIntent::PhoneChange { phone: "1".into() });
        }

        fn to_contacts_step(&self) {
            self.basket.add(product("a", Some(100))).unwrap();
            self.emit(ViewIntent::OrderOpen);
            self.fill_order_step();
            self.emit(ViewIntent::OrderSubmit);
            self.fill_contacts();
        }
    }

    #[tokio::test]
    async fn test_start_renders_catalog() {
        let gateway = ScriptedGateway::default();
        *gateway.catalog.borrow_mut() = Some(Ok(CatalogResponse { total: 2, items: vec![product("a", Some(100)), product("b", None)] }));
        let h = Harness::new(gateway);
        assert_eq!(h.badge(), "0");
        h.presenter.start().await.unwrap();
        let gallery = h.screen.gallery().unwrap();
        let cards = gallery.find_all("card");
        assert_eq!(cards.len(), 2);
        assert!(!cards[0].has_class("card_disabled"));
        assert!(cards[1].has_class("card_disabled"));
    }

    #[tokio::test]
    async fn test_start_survives_fetch_failure() {
        let gateway = ScriptedGateway::default();
        *gateway.catalog.borrow_mut() = Some(Err(ShopError::Api { status: 502, message: "bad gateway".into() }));
        let h = Harness::new(gateway);
        h.presenter.start().await.unwrap();
        assert!(h.catalog.is_empty());
        assert!(h.screen.gallery().unwrap().children.is_empty());
        assert_eq!(h.presenter.state(), ModalState::Idle);
    }

    #[test]
    fn test_preview_toggles_without_closing() {
        let h = Harness::stocked();
        h.emit(ViewIntent::CardSelect { id: "a".into() });
        assert_eq!(h.presenter.state(), ModalState::Catalog { selected_id: "a".into() });
        assert_eq!(h.modal().text_of("card__button"), Some("Add to basket"));

        let press = h.modal().find("card__button").unwrap().click().unwrap();
        h.emit(press.clone());
        assert_eq!(h.basket.count(), 1);
        assert_eq!(h.badge(), "1");
        assert_eq!(h.modal().text_of("card__button"), Some("Remove from basket"));
        assert_eq!(h.presenter.state(), ModalState::Catalog { selected_id: "a".into() });

        h.emit(press);
        assert_eq!(h.basket.count(), 0);
        assert_eq!(h.modal().text_of("card__button"), Some("Add to basket"));
    }

    #[test]
    fn test_priceless_preview_is_unavailable() {
        let h = Harness::stocked();
        h.emit(ViewIntent::CardSelect { id: "b".into() });
        assert!(h.modal().find("card__button").unwrap().click().is_none());
        h.emit(ViewIntent::CardAction { id: "b".into() });
        assert!(h.basket.is_empty());
    }

    #[test]
    fn test_closing_preview_clears_selection() {
        let h = Harness::stocked();
        h.emit(ViewIntent::CardSelect { id: "c".into() });
        let close = h.modal().find("modal__close").unwrap().click().unwrap();
        h.emit(close);
        assert!(h.catalog.selected().is_none());
        assert!(!h.screen.is_modal_open());
        assert_eq!(h.presenter.state(), ModalState::Idle);
    }

    #[test]
    fn test_replace_dropping_selection_closes_preview() {
        let h = Harness::stocked();
        h.emit(ViewIntent::CardSelect { id: "c".into() });
        h.catalog.replace_all(vec![product("a", Some(100))]).unwrap();
        assert_eq!(h.presenter.state(), ModalState::Idle);
        assert!(!h.screen.is_modal_open());
        assert_eq!(h.screen.gallery().unwrap().find_all("card").len(), 1);
    }

    #[test]
    fn test_basket_modal_tracks_removals() {
        let h = Harness::stocked();
        h.basket.add(product("a", Some(100))).unwrap();
        h.basket.add(product("c", Some(250))).unwrap();
        h.emit(ViewIntent::BasketOpen);
        assert_eq!(h.modal().text_of("basket__price"), Some("350 synapses"));
        let lines = h.modal().find_all("basket__item").len();
        assert_eq!(lines, 2);

        let delete = h.modal().find_all("basket__item-delete")[0].click().unwrap();
        h.emit(delete);
        assert_eq!(h.basket.item_ids(), vec!["c"]);
        assert_eq!(h.modal().text_of("basket__price"), Some("250 synapses"));
        assert_eq!(h.modal().text_of("basket__item-index"), Some("1"));

        h.emit(ViewIntent::BasketRemove { id: "c".into() });
        assert!(h.modal().find("basket__button").unwrap().click().is_none());
        assert_eq!(h.badge(), "0");

        h.emit(ViewIntent::OrderOpen);
        assert_eq!(h.presenter.state(), ModalState::Basket);
    }

    #[test]
    fn test_order_step_validates_live() {
        let h = Harness::stocked();
        h.basket.add(product("a", Some(100))).unwrap();
        h.emit(ViewIntent::EmailChange { email: "e@x.com".into() });
        h.emit(ViewIntent::PhoneChange { phone: "1".into() });
        h.emit(ViewIntent::OrderOpen);
        let ModalState::Order { errors, valid } = h.presenter.state() else { panic!("not on order step") };
        assert!(!valid);
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![CustomerField::Payment, CustomerField::Address]);

        h.emit(ViewIntent::PaymentChange { payment: Payment::Cash });
        assert_eq!(h.modal().text_of("form__errors"), Some("Enter a delivery address"));
        assert!(h.modal().find("button_alt-active").is_some());

        h.emit(ViewIntent::AddressChange { address: "   ".into() });
        assert!(matches!(h.presenter.state(), ModalState::Order { valid: false, .. }));

        h.emit(ViewIntent::AddressChange { address: "Main st 1".into() });
        assert!(matches!(h.presenter.state(), ModalState::Order { valid: true, .. }));
        assert_eq!(h.modal().find("form__submit").unwrap().click(), Some(ViewIntent::OrderSubmit));
    }

    #[test]
    fn test_order_submit_gates_on_step_fields() {
        let h = Harness::stocked();
        h.basket.add(product("a", Some(100))).unwrap();
        h.emit(ViewIntent::OrderOpen);
        h.emit(ViewIntent::OrderSubmit);
        assert!(matches!(h.presenter.state(), ModalState::Order { .. }));

        h.fill_order_step();
        h.emit(ViewIntent::OrderSubmit);
        let ModalState::Contacts { valid, submitting, .. } = h.presenter.state() else { panic!("not on contacts step") };
        assert!(!valid);
        assert!(!submitting);

        h.fill_contacts();
        assert!(matches!(h.presenter.state(), ModalState::Contacts { valid: true, .. }));
        assert_eq!(h.modal().find("form__input").unwrap().get_attr("value"), Some("e@x.com"));
    }

    #[tokio::test]
    async fn test_successful_submission_resets_session() {
        LocalSet::new()
            .run_until(async {
                let gateway = ScriptedGateway::default();
                gateway.orders.borrow_mut().push_back(Ok(OrderResponse { id: "o1".into(), total: Decimal::new(100, 0) }));
                let h = Harness::new(gateway);
                h.catalog.replace_all(vec![product("a", Some(100))]).unwrap();
                h.to_contacts_step();
                h.emit(ViewIntent::ContactsSubmit);
                assert!(matches!(h.presenter.state(), ModalState::Contacts { submitting: true, .. }));
                h.presenter.settle().await;

                assert_eq!(h.presenter.state(), ModalState::Success { total: Decimal::new(100, 0) });
                assert_eq!(h.modal().text_of("order-success__description"), Some("Charged 100 synapses"));
                assert!(h.basket.is_empty());
                assert_eq!(h.customer.get(), CustomerData::default());
                assert_eq!(h.badge(), "0");

                let sent = h.gateway.submitted.borrow();
                assert_eq!(sent.len(), 1);
                assert_eq!(sent[0].items, vec!["a"]);
                assert_eq!(sent[0].payment, Payment::Card);
                drop(sent);

                h.emit(ViewIntent::SuccessClose);
                assert_eq!(h.presenter.state(), ModalState::Idle);
                assert!(!h.screen.is_modal_open());
            })
            .await;
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_data() {
        LocalSet::new()
            .run_until(async {
                let gateway = ScriptedGateway::default();
                gateway.orders.borrow_mut().push_back(Err(ShopError::Api { status: 400, message: "Wrong total".into() }));
                let h = Harness::new(gateway);
                h.catalog.replace_all(vec![product("a", Some(100))]).unwrap();
                h.to_contacts_step();
                h.emit(ViewIntent::ContactsSubmit);
                h.presenter.settle().await;

                let ModalState::Contacts { submitting, failure, .. } = h.presenter.state() else { panic!("left contacts step") };
                assert!(!submitting);
                assert_eq!(failure.as_deref(), Some(SUBMISSION_FAILED));
                assert_eq!(h.modal().text_of("form__errors"), Some(SUBMISSION_FAILED));
                assert_eq!(h.basket.count(), 1);
                assert_eq!(h.customer.get().email.as_deref(), Some("e@x.com"));
                assert!(h.modal().find("form__submit").unwrap().click().is_some());
            })
            .await;
    }

    #[tokio::test]
    async fn test_duplicate_submit_is_ignored() {
        LocalSet::new()
            .run_until(async {
                let release = Rc::new(Notify::new());
                let gateway = ScriptedGateway { hold: Some(Rc::clone(&release)), ..Default::default() };
                gateway.orders.borrow_mut().push_back(Ok(OrderResponse { id: "o1".into(), total: Decimal::new(100, 0) }));
                let h = Harness::new(gateway);
                h.catalog.replace_all(vec![product("a", Some(100))]).unwrap();
                h.to_contacts_step();
                h.emit(ViewIntent::ContactsSubmit);
                h.emit(ViewIntent::ContactsSubmit);
                assert!(h.modal().find("form__submit").unwrap().click().is_none());
                release.notify_one();
                h.presenter.settle().await;
                assert_eq!(h.gateway.submitted.borrow().len(), 1);
                assert!(matches!(h.presenter.state(), ModalState::Success { .. }));
            })
            .await;
    }

    #[tokio::test]
    async fn test_reopened_checkout_cannot_resubmit_mid_flight() {
        LocalSet::new()
            .run_until(async {
                let release = Rc::new(Notify::new());
                let gateway = ScriptedGateway { hold: Some(Rc::clone(&release)), ..Default::default() };
                gateway.orders.borrow_mut().push_back(Ok(OrderResponse { id: "o1".into(), total: Decimal::new(100, 0) }));
                let h = Harness::new(gateway);
                h.catalog.replace_all(vec![product("a", Some(100))]).unwrap();
                h.to_contacts_step();
                h.emit(ViewIntent::ContactsSubmit);
                tokio::task::yield_now().await;

                h.emit(ViewIntent::ModalClose);
                h.emit(ViewIntent::BasketOpen);
                h.emit(ViewIntent::OrderOpen);
                h.emit(ViewIntent::OrderSubmit);
                assert!(matches!(h.presenter.state(), ModalState::Contacts { submitting: true, .. }));
                assert!(h.modal().find("form__submit").unwrap().click().is_none());
                h.emit(ViewIntent::ContactsSubmit);

                release.notify_one();
                h.presenter.settle().await;
                assert_eq!(h.gateway.submitted.borrow().len(), 1);
                assert!(matches!(h.presenter.state(), ModalState::Success { .. }));
            })
            .await;
    }

    #[tokio::test]
    async fn test_success_over_preview_clears_selection() {
        LocalSet::new()
            .run_until(async {
                let release = Rc::new(Notify::new());
                let gateway = ScriptedGateway { hold: Some(Rc::clone(&release)), ..Default::default() };
                gateway.orders.borrow_mut().push_back(Ok(OrderResponse { id: "o1".into(), total: Decimal::new(100, 0) }));
                let h = Harness::new(gateway);
                h.catalog.replace_all(vec![product("a", Some(100)), product("c", Some(250))]).unwrap();
                h.to_contacts_step();
                h.emit(ViewIntent::ContactsSubmit);
                h.emit(ViewIntent::ModalClose);
                h.emit(ViewIntent::CardSelect { id: "c".into() });
                assert_eq!(h.presenter.state(), ModalState::Catalog { selected_id: "c".into() });

                release.notify_one();
                h.presenter.settle().await;
                assert!(matches!(h.presenter.state(), ModalState::Success { .. }));
                assert!(h.catalog.selected().is_none());

                h.emit(ViewIntent::SuccessClose);
                assert_eq!(h.presenter.state(), ModalState::Idle);
                assert!(h.catalog.selected().is_none());
            })
            .await;
    }

    #[test]
    fn test_leaving_preview_for_basket_clears_selection() {
        let h = Harness::stocked();
        h.emit(ViewIntent::CardSelect { id: "a".into() });
        h.emit(ViewIntent::BasketOpen);
        assert_eq!(h.presenter.state(), ModalState::Basket);
        assert!(h.catalog.selected().is_none());
        assert!(h.screen.is_modal_open());
    }

    #[test]
    fn test_stop_detaches_from_broker() {
        let h = Harness::stocked();
        h.presenter.stop();
        h.emit(ViewIntent::BasketOpen);
        assert_eq!(h.presenter.state(), ModalState::Idle);
        assert_eq!(h.broker.handler_count(), 0);
    }
}
