//! OpenSASE Storefront - loads the catalog and prints the rendered page

use std::rc::Rc;

use anyhow::Result;
use opensase_storefront::view::ViewConfig;
use opensase_storefront::{
    Basket, Catalog, Customer, EventBroker, HttpShopApi, MemoryScreen, Presenter, Screen, ShopConfig, ShopGateway,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)).init();

    let config = ShopConfig::from_env()?;
    tracing::info!(api = %config.api_url, "starting storefront");

    let broker = Rc::new(EventBroker::new());
    let catalog = Rc::new(Catalog::new(Rc::clone(&broker)));
    let basket = Rc::new(Basket::new(Rc::clone(&broker)));
    let customer = Rc::new(Customer::new(Rc::clone(&broker)));
    let gateway: Rc<dyn ShopGateway> = Rc::new(HttpShopApi::new(&config.api_url, config.http_timeout)?);
    let screen = Rc::new(MemoryScreen::new());

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let presenter = Presenter::new(
                broker,
                catalog,
                basket,
                customer,
                gateway,
                Rc::clone(&screen) as Rc<dyn Screen>,
                ViewConfig::from_config(&config),
            );
            presenter.start().await?;
            presenter.settle().await;
            presenter.stop();
            Ok::<_, anyhow::Error>(())
        })
        .await?;

    println!("{}", screen.to_html());
    Ok(())
}
