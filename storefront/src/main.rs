// martaba_storefront/src/main.rs

//! Catalogue smoke run: loads the configuration, fetches the product list,
//! puts the first product in a cart and prints what the cart sidebar renders.

use chrono::Utc;
use martaba::Quantity;
use martaba_storefront::services::ProductQuery;
use martaba_storefront::{AppConfig, AppState};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[tokio::main]
async fn main() -> ExitCode {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting Martaba storefront client...");

  let config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return ExitCode::FAILURE;
    }
  };

  let state = match AppState::new(config) {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to build the API client.");
      return ExitCode::FAILURE;
    }
  };

  let search = std::env::args().nth(1);
  let query = ProductQuery {
    search,
    limit: Some(20),
    ..ProductQuery::default()
  };
  let products = match state
    .notifier
    .report(state.products().list_products(&query).await, "Catalogue loaded.")
  {
    Some(products) => products,
    None => {
      for toast in state.notifier.drain() {
        eprintln!("[{:?}] {}", toast.level, toast.message);
      }
      return ExitCode::FAILURE;
    }
  };

  let now = Utc::now();
  for product in &products {
    let image = product
      .primary_image()
      .map(|id| state.cdn.image(id).card().url())
      .unwrap_or_default();
    let price = match product.final_price(now) {
      Some(final_price) => format!("{:.2} (was {:.2})", final_price, product.price),
      None => format!("{:.2}", product.price),
    };
    println!("{:<40} {:>24}  {}", product.name, price, image);
  }

  if let Some(first) = products.iter().find(|p| p.is_in_stock()) {
    let thumbnail = first
      .primary_image()
      .map(|id| state.cdn.image(id).thumbnail().url())
      .unwrap_or_default();
    state.cart.add_item(first.to_cart_line(now, thumbnail, Quantity::MIN));

    let mut sidebar = state.cart_sidebar();
    let view = sidebar.render();
    println!();
    for line in &view.lines {
      println!("cart: {} x{} = {:.2}", line.name, line.quantity, line.line_total);
    }
    println!("cart total: {:.2} ({} items)", view.total, view.item_count);
    sidebar.dispose();
  }

  ExitCode::SUCCESS
}
