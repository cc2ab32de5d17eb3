// examples/cart_session.rs
//
// Walks one cart session: add products, edit a quantity the way the UI does,
// render the sidebar and tear it down.

use martaba::{CartLineItem, CartSidebar, CartStore, Quantity};
use std::time::Duration;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  let store = CartStore::new();
  store.subscribe(|event| println!("cart changed: {:?}", event));

  store.add_item(
    CartLineItem::new("orthopedic-160", "Orthopedic mattress 160x200", "ortho.jpg", 1200.0)
      .with_final_price(999.0),
  );
  store.add_item(CartLineItem::new("pillow-memory", "Memory foam pillow", "pillow.jpg", 150.0).with_quantity(Quantity::clamp(2)));

  let mut sidebar = CartSidebar::new(store.clone());
  sidebar.render();

  if let Some(input) = sidebar.input_mut("pillow-memory") {
    input.on_focus();
    input.on_change("3");
    input.on_change("4"); // inside the throttle window
    input.on_blur(); // commits 4
  }

  tokio::time::sleep(Duration::from_millis(10)).await;

  let view = sidebar.render();
  for line in &view.lines {
    println!("{:<32} x{:<3} {:>10.2}", line.name, line.quantity, line.line_total);
  }
  println!("items: {}  total: {:.2}", view.item_count, view.total);

  sidebar.dispose();
}
