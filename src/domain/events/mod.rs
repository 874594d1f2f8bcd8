//! Domain events raised by cart mutations.
//!
//! Consumers drain them via `Cart::take_events` after each call, so a UI
//! layer without implicit reactivity can still react deterministically.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded {
        product_id: String,
        variant_id: Option<String>,
        quantity: u32,
    },
    ItemRemoved {
        product_id: String,
        variant_id: Option<String>,
    },
    QuantityChanged {
        product_id: String,
        variant_id: Option<String>,
        quantity: u32,
    },
    Cleared,
    Opened,
    Closed,
}
