//! # Cart Codec
//!
//! The persisted cart is a UTF-8 JSON array of cart lines:
//!
//! ```json
//! [
//!   { "id": "a", "title": "Shirt", "image_url": "https://…", "price": 10, "quantity": 2 }
//! ]
//! ```
//!
//! Decoding is strict about the cart invariants: a blob with a duplicated
//! id or a zero quantity is rejected as a whole.

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::types::CartItem;

/// Serializes a cart to its persisted JSON form.
pub fn encode_cart(cart: &Cart) -> CoreResult<String> {
    serde_json::to_string(cart).map_err(CoreError::EncodeFailed)
}

/// Parses a persisted JSON blob back into a cart.
///
/// ## Errors
/// - `CoreError::MalformedCart` if the text is not a JSON array of lines
/// - `CoreError::InvalidCart` if the lines break a cart invariant
pub fn decode_cart(raw: &str) -> CoreResult<Cart> {
    let items: Vec<CartItem> = serde_json::from_str(raw).map_err(CoreError::MalformedCart)?;
    Cart::from_items(items)
}
