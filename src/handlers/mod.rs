//! Tool handlers: one async function per tool.
//!
//! Each handler shapes its arguments, calls the remote client, and formats
//! the payload into a `ResultEnvelope`. Handlers raise `InvalidArgument` and
//! `NotFound` themselves; everything else is normalized by the dispatcher.

pub mod args;
pub mod compare;
pub mod product;
pub mod search;

pub use args::Args;
pub use compare::compare_products;
pub use product::{allergen_info, nutrition_facts, product_by_barcode};
pub use search::{products_by_brand, products_by_category, search_by_nutriments, search_products};
