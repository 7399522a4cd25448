//! Request-level resolution logic shared by the protocol surface.

pub mod category;
pub mod lookup;

pub use category::{category_payload, CategoryListing, CategoryResolver};
pub use lookup::{LookupResolver, LookupResult, LookupSource};
