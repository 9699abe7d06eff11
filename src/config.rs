//! Configuration schema and loading.
//!
//! Settings cover the library layout (audio root, catalog file) and the
//! streaming loop's chunking. See [`Settings::load`] for precedence.

mod load;
mod schema;

pub use schema::*;
