//! API request handlers.

mod page;
mod view;

pub use page::*;
pub use view::*;
