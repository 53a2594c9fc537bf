//! Data types for boards, pages and symbol search.

mod board;
mod page;
mod search;

pub use board::*;
pub use page::*;
pub use search::*;
