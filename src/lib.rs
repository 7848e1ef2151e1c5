//! Daily arXiv digest: load published AI-enhanced paper feeds, index them by
//! category, and filter, re-rank and paginate them for display.

pub mod common;
pub mod feed;
pub mod index;
pub mod preferences;
pub mod render;
pub mod session;
pub mod view;
