pub mod filter;
pub mod pipeline;

pub use filter::*;
pub use pipeline::*;
