pub mod loader;
pub mod manifest;
pub mod record;
pub mod source;

pub use loader::*;
pub use manifest::*;
pub use record::*;
pub use source::*;
