pub mod advisory;
pub mod insight;
pub mod selection;
pub mod weather;

pub use advisory::*;
pub use insight::*;
pub use selection::*;
pub use weather::*;
