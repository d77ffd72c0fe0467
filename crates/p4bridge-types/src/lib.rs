pub mod diagnostic;
pub mod merge;

pub use diagnostic::*;
pub use merge::*;
