pub use eq::Identical;
pub use error::{Error, Result};
pub use produce::{Produce, ProduceFn};

mod eq;
mod error;
mod produce;
