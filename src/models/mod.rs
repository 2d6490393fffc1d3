pub mod cda;

pub use cda::*;
