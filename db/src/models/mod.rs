pub mod certificate;

pub use certificate::*;
