pub mod envelope;
pub mod fault;
pub mod header;

pub use envelope::*;
pub use fault::*;
pub use header::*;
