//! Bodies of the Windows remote shell operations and the queries over their responses.
pub mod commandline;
pub mod receive;
pub mod response;
pub mod send;
pub mod shell;
pub mod signal;

pub use commandline::*;
pub use receive::*;
pub use response::*;
pub use send::*;
pub use shell::*;
pub use signal::*;
