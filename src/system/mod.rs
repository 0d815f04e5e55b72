pub mod accountant;
pub mod kill;
pub mod platform;
pub mod process;
pub mod snapshot;
pub mod source;
pub mod stat;
