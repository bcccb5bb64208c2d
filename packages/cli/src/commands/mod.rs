pub mod check;
pub mod convert;
mod files;
pub mod init;
pub mod replay;

pub use check::{check, CheckArgs};
pub use convert::{convert, ConvertArgs};
pub use init::{init, InitArgs};
pub use replay::{replay, ReplayArgs};
