pub mod dispatch;
pub mod dist;
pub mod extract;
pub mod init;
pub mod show;

pub use dispatch::dispatch;
