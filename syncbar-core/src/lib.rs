pub mod config;
pub mod lock;
pub mod markers;
pub mod status;
pub mod sync;
pub mod workdir;
