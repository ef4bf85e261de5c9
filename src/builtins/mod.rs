pub mod registry;

#[cfg(target_os = "linux")]
pub mod bindrun;
pub mod cd;
pub mod echo;
pub mod envdir;
pub mod help;
pub mod system;
pub mod tasks;
pub mod wait;
