pub mod appointments;
pub mod config;
pub mod local_offset;
