pub mod api;
pub mod time;
