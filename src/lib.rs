pub mod basis;
pub mod catalog;
pub mod config;
pub mod mix_resolve;
pub mod paste;
pub mod recipe;
pub mod space;
