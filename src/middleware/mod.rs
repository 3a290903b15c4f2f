pub mod browser;
pub mod guard;
