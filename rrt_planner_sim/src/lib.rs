#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod simulator;

pub use app::App;
