//! Terminal front end: one screen of board tabs over a grid of sound buttons,
//! with modal forms layered on top.
mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
