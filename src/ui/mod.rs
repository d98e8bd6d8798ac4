//! Front-ends. Both are thin callers of [`crate::db::Store`]: the line menu
//! for plain terminals and the form interface built on Ratatui.

mod app;
mod forms;
mod helpers;
mod menu;
mod terminal;

pub use app::App;
pub use menu::Menu;
pub use terminal::run_app;
