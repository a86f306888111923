pub mod app;
pub mod chrome;
pub mod command;
pub mod form;
pub mod layout;
pub mod model;
pub mod msg;
pub mod page;
pub mod pages;
pub mod terminal_guard;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use command::{Command, CommandRunner};
pub use model::{Hint, Model, PageStates};
pub use msg::{Fault, Msg};
pub use page::Page;
