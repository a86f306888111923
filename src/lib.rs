pub mod api;
pub mod config;
pub mod ui;
pub mod util;

pub use api::{ApiError, CommerceApi, HttpCommerceApi, HttpTokenizer, PaymentTokenizer};
pub use config::Config;
pub use ui::{App, Command, Fault, Model, Msg, Page};
