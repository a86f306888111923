//! Page handlers. Each module pairs an update function
//! `(Model, &Msg) -> (Model, Vec<Command>)` with a view function
//! `(&Model) -> Text`, plus an `enter` helper that performs the page
//! switch and whatever resets the page specifies.

pub mod account;
pub mod cart;
pub mod confirm;
pub mod orders;
pub mod payment;
pub mod receipt;
pub mod shipping;
pub mod shop;
pub mod splash;
pub mod subscribe;
pub mod subscriptions;
