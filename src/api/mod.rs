pub mod client;
pub mod error;
pub mod models;
pub mod tokenize;

pub use client::{sign_in, CommerceApi, HttpCommerceApi};
pub use error::ApiError;
pub use models::*;
pub use tokenize::{HttpTokenizer, PaymentTokenizer};
