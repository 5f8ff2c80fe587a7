//! Domain types.

pub mod account;
pub mod customer;

pub use account::{Account, AccountUpdate, NewAccount};
pub use customer::Customer;
