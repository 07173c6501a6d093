mod account;
mod transaction;

pub use account::Account;
pub use transaction::{Amount, Transaction};
