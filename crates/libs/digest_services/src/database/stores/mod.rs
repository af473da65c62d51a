mod account_store;
mod subscription_store;

pub use account_store::*;
pub use subscription_store::*;
