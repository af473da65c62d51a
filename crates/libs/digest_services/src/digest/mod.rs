mod builder;
mod interfaces;

pub use builder::*;
pub use interfaces::*;
