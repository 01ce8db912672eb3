pub mod context;
pub mod error;
pub mod feature;
pub mod types;
