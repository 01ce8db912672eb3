pub mod registry;
pub mod setup;
