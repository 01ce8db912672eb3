pub mod phase;
pub mod scene;
pub mod stage;
pub mod tick;
pub mod time;
pub mod timeline;
pub mod viewer;
