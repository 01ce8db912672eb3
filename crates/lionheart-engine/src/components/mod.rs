pub mod animation;
pub mod collision;
pub mod entity;
pub mod force;
pub mod launcher;
pub mod tilemap;
