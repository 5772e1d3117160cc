pub mod common;
pub mod pagination;
pub mod params;
pub mod resource;
pub mod sort;
