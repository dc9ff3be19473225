pub mod area;
pub mod mask;
pub mod radius;
