pub mod decline;
pub mod reason;
pub mod summary;
