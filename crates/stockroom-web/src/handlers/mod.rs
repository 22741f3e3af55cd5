pub mod image;
pub mod page;
pub mod upload;
