pub mod reader;
pub mod resource;
