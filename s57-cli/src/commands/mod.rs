pub mod catalog;
pub mod dump;
pub mod info;
pub mod select;
