pub mod filename;
pub mod gate;
pub mod records;
