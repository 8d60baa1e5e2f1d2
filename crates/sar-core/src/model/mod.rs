pub mod region;
pub mod target;
