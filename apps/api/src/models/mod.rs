pub mod candidate;
pub mod process;
