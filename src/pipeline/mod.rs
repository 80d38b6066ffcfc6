pub mod load;
pub mod parse;
pub mod process;
pub mod store;
