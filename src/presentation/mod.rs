pub mod cli;
pub mod docs;
