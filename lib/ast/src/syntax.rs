pub mod instructions;
pub mod types;
