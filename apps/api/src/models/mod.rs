pub mod candidate;
pub mod compatibility;
pub mod links;
