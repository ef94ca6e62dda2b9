pub mod bridge;
pub mod close;
pub mod filter;
