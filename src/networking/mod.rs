pub mod client;

pub use client::{run, ServerConnection};
