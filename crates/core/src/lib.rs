#![forbid(unsafe_code)]

pub mod blocks;
pub mod model;
pub mod time;

pub use time::Clock;
