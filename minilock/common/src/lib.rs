pub mod granularity;
pub mod types;

pub use granularity::Granularity;
