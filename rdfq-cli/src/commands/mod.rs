pub mod compile;
pub mod origins;
pub mod prepare;
