pub mod duration;
pub mod gaps;
pub mod rounding;
