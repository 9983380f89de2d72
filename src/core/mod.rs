pub mod calculator;
pub mod dashboard;
pub mod log;
pub mod lookup;
pub mod shift;
