pub mod column;
pub mod dashboard;
pub mod input;
pub mod lookup;
pub mod shift;
pub mod stage;
