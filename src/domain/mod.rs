pub mod calendar;
pub mod classifier;
pub mod tenant;
