pub mod bound_box;
pub mod frame;
pub mod time_of_day;

pub use bound_box::{BoundBox, ClockRegion};
pub use frame::RawFrame;
pub use time_of_day::ParsedTime;
