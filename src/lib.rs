pub mod config;
pub mod errors;
pub mod listing;
pub mod ydatetime;

pub use ydatetime::{
    convert_to_datetimes, convert_to_datetimes_at, convert_to_datetimes_default, DateTimeRange,
};
