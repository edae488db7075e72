pub mod duration;

pub use duration::{
    DifferenceResult, OffsetConversion, ShiftDirection, ShiftResult, TimeSpan, convert_offset, difference, shift,
};
