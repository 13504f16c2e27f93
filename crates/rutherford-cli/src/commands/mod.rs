pub mod batch;
pub mod calibrate;
