/// Frame sources, sinks and builders for driving the stack without a TAP device.
pub mod test;
