pub mod frame_generators;
