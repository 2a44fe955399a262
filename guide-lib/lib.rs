use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod buffer;
pub mod compose;
pub mod config;
pub mod extent;
pub mod guides;
pub mod indent;
pub mod marks;
pub mod position;
pub mod render;
pub mod scheduler;

pub type Tendril = SmartString<LazyCompact>;
