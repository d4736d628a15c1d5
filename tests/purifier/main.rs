//! 净化流水线集成测试

#[path = "../common/mod.rs"]
mod common;

mod pipeline;
mod properties;
