//! Web 路由处理器

pub mod pages;
pub mod proxy;

pub use pages::*;
pub use proxy::*;
