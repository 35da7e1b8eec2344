//! 工具函数模块

pub mod datetime;
pub mod domain;
mod locks;

pub use locks::DomainLocks;
