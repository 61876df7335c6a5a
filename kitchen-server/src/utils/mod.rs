//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - 日志等工具

pub mod logger;
