//! # Dispatcher
//!
//! 通知分发模块。
//!
//! 负责：
//! - 按名称解析通知通道 (trim / 去重 / 忽略未知名称)
//! - 每个通道一个 task 并发发送，单通道超时隔离
//! - 收集全部通道错误，按完成顺序返回
//!
//! ## 使用示例
//!
//! ```ignore
//! use dispatcher::{ChannelRegistry, Dispatcher, DispatcherConfig, Invocation};
//!
//! let layout = DateLayout::yesterday();
//! let registry = ChannelRegistry::with_builtin(&config, layout.date())?;
//! let dispatcher = Dispatcher::new(registry, DispatcherConfig::from_notify(&config.notify));
//! let summary = Invocation::new(&generator, &dispatcher, config.notify.channel_names())
//!     .run()
//!     .await?;
//! ```

pub mod channels;
pub mod dispatcher;
pub mod error;
pub mod invocation;
pub mod registry;
pub mod summary;

pub use contracts::{ChannelError, NotificationChannel, Report};
pub use dispatcher::{Dispatcher, DispatcherConfig, DEFAULT_CHANNEL_TIMEOUT};
pub use error::{DispatcherError, InvocationError};
pub use invocation::{Invocation, InvocationSummary};
pub use registry::{ChannelRegistry, Resolution};
pub use summary::{ChannelOutcome, DispatchSnapshot, DispatchSummary};
