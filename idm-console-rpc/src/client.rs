//! RPC 客户端上下文 —— 持有传输与对话框宿主

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::dialog::DialogHost;
use crate::transport::Transport;

const DEFAULT_SESSION_EXPIRED_MESSAGE: &str = "Your session credential is no longer valid. \
     Sign in again, then press 'Retry' to re-submit the operation.";

/// 在途网络调用计数器
///
/// 只用于驱动忙碌指示，从不限制并发提交。
#[derive(Debug, Default)]
pub struct ActivityCounter {
    count: AtomicUsize,
}

impl ActivityCounter {
    /// 创建归零的计数器
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 一次网络调用开始
    pub fn begin(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// 一次网络调用结束
    pub fn end(&self) {
        // 饱和递减：计数不平衡属于调用方 bug，但指示灯不应下溢
        let _ = self
            .count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
                c.checked_sub(1)
            });
    }

    /// 当前在途调用数
    #[must_use]
    pub fn active(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// 是否应显示忙碌指示
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.active() > 0
    }
}

/// RPC 客户端 —— 命令执行所需的全部依赖
///
/// 会话启动时构造一次，按引用传给每个需要发请求的组件。
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    dialogs: Arc<dyn DialogHost>,
    activity: ActivityCounter,
    session_expired_message: String,
}

impl RpcClient {
    /// 创建客户端
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, dialogs: Arc<dyn DialogHost>) -> Self {
        Self {
            transport,
            dialogs,
            activity: ActivityCounter::new(),
            session_expired_message: DEFAULT_SESSION_EXPIRED_MESSAGE.to_string(),
        }
    }

    /// 覆盖会话过期提示文案（通常来自服务端消息目录）
    #[must_use]
    pub fn with_session_expired_message(mut self, message: impl Into<String>) -> Self {
        self.session_expired_message = message.into();
        self
    }

    /// 传输层
    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// 对话框宿主
    #[must_use]
    pub fn dialogs(&self) -> &dyn DialogHost {
        self.dialogs.as_ref()
    }

    /// 在途调用计数器
    #[must_use]
    pub fn activity(&self) -> &ActivityCounter {
        &self.activity
    }

    /// 会话过期提示文案
    #[must_use]
    pub fn session_expired_message(&self) -> &str {
        &self.session_expired_message
    }
}
