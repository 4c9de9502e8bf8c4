//! 错误对话框表示层契约
//!
//! 对话框本身只是纯状态：标题、消息、可见按钮与（批量时的）子错误列表。
//! 真正的渲染由宿主通过 [`DialogHost`] 完成，并把用户选择的动作返回给
//! 发起命令，由命令决定重试、放弃或回调 `on_error`。

use async_trait::async_trait;

use crate::batch::BatchError;
use crate::error::RpcError;

/// 对话框按钮（按调用点配置可见性）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    /// 重试 —— 在同一命令对象上重新执行
    Retry,
    /// 确认 —— 仅关闭对话框
    Ok,
    /// 取消 —— 触发命令的 `on_error`
    Cancel,
}

/// 用户在对话框上选择的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// 重试
    Retry,
    /// 确认
    Ok,
    /// 取消
    Cancel,
}

/// 错误对话框状态
#[derive(Debug, Clone)]
pub struct ErrorDialog {
    /// 标题（错误名）
    pub title: String,
    /// 错误消息
    pub message: String,
    /// 失败命令的命令行风格渲染（调试展示用）
    pub command_line: String,
    /// 批量命令的子错误列表（单命令时为空）
    pub errors: Vec<BatchError>,
    /// 可见按钮
    pub visible_buttons: Vec<DialogButton>,
}

impl ErrorDialog {
    /// 单命令失败对话框：重试 + 取消
    #[must_use]
    pub fn for_command(command_line: String, error: &RpcError) -> Self {
        Self {
            title: error.name(),
            message: error.to_string(),
            command_line,
            errors: Vec::new(),
            visible_buttons: vec![DialogButton::Retry, DialogButton::Cancel],
        }
    }

    /// 批量部分失败的汇总对话框：仅确认
    #[must_use]
    pub fn for_batch(title: &str, message: &str, errors: Vec<BatchError>) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            command_line: String::new(),
            errors,
            visible_buttons: vec![DialogButton::Ok],
        }
    }

    /// 某个按钮是否可见
    #[must_use]
    pub fn has_button(&self, button: DialogButton) -> bool {
        self.visible_buttons.contains(&button)
    }
}

/// 对话框宿主 —— UI 外壳实现此 trait 完成渲染与交互
#[async_trait]
pub trait DialogHost: Send + Sync {
    /// 呈现错误对话框并返回用户动作
    ///
    /// 宿主只应返回 `dialog.visible_buttons` 中列出的动作。
    async fn present(&self, dialog: &ErrorDialog) -> DialogAction;

    /// 呈现一条普通消息对话框（例如本地校验失败）
    async fn notify(&self, title: &str, message: &str);
}

/// 无界面宿主：自动取消所有错误对话框，消息仅记入日志。
///
/// 适合测试与无人值守场景 —— 取消会让命令走 `on_error` 路径，
/// 错误得以向调用方传播而不是无限等待交互。
pub struct AutoCancelDialogs;

#[async_trait]
impl DialogHost for AutoCancelDialogs {
    async fn present(&self, dialog: &ErrorDialog) -> DialogAction {
        log::warn!("[dialog] {}: {}", dialog.title, dialog.message);
        if dialog.has_button(DialogButton::Cancel) {
            DialogAction::Cancel
        } else {
            DialogAction::Ok
        }
    }

    async fn notify(&self, title: &str, message: &str) {
        log::warn!("[dialog] {title}: {message}");
    }
}
