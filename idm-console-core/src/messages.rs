//! 控制台消息目录
//!
//! 内置英文缺省值；启动引导拿到服务端 i18n 载荷后整体覆盖，缺失的键
//! 由 serde 缺省补齐。

use serde::{Deserialize, Serialize};

/// 按钮文案
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonMessages {
    pub ok: String,
    pub cancel: String,
    pub retry: String,
    pub update: String,
    pub reset: String,
    pub add: String,
    pub add_and_add_another: String,
    pub add_and_edit: String,
}

impl Default for ButtonMessages {
    fn default() -> Self {
        Self {
            ok: "OK".to_string(),
            cancel: "Cancel".to_string(),
            retry: "Retry".to_string(),
            update: "Update".to_string(),
            reset: "Reset".to_string(),
            add: "Add".to_string(),
            add_and_add_another: "Add and Add Another".to_string(),
            add_and_edit: "Add and Edit".to_string(),
        }
    }
}

/// 对话框文案
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogMessages {
    pub batch_error_title: String,
    pub batch_error_message: String,
    pub validation_title: String,
    pub validation_message: String,
    /// `${entity}` 会被实体单数标签替换
    pub add_confirmation: String,
}

impl Default for DialogMessages {
    fn default() -> Self {
        Self {
            batch_error_title: "Operations Error".to_string(),
            batch_error_message: "Some operations failed.".to_string(),
            validation_title: "Validation error".to_string(),
            validation_message: "Input form contains invalid or missing values.".to_string(),
            add_confirmation: "${entity} successfully added".to_string(),
        }
    }
}

/// 网络层文案
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AjaxMessages {
    /// 会话过期提示（传给 `RpcClient`）
    pub session_expired: String,
}

impl Default for AjaxMessages {
    fn default() -> Self {
        Self {
            session_expired: "Your session credential is no longer valid. \
                 Sign in again, then press 'Retry' to re-submit the operation."
                .to_string(),
        }
    }
}

/// 消息目录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub buttons: ButtonMessages,
    pub dialogs: DialogMessages,
    pub ajax: AjaxMessages,
}

impl Messages {
    /// 新建成功的行内确认文案，替换 `${entity}` 占位符
    #[must_use]
    pub fn add_confirmation(&self, entity_label: &str) -> String {
        self.dialogs
            .add_confirmation
            .replace("${entity}", entity_label)
    }
}
