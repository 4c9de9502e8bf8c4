//! 批量命令 —— 一次往返提交多条子命令
//!
//! 子命令序列化后作为父命令的位置参数发送，响应里 `results[i]` 与
//! `commands[i]` 按位对应。单个子命令失败不会阻断兄弟命令的处理：
//! 失败被逐条记录进 `errors`，整个批次在传输层面仍然算成功。

use serde::Serialize;
use serde_json::Value;

use crate::client::RpcClient;
use crate::command::{Command, ErrorCallback, Outcome, SuccessCallback};
use crate::dialog::ErrorDialog;
use crate::error::RpcError;
use crate::types::Response;

const DEFAULT_ERROR_TITLE: &str = "Operations Error";
const DEFAULT_ERROR_MESSAGE: &str = "Some operations failed.";

/// 一条子命令的失败记录
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    /// 失败子命令的命令行渲染
    pub command: String,
    /// 错误名（`Server Error <code>` / `Internal Error <status>`）
    pub name: String,
    /// 错误消息
    pub message: String,
    /// 承载批量响应的 HTTP 状态码
    pub status: u16,
}

/// 批量命令
///
/// 组合一个方法名固定为 `"batch"` 的 [`Command`]，并持有子命令序列。
pub struct BatchCommand {
    command: Command,
    commands: Vec<Command>,
    errors: Vec<BatchError>,
    error_title: String,
    error_message: String,
    show_error: bool,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl BatchCommand {
    /// 创建空批次
    #[must_use]
    pub fn new() -> Self {
        Self {
            command: Command::new("batch"),
            commands: Vec::new(),
            errors: Vec::new(),
            error_title: DEFAULT_ERROR_TITLE.to_string(),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            show_error: true,
            on_success: None,
            on_error: None,
        }
    }

    /// 创建带调试名的空批次
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut batch = Self::new();
        batch.command.name = Some(name.into());
        batch
    }

    /// 覆盖汇总对话框文案（通常来自消息目录）
    pub fn set_error_message(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.error_title = title.into();
        self.error_message = message.into();
    }

    /// 是否在部分失败时弹出汇总对话框（默认开）
    pub fn set_show_error(&mut self, show_error: bool) {
        self.show_error = show_error;
    }

    /// 批次整体失败时是否先弹重试对话框
    pub fn set_retry(&mut self, retry: bool) {
        self.command.retry = retry;
    }

    /// 追加一条子命令：序列化形式进入父命令参数，对象本身留存以便回调
    pub fn add_command(&mut self, command: Command) {
        self.command.add_arg(command.to_json());
        self.commands.push(command);
    }

    /// 依序追加多条子命令
    pub fn add_commands<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.add_command(command);
        }
    }

    /// 子命令序列
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// 子命令条数
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// 是否没有子命令
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// 位置 `index` 处子命令的序列化形式
    #[must_use]
    pub fn command_json(&self, index: usize) -> Option<&Value> {
        self.command.args().get(index)
    }

    /// 上一次执行记录的子命令失败列表
    #[must_use]
    pub fn errors(&self) -> &[BatchError] {
        &self.errors
    }

    /// 安装批次级成功回调（部分失败时依然触发）
    pub fn on_success(&mut self, callback: impl FnMut(&Response) + Send + Sync + 'static) {
        self.on_success = Some(Box::new(callback));
    }

    /// 安装批次级失败回调（仅批次调用整体失败时触发）
    pub fn on_error(&mut self, callback: impl FnMut(&RpcError) + Send + Sync + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    /// 执行批次
    ///
    /// 聚合响应到达后按数组顺序同步分发子命令回调：缺失的结果合成
    /// 内部错误；携带协议错误的结果走子命令 `on_error`；其余走
    /// `on_success`。全部分发完毕后，若配置了 `show_error` 且存在失败
    /// 记录，则弹出一次仅含确认按钮的汇总对话框。
    pub async fn execute(&mut self, client: &RpcClient) -> Outcome {
        self.errors.clear();

        match self.command.execute(client).await {
            Outcome::Success(response) => {
                self.demux(client, &response).await;
                if let Some(callback) = self.on_success.as_mut() {
                    callback(&response);
                }
                Outcome::Success(response)
            }
            Outcome::Failed(error) => {
                if let Some(callback) = self.on_error.as_mut() {
                    callback(&error);
                }
                Outcome::Failed(error)
            }
            Outcome::Dismissed(error) => Outcome::Dismissed(error),
        }
    }

    /// 把聚合响应按位拆回每条子命令
    async fn demux(&mut self, client: &RpcClient, response: &Response) {
        let empty = Vec::new();
        let results = response.results().unwrap_or(&empty);

        if results.len() < self.commands.len() {
            log::warn!(
                "[rpc] batch returned {} results for {} commands",
                results.len(),
                self.commands.len()
            );
        }

        for (index, command) in self.commands.iter_mut().enumerate() {
            match results.get(index).filter(|entry| !entry.is_null()) {
                None => {
                    let error = RpcError::Internal {
                        status: response.status,
                        message: format!("missing batch result at position {index}"),
                    };
                    self.errors.push(BatchError {
                        command: command.to_string(),
                        name: error.name(),
                        message: error.to_string(),
                        status: response.status,
                    });
                    command.fire_error(&error);
                }
                Some(entry) => match entry_error(entry) {
                    Some(error) => {
                        self.errors.push(BatchError {
                            command: command.to_string(),
                            name: error.name(),
                            message: error.to_string(),
                            status: response.status,
                        });
                        command.fire_error(&error);
                    }
                    None => {
                        let mut child = child_response(entry);
                        child.status = response.status;
                        command.fire_success(&child);
                    }
                },
            }
        }

        if self.show_error && !self.errors.is_empty() {
            let dialog = ErrorDialog::for_batch(
                &self.error_title,
                &self.error_message,
                self.errors.clone(),
            );
            client.dialogs().present(&dialog).await;
        }
    }
}

impl Default for BatchCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// 把一个子结果条目装配成子命令可消费的响应
///
/// 多数条目本身就是响应形状（带 `result` 成员）；个别元数据类命令的条目
/// 是裸载荷，整体包装进 `result`。
fn child_response(entry: &Value) -> Response {
    if entry.get("result").is_some() || entry.get("error").is_some() {
        serde_json::from_value(entry.clone()).unwrap_or_else(|_| Response {
            result: Some(entry.clone()),
            ..Response::default()
        })
    } else {
        Response {
            result: Some(entry.clone()),
            ..Response::default()
        }
    }
}

/// 子结果条目携带的协议错误（`error` 成员非空时）
fn entry_error(entry: &Value) -> Option<RpcError> {
    let error = entry.get("error").filter(|e| !e.is_null())?;
    let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| error.to_string(), str::to_string);
    Some(RpcError::Server { code, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Request;
    use serde_json::json;

    #[test]
    fn add_command_serializes_into_parent_args() {
        let mut child = Command::for_entity("user", "add");
        child.add_arg("jsmith");
        child.set_option("givenname", "John");

        let mut batch = BatchCommand::new();
        batch.add_command(child);

        assert_eq!(batch.len(), 1);
        let serialized = batch.command_json(0).unwrap();
        assert_eq!(serialized["method"], "user_add");
    }

    #[test]
    fn command_json_round_trips_child() {
        let mut child = Command::for_entity("dnsrecord", "add");
        child.add_arg("example.test");
        child.add_arg("www");
        child.set_option("arecord", "192.0.2.7");

        let expected = child.to_request();

        let mut batch = BatchCommand::new();
        batch.add_command(child);

        let extracted = Request::from_value(batch.command_json(0).unwrap()).unwrap();
        assert_eq!(extracted, expected);
    }

    #[test]
    fn entry_error_reads_code_and_message() {
        let error = entry_error(&json!({"error": {"code": 4001, "message": "M"}})).unwrap();
        assert_eq!(error.name(), "Server Error 4001");
        assert!(error.to_string().contains('M'));
    }

    #[test]
    fn entry_error_ignores_null_member() {
        assert!(entry_error(&json!({"error": null, "result": {}})).is_none());
        assert!(entry_error(&json!({"result": {}})).is_none());
    }

    #[test]
    fn child_response_keeps_response_shape() {
        let child = child_response(&json!({"result": {"uid": ["admin"]}, "summary": null}));
        assert_eq!(child.result, Some(json!({"uid": ["admin"]})));
    }

    #[test]
    fn child_response_wraps_bare_payload() {
        let child = child_response(&json!({"objects": {}, "methods": {}}));
        assert_eq!(child.result, Some(json!({"objects": {}, "methods": {}})));
    }
}
