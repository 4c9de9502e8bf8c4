//! 命令对象 —— 一次远程调用的完整描述
//!
//! 一个 [`Command`] 由线上方法名（`entity_method`）、位置参数、具名选项与
//! 成功/失败回调组成。`execute` 完成序列化、发送与结果路由；失败时按
//! `retry` 配置决定是直接回调还是先经由错误对话框征求用户重试。

use std::fmt;

use serde_json::{Map, Value};

use crate::client::RpcClient;
use crate::dialog::{DialogAction, ErrorDialog};
use crate::error::{RpcError, RpcResult};
use crate::transport::truncate_for_log;
use crate::types::{Request, Response};

/// 成功回调：收到完整响应报文后同步调用
pub type SuccessCallback = Box<dyn FnMut(&Response) + Send + Sync>;
/// 失败回调：错误路径结束（用户取消或不重试）后同步调用
pub type ErrorCallback = Box<dyn FnMut(&RpcError) + Send + Sync>;

/// `execute` 的最终走向
#[derive(Debug)]
pub enum Outcome {
    /// 传输与协议均成功；`on_success` 已触发
    Success(Response),
    /// 失败且未重试（或用户取消重试）；`on_error` 已触发
    Failed(RpcError),
    /// 用户在对话框上仅确认，未取消也未重试；两个回调都不触发
    Dismissed(RpcError),
}

impl Outcome {
    /// 是否成功
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// 转换为 `Result`，`Dismissed` 同样视为错误
    pub fn into_result(self) -> RpcResult<Response> {
        match self {
            Self::Success(response) => Ok(response),
            Self::Failed(error) | Self::Dismissed(error) => Err(error),
        }
    }
}

/// 一次远程调用
pub struct Command {
    /// 调试用名字（批量命令、引导批次等场景）
    pub name: Option<String>,
    /// 所属实体（可空；拼接进线上方法名）
    pub entity: Option<String>,
    /// 方法名
    pub method: String,
    /// 失败时是否先弹出重试对话框（默认开）
    pub retry: bool,
    args: Vec<Value>,
    options: Map<String, Value>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl Command {
    /// 创建无实体前缀的命令
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            name: None,
            entity: None,
            method: method.into(),
            retry: true,
            args: Vec::new(),
            options: Map::new(),
            on_success: None,
            on_error: None,
        }
    }

    /// 创建实体命令（线上方法名为 `entity_method`）
    #[must_use]
    pub fn for_entity(entity: impl Into<String>, method: impl Into<String>) -> Self {
        let mut command = Self::new(method);
        command.entity = Some(entity.into());
        command
    }

    /// 线上方法名：`entity + "_" + method`，无实体时为裸 `method`
    #[must_use]
    pub fn get_command(&self) -> String {
        match &self.entity {
            Some(entity) => format!("{entity}_{}", self.method),
            None => self.method.clone(),
        }
    }

    /// 追加一个位置参数
    pub fn add_arg(&mut self, arg: impl Into<Value>) {
        self.args.push(arg.into());
    }

    /// 依序追加多个位置参数
    pub fn add_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        for arg in args {
            self.args.push(arg.into());
        }
    }

    /// 设置具名选项（同名覆盖，后写生效）
    pub fn set_option(&mut self, name: &str, value: impl Into<Value>) {
        self.options.insert(name.to_string(), value.into());
    }

    /// 向多值选项追加一个值
    ///
    /// 选项不存在时先初始化为空序列再追加；已有标量值会被并入序列。
    /// 用于 `addattr` 这类可重复出现的选项。
    pub fn add_option(&mut self, name: &str, value: impl Into<Value>) {
        let entry = self
            .options
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(vec![entry.take()]);
        }
        if let Value::Array(values) = entry {
            values.push(value.into());
        }
    }

    /// 读取选项当前值
    #[must_use]
    pub fn get_option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// 位置参数
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// 具名选项
    #[must_use]
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// 是否携带任何选项
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// 安装成功回调
    pub fn on_success(&mut self, callback: impl FnMut(&Response) + Send + Sync + 'static) {
        self.on_success = Some(Box::new(callback));
    }

    /// 安装失败回调
    pub fn on_error(&mut self, callback: impl FnMut(&RpcError) + Send + Sync + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    pub(crate) fn fire_success(&mut self, response: &Response) {
        if let Some(callback) = self.on_success.as_mut() {
            callback(response);
        }
    }

    pub(crate) fn fire_error(&mut self, error: &RpcError) {
        if let Some(callback) = self.on_error.as_mut() {
            callback(error);
        }
    }

    /// 纯序列化：`{method, params: [args, options]}`，无副作用
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.to_request()).unwrap_or(Value::Null)
    }

    /// 结构化的请求报文
    #[must_use]
    pub fn to_request(&self) -> Request {
        Request {
            method: self.get_command(),
            params: (self.args.clone(), self.options.clone()),
        }
    }

    /// 执行命令并路由结果
    ///
    /// 错误路径：`retry` 开启时经由对话框征求用户动作 —— 重试在同一对象上
    /// 重新发送（参数与选项不变，也不对仍在途的上一次请求做任何去重）；
    /// 取消触发 `on_error`；确认仅关闭。`retry` 关闭时直接触发 `on_error`。
    pub async fn execute(&mut self, client: &RpcClient) -> Outcome {
        loop {
            match self.send_once(client).await {
                Ok(response) => {
                    self.fire_success(&response);
                    return Outcome::Success(response);
                }
                Err(error) => {
                    if error.is_expected() {
                        log::warn!("[rpc] {} failed: {error}", self.get_command());
                    } else {
                        log::error!("[rpc] {} failed: {error}", self.get_command());
                    }

                    if !self.retry {
                        self.fire_error(&error);
                        return Outcome::Failed(error);
                    }

                    let dialog = ErrorDialog::for_command(self.to_string(), &error);
                    match client.dialogs().present(&dialog).await {
                        DialogAction::Retry => {}
                        DialogAction::Cancel => {
                            self.fire_error(&error);
                            return Outcome::Failed(error);
                        }
                        DialogAction::Ok => return Outcome::Dismissed(error),
                    }
                }
            }
        }
    }

    /// 发送一次请求并解析响应（不触发回调，不弹对话框）
    async fn send_once(&self, client: &RpcClient) -> RpcResult<Response> {
        let body = self.to_json();
        log::debug!("[rpc] {self}");

        client.activity().begin();
        let sent = client.transport().send(&body).await;
        client.activity().end();
        let reply = sent?;

        if reply.status == 401 {
            return Err(RpcError::SessionExpired {
                message: client.session_expired_message().to_string(),
            });
        }

        if !(200..300).contains(&reply.status) {
            return Err(RpcError::Http {
                status: reply.status,
                detail: truncate_for_log(&reply.body),
            });
        }

        let mut response: Response =
            serde_json::from_str(&reply.body).map_err(|e| RpcError::Parse {
                detail: e.to_string(),
            })?;
        response.status = reply.status;

        if let Some(error) = &response.error {
            return Err(RpcError::Server {
                code: error.code,
                message: error.message.clone(),
            });
        }

        Ok(response)
    }
}

impl fmt::Display for Command {
    /// 命令行风格渲染：方法名里的下划线转连字符，位置参数在前，
    /// 选项以 `--name='value'` 形式在后。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_command().replace('_', "-"))?;

        for arg in &self.args {
            write!(f, " {}", render_value(arg))?;
        }

        for (name, value) in &self.options {
            write!(f, " --{name}='{}'", render_value(value))?;
        }

        Ok(())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("command", &self.get_command())
            .field("args", &self.args)
            .field("options", &self.options)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
