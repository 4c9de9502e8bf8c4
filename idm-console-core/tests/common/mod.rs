//! 共享测试工具：脚本化传输、录制对话框宿主与可编程字段

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use idm_console_core::{Context, Field, ParamMetadata, StaticNavigation};
use idm_console_rpc::{
    DialogAction, DialogHost, ErrorDialog, Reply, RpcClient, RpcError, RpcResult, Transport,
};

// ===== MockTransport =====

/// 脚本化传输：按顺序吐出预置回复，并录制每次发送的请求体
pub struct MockTransport {
    replies: Mutex<VecDeque<RpcResult<Reply>>>,
    sent: Mutex<Vec<Value>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn push_json(&self, body: &Value) {
        self.push_reply(200, &body.to_string());
    }

    pub fn push_reply(&self, status: u16, body: &str) {
        self.replies.lock().unwrap().push_back(Ok(Reply {
            status,
            body: body.to_string(),
        }));
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, body: &Value) -> RpcResult<Reply> {
        self.sent.lock().unwrap().push(body.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RpcError::Network {
                    detail: "mock transport exhausted".to_string(),
                })
            })
    }
}

// ===== RecordingDialogs =====

/// 录制对话框宿主：按脚本返回动作，缺省取消
pub struct RecordingDialogs {
    actions: Mutex<VecDeque<DialogAction>>,
    presented: Mutex<Vec<ErrorDialog>>,
    notices: Mutex<Vec<(String, String)>>,
}

impl RecordingDialogs {
    pub fn new() -> Self {
        Self {
            actions: Mutex::new(VecDeque::new()),
            presented: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn push_action(&self, action: DialogAction) {
        self.actions.lock().unwrap().push_back(action);
    }

    pub fn presented(&self) -> Vec<ErrorDialog> {
        self.presented.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<(String, String)> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl DialogHost for RecordingDialogs {
    async fn present(&self, dialog: &ErrorDialog) -> DialogAction {
        self.presented.lock().unwrap().push(dialog.clone());
        self.actions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DialogAction::Cancel)
    }

    async fn notify(&self, title: &str, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

// ===== StaticField =====

/// 字段编辑句柄：装进区块后仍可模拟用户编辑
#[derive(Clone)]
pub struct FieldHandle(Arc<Mutex<Vec<Value>>>);

impl FieldHandle {
    /// 模拟用户编辑
    pub fn set(&self, values: Vec<Value>) {
        *self.0.lock().unwrap() = values;
    }

    /// 当前待保存值
    pub fn get(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}

/// 可编程字段：测试里替代真实控件
pub struct StaticField {
    name: String,
    param_info: Option<ParamMetadata>,
    join: bool,
    valid: bool,
    loaded: Vec<Value>,
    current: Arc<Mutex<Vec<Value>>>,
}

impl StaticField {
    /// 模式已知参数字段
    pub fn schema(name: &str) -> Self {
        Self {
            name: name.to_string(),
            param_info: Some(ParamMetadata {
                name: name.to_string(),
                ..ParamMetadata::default()
            }),
            join: false,
            valid: true,
            loaded: Vec::new(),
            current: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 主键参数字段
    pub fn primary_key(name: &str) -> Self {
        let mut field = Self::schema(name);
        if let Some(param) = field.param_info.as_mut() {
            param.primary_key = true;
        }
        field
    }

    /// 自由格式目录属性字段（无模式）
    pub fn raw(name: &str) -> Self {
        let mut field = Self::schema(name);
        field.param_info = None;
        field
    }

    pub fn with_join(mut self) -> Self {
        self.join = true;
        self
    }

    pub fn with_invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    /// 取编辑句柄
    pub fn handle(&self) -> FieldHandle {
        FieldHandle(self.current.clone())
    }
}

impl Field for StaticField {
    fn name(&self) -> &str {
        &self.name
    }

    fn param_info(&self) -> Option<&ParamMetadata> {
        self.param_info.as_ref()
    }

    fn join(&self) -> bool {
        self.join
    }

    fn load(&mut self, record: &Value) {
        let values = match record.get(&self.name) {
            Some(Value::Array(values)) => values.clone(),
            Some(value) => vec![value.clone()],
            None => Vec::new(),
        };
        self.loaded = values.clone();
        *self.current.lock().unwrap() = values;
    }

    fn save(&self) -> Vec<Value> {
        self.current.lock().unwrap().clone()
    }

    fn is_dirty(&self) -> bool {
        *self.current.lock().unwrap() != self.loaded
    }

    fn reset(&mut self) {
        *self.current.lock().unwrap() = self.loaded.clone();
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

// ===== 测试装置 =====

/// 一套隔离的测试会话
pub struct TestHarness {
    pub ctx: Context,
    pub transport: Arc<MockTransport>,
    pub navigation: Arc<StaticNavigation>,
    pub dialogs: Arc<RecordingDialogs>,
}

/// 创建隔离的测试上下文
pub fn harness() -> TestHarness {
    let transport = Arc::new(MockTransport::new());
    let navigation = Arc::new(StaticNavigation::new());
    let dialogs = Arc::new(RecordingDialogs::new());
    let client = Arc::new(RpcClient::new(transport.clone(), dialogs.clone()));
    let ctx = Context::new(client, navigation.clone());
    TestHarness {
        ctx,
        transport,
        navigation,
        dialogs,
    }
}
