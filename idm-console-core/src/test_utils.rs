//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use idm_console_rpc::{
    AutoCancelDialogs, Reply, RpcClient, RpcError, RpcResult, Transport,
};

use crate::context::Context;
use crate::metadata::ParamMetadata;
use crate::traits::{Field, StaticNavigation};

// ===== MockTransport =====

/// 脚本化传输：按顺序吐出预置回复，并录制发送的请求体
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

    /// 预置一条 JSON 回复（HTTP 200）
    pub fn push_json(&self, body: &Value) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(Reply {
                status: 200,
                body: body.to_string(),
            }));
    }

    /// 预置一条任意状态码的回复
    pub fn push_reply(&self, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(Reply {
                status,
                body: body.to_string(),
            }));
    }

    /// 已发送的请求体
    pub fn sent(&self) -> Vec<Value> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 发送次数
    pub fn call_count(&self) -> usize {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, body: &Value) -> RpcResult<Reply> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(body.clone());
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(RpcError::Network {
                    detail: "mock transport exhausted".to_string(),
                })
            })
    }
}

// ===== StaticField =====

/// 可编程字段：测试里替代真实控件
pub struct StaticField {
    name: String,
    param_info: Option<ParamMetadata>,
    join: bool,
    valid: bool,
    loaded: Vec<Value>,
    current: Vec<Value>,
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
            current: Vec::new(),
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

    /// 多值拼接保存
    pub fn with_join(mut self) -> Self {
        self.join = true;
        self
    }

    /// 标记校验失败
    pub fn with_invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    /// 模拟用户编辑
    pub fn set_values(&mut self, values: Vec<Value>) {
        self.current = values;
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
        self.current = values;
    }

    fn save(&self) -> Vec<Value> {
        self.current.clone()
    }

    fn is_dirty(&self) -> bool {
        self.current != self.loaded
    }

    fn reset(&mut self) {
        self.current = self.loaded.clone();
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `Context`（自动取消对话框宿主）
pub fn test_context() -> (Context, Arc<MockTransport>, Arc<StaticNavigation>) {
    let transport = Arc::new(MockTransport::new());
    let navigation = Arc::new(StaticNavigation::new());
    let client = Arc::new(RpcClient::new(transport.clone(), Arc::new(AutoCancelDialogs)));
    let ctx = Context::new(client, navigation.clone());
    (ctx, transport, navigation)
}
