//! 共享测试工具：脚本化传输与录制对话框宿主

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use idm_console_rpc::{
    DialogAction, DialogHost, ErrorDialog, Reply, RpcClient, RpcError, RpcResult, Transport,
};

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

    /// 预置一条 JSON 回复（HTTP 200）
    pub fn push_json(&self, body: &Value) {
        self.push_reply(200, &body.to_string());
    }

    /// 预置一条任意状态码的回复
    pub fn push_reply(&self, status: u16, body: &str) {
        self.replies.lock().unwrap().push_back(Ok(Reply {
            status,
            body: body.to_string(),
        }));
    }

    /// 预置一次传输层失败
    pub fn push_error(&self, error: RpcError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// 已发送的请求体
    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    /// 发送次数
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

/// 录制对话框宿主：按脚本返回动作，并留存每次呈现的对话框
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

    /// 预置下一次 `present` 返回的动作
    pub fn push_action(&self, action: DialogAction) {
        self.actions.lock().unwrap().push_back(action);
    }

    /// 呈现过的对话框
    pub fn presented(&self) -> Vec<ErrorDialog> {
        self.presented.lock().unwrap().clone()
    }

    /// 呈现过的消息对话框
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

/// 组装一套测试客户端
pub fn test_client() -> (RpcClient, Arc<MockTransport>, Arc<RecordingDialogs>) {
    let transport = Arc::new(MockTransport::new());
    let dialogs = Arc::new(RecordingDialogs::new());
    let client = RpcClient::new(transport.clone(), dialogs.clone());
    (client, transport, dialogs)
}
