//! JSON-RPC 报文类型定义

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 请求报文：`{"method": "...", "params": [args, options]}`
///
/// `params` 固定为两元素：位置参数列表与具名选项映射。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// 线上方法名（`entity_method` 或裸 `method`）
    pub method: String,
    /// `[args, options]`
    pub params: (Vec<Value>, Map<String, Value>),
}

impl Request {
    /// 从 JSON 值还原请求（批量命令的 args 条目即是序列化后的子请求）
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}

/// 响应报文里的错误成员
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseError {
    /// 服务端错误码
    #[serde(default)]
    pub code: i64,
    /// 服务端错误消息
    #[serde(default)]
    pub message: String,
    /// 服务端错误名（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// 响应报文：`{"result": ..., "error": ...}`
///
/// 单命令响应的 `result.result` 为规范记录；批量响应的 `result.results`
/// 为按提交顺序排列的子结果数组。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// 成功载荷
    #[serde(default)]
    pub result: Option<Value>,
    /// 协议级错误（与 `result` 互斥）
    #[serde(default)]
    pub error: Option<ResponseError>,
    /// 执行命令的服务端主体（principal）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
    /// 服务端 API 版本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 承载该报文的 HTTP 状态码（不在线上传输）
    #[serde(skip)]
    pub status: u16,
}

impl Response {
    /// `result.result` 成员 —— show/mod/add 返回的规范记录
    #[must_use]
    pub fn record(&self) -> Option<&Value> {
        self.result.as_ref().and_then(|r| r.get("result"))
    }

    /// `result.results` 成员 —— 批量响应的子结果数组
    #[must_use]
    pub fn results(&self) -> Option<&Vec<Value>> {
        self.result
            .as_ref()
            .and_then(|r| r.get("results"))
            .and_then(Value::as_array)
    }
}
