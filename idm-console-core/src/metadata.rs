//! 服务端模式元数据（schema）
//!
//! 启动引导从服务端拉取每个实体的参数模式与每个方法的参数/选项模式。
//! 详情 facet 用它区分“模式已知参数”与“自由格式目录属性”两种保存编码，
//! 新建对话框用它找主键参数。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 单个参数的模式
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamMetadata {
    /// 参数名
    pub name: String,
    /// 显示标签
    #[serde(default)]
    pub label: Option<String>,
    /// 是否为主键参数（主键永不作为修改发送）
    #[serde(default)]
    pub primary_key: bool,
    /// 是否多值
    #[serde(default)]
    pub multivalue: bool,
    /// 是否必填
    #[serde(default)]
    pub required: bool,
}

/// 实体级元数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// 实体名
    pub name: String,
    /// 复数显示标签
    #[serde(default)]
    pub label: Option<String>,
    /// 单数显示标签
    #[serde(default)]
    pub label_singular: Option<String>,
    /// 主键参数名
    #[serde(default)]
    pub primary_key: Option<String>,
    /// 实体接受的参数模式
    #[serde(default)]
    pub takes_params: Vec<ParamMetadata>,
    /// 成员属性映射：属性名 → 成员实体列表
    #[serde(default)]
    pub attribute_members: HashMap<String, Vec<String>>,
}

/// 方法级元数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodMetadata {
    /// 线上方法名
    pub name: String,
    /// 位置参数模式
    #[serde(default)]
    pub takes_args: Vec<ParamMetadata>,
    /// 具名选项模式
    #[serde(default)]
    pub takes_options: Vec<ParamMetadata>,
}

/// 元数据只读存储
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataStore {
    /// 实体名 → 实体元数据
    #[serde(default)]
    pub objects: HashMap<String, EntityMetadata>,
    /// 方法名 → 方法元数据
    #[serde(default)]
    pub methods: HashMap<String, MethodMetadata>,
}

impl MetadataStore {
    /// 实体元数据
    #[must_use]
    pub fn get_entity(&self, entity: &str) -> Option<&EntityMetadata> {
        self.objects.get(entity)
    }

    /// 实体参数模式
    #[must_use]
    pub fn get_entity_param(&self, entity: &str, name: &str) -> Option<&ParamMetadata> {
        self.objects
            .get(entity)?
            .takes_params
            .iter()
            .find(|p| p.name == name)
    }

    /// 方法位置参数模式
    #[must_use]
    pub fn get_method_arg(&self, method: &str, name: &str) -> Option<&ParamMetadata> {
        self.methods
            .get(method)?
            .takes_args
            .iter()
            .find(|p| p.name == name)
    }

    /// 方法选项模式
    #[must_use]
    pub fn get_method_option(&self, method: &str, name: &str) -> Option<&ParamMetadata> {
        self.methods
            .get(method)?
            .takes_options
            .iter()
            .find(|p| p.name == name)
    }

    /// 包含指定成员实体的属性名（如 `member` → `memberof`）
    #[must_use]
    pub fn get_member_attribute(&self, entity: &str, member: &str) -> Option<&str> {
        let object = self.objects.get(entity)?;
        object
            .attribute_members
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == member))
            .map(|(attribute, _)| attribute.as_str())
    }
}
