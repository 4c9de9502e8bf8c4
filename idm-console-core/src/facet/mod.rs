//! Facet 生命周期
//!
//! 一个 facet 是实体的一种视图（详情、搜索……）。这里实现详情视图的
//! 状态机：装载 → 编辑 → 校验 → 差异 → 保存 → 对账。

mod details;
mod dns_zone;
mod section;

pub use details::{DetailsFacet, PostUpdateAction, PostUpdateHook, PreExecuteHook};
pub use dns_zone::DnsZoneFacet;
pub use section::{DetailsSection, SectionSave};

use async_trait::async_trait;
use serde_json::Value;

use crate::context::Context;
use crate::error::CoreResult;

/// 详情 facet 的生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacetState {
    /// 尚未装载
    #[default]
    Idle,
    /// show 命令在途
    Loading,
    /// 已装载（编辑中由 `is_dirty` 区分）
    Loaded,
    /// mod 命令在途
    Saving,
    /// 最近一次装载或保存失败
    Error,
}

/// `update` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// 无脏字段；未发送任何命令，也不触发任何回调
    NoChanges,
    /// 已保存并从服务端返回的规范记录重载
    Updated,
    /// 本地校验失败；未发送任何命令
    ValidationFailed,
    /// post-update 钩子接管了对账（如记录已删除需跳转）
    Intercepted,
}

/// 实体实例视图的生命周期能力
///
/// 变体（如 DNS 区域详情）组合 [`DetailsFacet`] 并显式调用其具名的
/// 基础实现，而不是覆盖别名。
#[async_trait]
pub trait Facet: Send {
    /// facet 名
    fn name(&self) -> &str;

    /// 当前状态
    fn state(&self) -> FacetState;

    /// 是否有未保存修改
    fn is_dirty(&self) -> bool;

    /// 用记录替换显示值并清除脏状态
    fn load(&mut self, record: &Value);

    /// 放弃未保存修改，还原到最近一次装载
    fn reset(&mut self);

    /// 从导航状态重读主键并向服务端装载
    async fn refresh(&mut self, ctx: &Context) -> CoreResult<()>;

    /// 校验、收集差异、保存并对账
    async fn update(&mut self, ctx: &Context) -> CoreResult<UpdateOutcome>;
}
