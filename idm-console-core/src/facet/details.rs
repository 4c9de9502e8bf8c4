//! 详情 facet —— 单个实体实例的装载/编辑/保存生命周期

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use idm_console_rpc::{Command, Outcome, Response};

use crate::context::Context;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::facet::section::DetailsSection;
use crate::facet::{Facet, FacetState, UpdateOutcome};
use crate::utils::OrderedMap;

/// post-update 钩子的裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostUpdateAction {
    /// 继续用响应里的规范记录重载
    Reload,
    /// 钩子已自行对账（例如记录已逻辑删除，改为弹出跳转对话框）
    Handled,
}

/// 命令发出前的检查/调整钩子
pub type PreExecuteHook = Box<dyn FnMut(&mut Command) + Send>;
/// 保存成功后的对账钩子
pub type PostUpdateHook = Box<dyn FnMut(&Response, &Context) -> PostUpdateAction + Send>;

/// 详情 facet
///
/// 每次装载/保存前都从导航状态重读主键，绝不基于过期身份操作。
pub struct DetailsFacet {
    name: String,
    entity: Arc<Entity>,
    sections: OrderedMap<DetailsSection>,
    pkey: Option<String>,
    record: Option<Value>,
    state: FacetState,
    pre_execute: Option<PreExecuteHook>,
    post_update: Option<PostUpdateHook>,
}

impl DetailsFacet {
    /// 创建详情 facet
    #[must_use]
    pub fn new(entity: Arc<Entity>) -> Self {
        Self {
            name: "details".to_string(),
            entity,
            sections: OrderedMap::new(),
            pkey: None,
            record: None,
            state: FacetState::Idle,
            pre_execute: None,
            post_update: None,
        }
    }

    /// 所属实体
    #[must_use]
    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    /// 追加区块（注册顺序即展示顺序），回填实体名
    pub fn add_section(&mut self, mut section: DetailsSection) {
        section.entity = self.entity.name.clone();
        self.sections.put(section.name.clone(), section);
    }

    /// 按名取区块
    #[must_use]
    pub fn get_section(&self, name: &str) -> Option<&DetailsSection> {
        self.sections.get(name)
    }

    /// 按名取可变区块
    pub fn get_section_mut(&mut self, name: &str) -> Option<&mut DetailsSection> {
        self.sections.get_mut(name)
    }

    /// 按注册顺序迭代区块
    pub fn sections(&self) -> impl Iterator<Item = &DetailsSection> {
        self.sections.values()
    }

    pub(crate) fn sections_mut(&mut self) -> impl Iterator<Item = &mut DetailsSection> {
        self.sections.values_mut()
    }

    /// 安装 pre-execute 钩子
    pub fn set_pre_execute(&mut self, hook: impl FnMut(&mut Command) + Send + 'static) {
        self.pre_execute = Some(Box::new(hook));
    }

    /// 安装 post-update 钩子
    pub fn set_post_update(
        &mut self,
        hook: impl FnMut(&Response, &Context) -> PostUpdateAction + Send + 'static,
    ) {
        self.post_update = Some(Box::new(hook));
    }

    /// 当前主键（最近一次同步导航状态的结果）
    #[must_use]
    pub fn pkey(&self) -> Option<&str> {
        self.pkey.as_deref()
    }

    /// 最近一次装载的记录
    #[must_use]
    pub fn record(&self) -> Option<&Value> {
        self.record.as_ref()
    }

    /// 所有区块都通过本地校验
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.sections.values().all(DetailsSection::is_valid)
    }

    pub(crate) fn set_state(&mut self, state: FacetState) {
        self.state = state;
    }

    /// 从导航状态重读主键，返回完整位置参数（父键前缀 + 本键）
    pub(crate) fn sync_pkey(&mut self, ctx: &Context) -> Vec<String> {
        self.pkey = ctx.navigation().get_state(&self.entity.pkey_state_key());
        let mut args = self.entity.primary_key_prefix(ctx.navigation());
        if let Some(pkey) = &self.pkey {
            args.push(pkey.clone());
        }
        args
    }

    /// 基础差异收集：把每个脏区块写入命令，返回是否有任何修改
    ///
    /// 声明了自定义保存的区块整体委托给钩子；其余区块逐字段做标准
    /// 编码（主键跳过、标量/序列/`setattr` 规则见区块模块）。
    pub(crate) fn collect_changes(&mut self, command: &mut Command) -> bool {
        let mut changed = false;
        for section in self.sections.values_mut() {
            if !section.is_dirty() {
                continue;
            }
            if section.has_custom_save() {
                section.apply_custom_save(command);
                changed = true;
                continue;
            }
            if section.save_dirty_fields(command) {
                changed = true;
            }
        }
        changed
    }

    pub(crate) fn run_pre_execute(&mut self, command: &mut Command) {
        if let Some(hook) = self.pre_execute.as_mut() {
            hook(command);
        }
    }
}

/// 本地校验失败：弹出消息对话框，不发送任何命令
pub(crate) async fn notify_validation_failure(ctx: &Context) {
    let messages = ctx.messages();
    ctx.rpc()
        .dialogs()
        .notify(
            &messages.dialogs.validation_title,
            &messages.dialogs.validation_message,
        )
        .await;
}

#[async_trait]
impl Facet for DetailsFacet {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> FacetState {
        self.state
    }

    fn is_dirty(&self) -> bool {
        self.sections.values().any(DetailsSection::is_dirty)
    }

    fn load(&mut self, record: &Value) {
        for section in self.sections.values_mut() {
            section.load(record);
        }
        self.record = Some(record.clone());
        self.state = FacetState::Loaded;
    }

    fn reset(&mut self) {
        for section in self.sections.values_mut() {
            section.reset();
        }
    }

    async fn refresh(&mut self, ctx: &Context) -> CoreResult<()> {
        let args = self.sync_pkey(ctx);

        let mut command = Command::for_entity(&self.entity.name, "show");
        command.set_option("all", true);
        command.set_option("rights", true);

        if self.pkey.is_some() {
            command.add_args(args);
        } else if let Some(redirect) = &self.entity.redirect_facet {
            log::debug!(
                "[facet] {} has no pkey, redirecting to {redirect}",
                self.entity.name
            );
            ctx.navigation().show_page(&self.entity.name, redirect, None);
            return Ok(());
        }

        self.run_pre_execute(&mut command);

        self.state = FacetState::Loading;
        match command.execute(ctx.rpc()).await {
            Outcome::Success(response) => match response.record() {
                Some(record) => {
                    let record = record.clone();
                    self.load(&record);
                    Ok(())
                }
                None => {
                    self.state = FacetState::Error;
                    Err(CoreError::MalformedResponse(
                        "show response carries no record".to_string(),
                    ))
                }
            },
            Outcome::Failed(error) | Outcome::Dismissed(error) => {
                self.state = FacetState::Error;
                Err(error.into())
            }
        }
    }

    async fn update(&mut self, ctx: &Context) -> CoreResult<UpdateOutcome> {
        if !self.is_valid() {
            notify_validation_failure(ctx).await;
            return Ok(UpdateOutcome::ValidationFailed);
        }

        let args = self.sync_pkey(ctx);

        let mut command = Command::for_entity(&self.entity.name, "mod");
        command.add_args(args);
        command.set_option("all", true);
        command.set_option("rights", true);

        if !self.collect_changes(&mut command) {
            log::debug!(
                "[facet] {} update: no dirty fields, nothing to send",
                self.entity.name
            );
            return Ok(UpdateOutcome::NoChanges);
        }

        self.run_pre_execute(&mut command);

        self.state = FacetState::Saving;
        match command.execute(ctx.rpc()).await {
            Outcome::Success(response) => {
                if let Some(mut hook) = self.post_update.take() {
                    let action = hook(&response, ctx);
                    self.post_update = Some(hook);
                    if action == PostUpdateAction::Handled {
                        self.state = FacetState::Idle;
                        return Ok(UpdateOutcome::Intercepted);
                    }
                }
                match response.record() {
                    Some(record) => {
                        // 只信服务端回传的规范记录，不回显本地值
                        let record = record.clone();
                        self.load(&record);
                        Ok(UpdateOutcome::Updated)
                    }
                    None => {
                        self.state = FacetState::Error;
                        Err(CoreError::MalformedResponse(
                            "mod response carries no record".to_string(),
                        ))
                    }
                }
            }
            Outcome::Failed(error) | Outcome::Dismissed(error) => {
                self.state = FacetState::Error;
                Err(error.into())
            }
        }
    }
}
