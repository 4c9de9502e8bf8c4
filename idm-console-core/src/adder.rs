//! 新建实体对话框的提交流程
//!
//! 对话框铬（按钮、模态显隐）由外壳负责；这里只实现把字段值聚合成
//! `add` 命令、执行并按触发按钮选择完成策略的状态机。

use std::sync::Arc;

use idm_console_rpc::{Command, Outcome};

use crate::context::Context;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::facet::DetailsSection;
use crate::utils::values::{join_values, value_text};
use crate::utils::OrderedMap;

/// 触发提交的按钮，决定成功后的完成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddAction {
    /// 关闭对话框并刷新列表
    Add,
    /// 行内确认并重置表单，继续录入下一条
    AddAndAddAnother,
    /// 关闭对话框并跳转到新实体的详情页
    AddAndEdit,
}

/// `add` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// 已创建；外壳应关闭对话框并刷新列表 facet
    Closed,
    /// 已创建；表单已重置，携带行内确认文案
    ResetForAnother(String),
    /// 已创建；已请求跳转到详情页，携带新实体主键
    NavigatedToDetails(String),
    /// 本地校验失败；静默中止，未发送任何命令
    ValidationFailed,
}

/// 预执行钩子
pub type PreExecuteHook = Box<dyn FnMut(&mut Command) + Send>;

/// 新建实体对话框
pub struct AdderDialog {
    entity: Arc<Entity>,
    method: String,
    retry: bool,
    sections: OrderedMap<DetailsSection>,
    message: Option<String>,
    pre_execute: Option<PreExecuteHook>,
}

impl AdderDialog {
    /// 创建 `add` 方法的对话框
    #[must_use]
    pub fn new(entity: Arc<Entity>) -> Self {
        Self {
            entity,
            method: "add".to_string(),
            retry: true,
            sections: OrderedMap::new(),
            message: None,
            pre_execute: None,
        }
    }

    /// 覆盖提交方法名（个别实体用专用创建方法）
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// 失败时是否先弹重试对话框
    #[must_use]
    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    /// 所属实体
    #[must_use]
    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    /// 追加区块
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

    /// 安装 pre-execute 钩子
    pub fn set_pre_execute(&mut self, hook: impl FnMut(&mut Command) + Send + 'static) {
        self.pre_execute = Some(Box::new(hook));
    }

    /// 当前展示的行内确认文案
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// 所有区块都通过本地校验
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.sections.values().all(DetailsSection::is_valid)
    }

    /// 重置表单与行内确认
    pub fn reset(&mut self) {
        for section in self.sections.values_mut() {
            section.reset();
        }
        self.message = None;
    }

    /// 构建并执行创建命令，按 `action` 选择完成策略
    ///
    /// 父实体键前缀预置为位置参数；每个字段的保存值逗号拼接后，主键
    /// 字段作为位置参数，其余作为同名选项。校验失败静默中止。
    pub async fn add(&mut self, ctx: &Context, action: AddAction) -> CoreResult<AddOutcome> {
        if !self.is_valid() {
            log::debug!("[adder] {} validation failed, aborting", self.entity.name);
            return Ok(AddOutcome::ValidationFailed);
        }

        let pkey_name = ctx.entity_primary_key(&self.entity.name);

        let mut command = Command::for_entity(&self.entity.name, &self.method);
        command.retry = self.retry;
        command.add_args(self.entity.primary_key_prefix(ctx.navigation()));

        for section in self.sections.values() {
            for field in section.fields() {
                let values = field.save();
                if values.is_empty() {
                    continue;
                }
                let value = join_values(&values);
                if value.is_empty() {
                    continue;
                }
                if pkey_name.as_deref() == Some(field.name()) {
                    command.add_arg(value);
                } else {
                    command.set_option(field.name(), value);
                }
            }
        }

        if let Some(hook) = self.pre_execute.as_mut() {
            hook(&mut command);
        }

        match command.execute(ctx.rpc()).await {
            Outcome::Success(response) => match action {
                AddAction::Add => Ok(AddOutcome::Closed),
                AddAction::AddAndAddAnother => {
                    let label = ctx
                        .entity_singular_label(&self.entity.name)
                        .or_else(|| self.entity.label.clone())
                        .unwrap_or_else(|| self.entity.name.clone());
                    let message = ctx.messages().add_confirmation(&label);
                    self.reset();
                    self.message = Some(message.clone());
                    Ok(AddOutcome::ResetForAnother(message))
                }
                AddAction::AddAndEdit => {
                    let record = response.record().ok_or_else(|| {
                        CoreError::MalformedResponse("add response carries no record".to_string())
                    })?;
                    let pkey = extract_pkey(record, pkey_name.as_deref()).ok_or_else(|| {
                        CoreError::MalformedResponse(
                            "created record carries no primary key".to_string(),
                        )
                    })?;
                    ctx.navigation()
                        .show_page(&self.entity.name, "default", Some(&pkey));
                    Ok(AddOutcome::NavigatedToDetails(pkey))
                }
            },
            Outcome::Failed(error) | Outcome::Dismissed(error) => Err(error.into()),
        }
    }
}

/// 从创建响应的记录里取主键值（数组取首元素）
fn extract_pkey(record: &serde_json::Value, pkey_name: Option<&str>) -> Option<String> {
    let value = record.get(pkey_name?)?;
    match value {
        serde_json::Value::Array(values) => values.first().map(value_text),
        other => Some(value_text(other)),
    }
}
