//! DNS 区域详情 facet
//!
//! 区域的启用开关不是 `mod` 的选项，而是独立的 `enable`/`disable`
//! 方法。本变体把一次保存拆成 `mod` 与 `enable`/`disable` 两条子命令，
//! 只把真正有修改的那条放进批量命令，一次往返提交。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use idm_console_rpc::{BatchCommand, Command, Outcome};

use crate::context::Context;
use crate::entity::Entity;
use crate::error::CoreResult;
use crate::facet::details::{notify_validation_failure, DetailsFacet};
use crate::facet::section::{encode_field_option, DetailsSection};
use crate::facet::{Facet, FacetState, UpdateOutcome};
use crate::utils::values::value_text;

/// DNS 区域详情 facet
///
/// 组合 [`DetailsFacet`]，装载/还原/脏检查显式委托基础实现，仅保存
/// 路径不同。
pub struct DnsZoneFacet {
    base: DetailsFacet,
    active_field: String,
}

impl DnsZoneFacet {
    /// 创建区域详情 facet
    ///
    /// `active_field` 是承载启用开关的字段名；其保存值为 `FALSE` 时
    /// 发 `disable`，否则发 `enable`。
    #[must_use]
    pub fn new(entity: Arc<Entity>, active_field: impl Into<String>) -> Self {
        Self {
            base: DetailsFacet::new(entity),
            active_field: active_field.into(),
        }
    }

    /// 基础详情 facet
    #[must_use]
    pub fn base(&self) -> &DetailsFacet {
        &self.base
    }

    /// 可变的基础详情 facet（区块注册等）
    pub fn base_mut(&mut self) -> &mut DetailsFacet {
        &mut self.base
    }

    /// 追加区块（透传基础实现）
    pub fn add_section(&mut self, section: DetailsSection) {
        self.base.add_section(section);
    }
}

#[async_trait]
impl Facet for DnsZoneFacet {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn state(&self) -> FacetState {
        self.base.state()
    }

    fn is_dirty(&self) -> bool {
        self.base.is_dirty()
    }

    fn load(&mut self, record: &Value) {
        self.base.load(record);
    }

    fn reset(&mut self) {
        self.base.reset();
    }

    async fn refresh(&mut self, ctx: &Context) -> CoreResult<()> {
        self.base.refresh(ctx).await
    }

    async fn update(&mut self, ctx: &Context) -> CoreResult<UpdateOutcome> {
        if !self.base.is_valid() {
            notify_validation_failure(ctx).await;
            return Ok(UpdateOutcome::ValidationFailed);
        }

        let args = self.base.sync_pkey(ctx);
        let entity_name = self.base.entity().name.clone();

        let mut modify = Command::for_entity(&entity_name, "mod");
        modify.add_args(args.clone());
        modify.set_option("all", true);
        modify.set_option("rights", true);
        let mut modify_changed = false;

        let mut toggle = Command::for_entity(&entity_name, "enable");
        toggle.add_args(args);
        toggle.set_option("all", true);
        toggle.set_option("rights", true);
        let mut toggle_changed = false;

        for section in self.base.sections_mut() {
            for field in section.fields_mut() {
                if !field.is_dirty() {
                    continue;
                }

                if field.name() == self.active_field {
                    let values = field.save();
                    let Some(first) = values.first() else {
                        continue;
                    };
                    if value_text(first) == "FALSE" {
                        toggle.method = "disable".to_string();
                    }
                    toggle_changed = true;
                    continue;
                }

                if encode_field_option(&mut modify, &**field) {
                    modify_changed = true;
                }
            }
        }

        if !modify_changed && !toggle_changed {
            log::debug!("[facet] {entity_name} update: no dirty fields, nothing to send");
            return Ok(UpdateOutcome::NoChanges);
        }

        let mut batch = BatchCommand::with_name(format!("{entity_name}_details_update"));
        if modify_changed {
            batch.add_command(modify);
        }
        if toggle_changed {
            batch.add_command(toggle);
        }

        self.base.set_state(FacetState::Saving);
        match batch.execute(ctx.rpc()).await {
            Outcome::Success(_) => {
                // 批量响应不含完整规范记录，保存后整体重新装载
                self.base.refresh(ctx).await?;
                Ok(UpdateOutcome::Updated)
            }
            Outcome::Failed(error) | Outcome::Dismissed(error) => {
                self.base.set_state(FacetState::Error);
                if let Err(refresh_error) = self.base.refresh(ctx).await {
                    log::warn!("[facet] {entity_name} refresh after failed update: {refresh_error}");
                }
                Err(error.into())
            }
        }
    }
}
