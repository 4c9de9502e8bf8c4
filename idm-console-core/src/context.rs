//! 应用上下文 —— 持有会话级全部依赖
//!
//! 会话启动时构造一次，按引用传给每个组件；不存在进程级全局状态，
//! 测试可以为每个用例构造隔离实例。

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use idm_console_rpc::{BatchCommand, Command, Outcome, RpcClient};

use crate::entity::{Entity, Registry};
use crate::error::CoreResult;
use crate::messages::Messages;
use crate::metadata::{MetadataStore, ParamMetadata};
use crate::traits::Navigation;

/// 应用上下文
pub struct Context {
    rpc: Arc<RpcClient>,
    navigation: Arc<dyn Navigation>,
    registry: Registry,
    metadata: Arc<RwLock<MetadataStore>>,
    messages: Arc<RwLock<Messages>>,
    whoami: Arc<RwLock<Option<Value>>>,
    env: Arc<RwLock<Option<Value>>>,
    dns_enabled: Arc<RwLock<bool>>,
}

impl Context {
    /// 创建上下文
    #[must_use]
    pub fn new(rpc: Arc<RpcClient>, navigation: Arc<dyn Navigation>) -> Self {
        Self {
            rpc,
            navigation,
            registry: Registry::new(),
            metadata: Arc::new(RwLock::new(MetadataStore::default())),
            messages: Arc::new(RwLock::new(Messages::default())),
            whoami: Arc::new(RwLock::new(None)),
            env: Arc::new(RwLock::new(None)),
            dns_enabled: Arc::new(RwLock::new(false)),
        }
    }

    /// RPC 客户端
    #[must_use]
    pub fn rpc(&self) -> &RpcClient {
        self.rpc.as_ref()
    }

    /// 导航协作者
    #[must_use]
    pub fn navigation(&self) -> &dyn Navigation {
        self.navigation.as_ref()
    }

    /// 实体注册表
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 取实体（必要时经工厂惰性构建）
    pub async fn get_entity(&self, name: &str) -> Option<Arc<Entity>> {
        self.registry.get(name, self).await
    }

    /// 启动引导：一个批次拉齐会话所需的服务端状态
    ///
    /// 子命令依次为模式元数据、i18n 消息目录、当前用户（whoami）、
    /// 服务端环境与 DNS 功能探测。批次不重试；整体失败向调用方传播，
    /// 单个子命令失败按批量部分失败语义处理。
    pub async fn init(&self) -> CoreResult<()> {
        let mut batch = BatchCommand::with_name("console_init");
        batch.set_retry(false);

        let metadata_cell = self.metadata.clone();
        let mut metadata_command = Command::new("json_metadata");
        metadata_command.on_success(move |response| {
            let Some(payload) = response.result.clone() else {
                return;
            };
            match serde_json::from_value::<MetadataStore>(payload) {
                Ok(store) => {
                    *metadata_cell.write().unwrap_or_else(PoisonError::into_inner) = store;
                }
                Err(e) => log::error!("[init] failed to decode schema metadata: {e}"),
            }
        });
        batch.add_command(metadata_command);

        let messages_cell = self.messages.clone();
        let mut messages_command = Command::new("i18n_messages");
        messages_command.on_success(move |response| {
            let Some(texts) = response
                .result
                .as_ref()
                .and_then(|r| r.get("messages"))
                .cloned()
            else {
                return;
            };
            match serde_json::from_value::<Messages>(texts) {
                Ok(catalog) => {
                    *messages_cell.write().unwrap_or_else(PoisonError::into_inner) = catalog;
                }
                Err(e) => log::error!("[init] failed to decode message catalog: {e}"),
            }
        });
        batch.add_command(messages_command);

        let whoami_cell = self.whoami.clone();
        let mut whoami_command = Command::for_entity("user", "find");
        whoami_command.set_option("whoami", true);
        whoami_command.set_option("all", true);
        whoami_command.on_success(move |response| {
            let entry = response
                .result
                .as_ref()
                .and_then(Value::as_array)
                .and_then(|entries| entries.first())
                .cloned();
            *whoami_cell.write().unwrap_or_else(PoisonError::into_inner) = entry;
        });
        batch.add_command(whoami_command);

        let env_cell = self.env.clone();
        let mut env_command = Command::new("env");
        env_command.on_success(move |response| {
            *env_cell.write().unwrap_or_else(PoisonError::into_inner) = response.result.clone();
        });
        batch.add_command(env_command);

        let dns_cell = self.dns_enabled.clone();
        let mut dns_command = Command::for_entity("dns", "is_enabled");
        dns_command.on_success(move |response| {
            let enabled = response
                .result
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(false);
            *dns_cell.write().unwrap_or_else(PoisonError::into_inner) = enabled;
        });
        batch.add_command(dns_command);

        match batch.execute(self.rpc()).await {
            Outcome::Success(_) => {
                for error in batch.errors() {
                    log::warn!("[init] {}: {}", error.name, error.message);
                }
                Ok(())
            }
            Outcome::Failed(error) | Outcome::Dismissed(error) => Err(error.into()),
        }
    }

    /// 消息目录快照
    #[must_use]
    pub fn messages(&self) -> Messages {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 覆盖消息目录（嵌入层或测试使用）
    pub fn set_messages(&self, messages: Messages) {
        *self.messages.write().unwrap_or_else(PoisonError::into_inner) = messages;
    }

    /// 元数据存储快照
    #[must_use]
    pub fn metadata(&self) -> MetadataStore {
        self.metadata
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 覆盖元数据存储（嵌入层或测试使用）
    pub fn set_metadata(&self, store: MetadataStore) {
        *self.metadata.write().unwrap_or_else(PoisonError::into_inner) = store;
    }

    /// 实体参数模式
    #[must_use]
    pub fn get_entity_param(&self, entity: &str, name: &str) -> Option<ParamMetadata> {
        self.metadata
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_entity_param(entity, name)
            .cloned()
    }

    /// 方法位置参数模式
    #[must_use]
    pub fn get_method_arg(&self, method: &str, name: &str) -> Option<ParamMetadata> {
        self.metadata
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_method_arg(method, name)
            .cloned()
    }

    /// 方法选项模式
    #[must_use]
    pub fn get_method_option(&self, method: &str, name: &str) -> Option<ParamMetadata> {
        self.metadata
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_method_option(method, name)
            .cloned()
    }

    /// 实体主键参数名
    #[must_use]
    pub fn entity_primary_key(&self, entity: &str) -> Option<String> {
        self.metadata
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_entity(entity)
            .and_then(|m| m.primary_key.clone())
    }

    /// 实体单数显示标签（缺省回退到复数标签）
    #[must_use]
    pub fn entity_singular_label(&self, entity: &str) -> Option<String> {
        let store = self.metadata.read().unwrap_or_else(PoisonError::into_inner);
        let metadata = store.get_entity(entity)?;
        metadata
            .label_singular
            .clone()
            .or_else(|| metadata.label.clone())
    }

    /// 当前用户记录（引导后可用）
    #[must_use]
    pub fn whoami(&self) -> Option<Value> {
        self.whoami
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 服务端环境（引导后可用）
    #[must_use]
    pub fn env(&self) -> Option<Value> {
        self.env
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 服务端是否启用 DNS 管理
    #[must_use]
    pub fn dns_enabled(&self) -> bool {
        *self
            .dns_enabled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_context;
    use serde_json::json;

    #[test]
    fn metadata_helpers_read_store() {
        let (ctx, _transport, _nav) = test_context();
        ctx.set_metadata(
            serde_json::from_value(json!({
                "objects": {
                    "user": {
                        "name": "user",
                        "label_singular": "User",
                        "primary_key": "uid",
                        "takes_params": [{"name": "uid", "primary_key": true}]
                    }
                },
                "methods": {}
            }))
            .unwrap(),
        );

        assert_eq!(ctx.entity_primary_key("user"), Some("uid".to_string()));
        assert_eq!(ctx.entity_singular_label("user"), Some("User".to_string()));
        assert!(ctx.get_entity_param("user", "uid").unwrap().primary_key);
        assert!(ctx.get_entity_param("user", "mail").is_none());
    }

    #[test]
    fn messages_default_until_overridden() {
        let (ctx, _transport, _nav) = test_context();
        assert_eq!(ctx.messages().buttons.ok, "OK");

        let mut messages = Messages::default();
        messages.buttons.ok = "Weiter".to_string();
        ctx.set_messages(messages);
        assert_eq!(ctx.messages().buttons.ok, "Weiter");
    }
}
