//! 实体与实体注册表

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::context::Context;
use crate::traits::Navigation;
use crate::utils::OrderedMap;

/// 一种受管对象类型（用户、用户组、DNS 区域……）
///
/// 只承载寻址与展示所需的骨架；参数模式在元数据存储里按名查询。
#[derive(Debug, Clone)]
pub struct Entity {
    /// 实体名（同时是线上方法名的前缀）
    pub name: String,
    /// 显示标签；缺省用元数据里的标签
    pub label: Option<String>,
    /// 父实体（嵌套实体的键前缀来源，如 DNS 记录之于 DNS 区域）
    pub containing_entity: Option<Arc<Entity>>,
    /// 无主键可展示时跳转到的 facet
    pub redirect_facet: Option<String>,
}

impl Entity {
    /// 创建实体骨架
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            containing_entity: None,
            redirect_facet: None,
        }
    }

    /// 导航状态里存放本实体主键的键名
    #[must_use]
    pub fn pkey_state_key(&self) -> String {
        format!("{}-pkey", self.name)
    }

    /// 父实体键前缀，最外层在前
    ///
    /// show/mod/add 的位置参数以此开头；多数实体前缀为空，嵌套实体
    /// （如 DNS 记录）带上区域主键。
    #[must_use]
    pub fn primary_key_prefix(&self, navigation: &dyn Navigation) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self.containing_entity.clone();
        while let Some(parent) = current {
            chain.push(parent.clone());
            current = parent.containing_entity.clone();
        }

        let mut prefix = Vec::new();
        for parent in chain.iter().rev() {
            match navigation.get_state(&parent.pkey_state_key()) {
                Some(pkey) => prefix.push(pkey),
                None => {
                    log::warn!(
                        "[entity] no navigation pkey for containing entity {}",
                        parent.name
                    );
                }
            }
        }
        prefix
    }
}

/// 实体工厂
///
/// 返回 `None` 表示“有意不注册”——例如服务端停用了对应功能。
/// 注册表据此跳过插入，不把缺席当作错误。
pub type EntityFactory = Box<dyn Fn(&Context) -> Option<Arc<Entity>> + Send + Sync>;

/// 实体注册表
///
/// 实体按工厂惰性构建，插入顺序即导航展示顺序。
#[derive(Default)]
pub struct Registry {
    factories: RwLock<HashMap<String, EntityFactory>>,
    entities: RwLock<OrderedMap<Arc<Entity>>>,
}

impl Registry {
    /// 创建空注册表
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个实体工厂
    pub async fn register(&self, name: impl Into<String>, factory: EntityFactory) {
        self.factories.write().await.insert(name.into(), factory);
    }

    /// 直接插入已构建的实体
    pub async fn add_entity(&self, entity: Arc<Entity>) {
        self.entities
            .write()
            .await
            .put(entity.name.clone(), entity);
    }

    /// 注销实体
    pub async fn remove(&self, name: &str) {
        self.entities.write().await.remove(name);
    }

    /// 取实体，必要时经工厂惰性构建
    ///
    /// 工厂返回 `None` 时该实体视作未注册，后续调用会再次询问工厂
    /// （功能开关可能在会话内变化）。
    pub async fn get(&self, name: &str, ctx: &Context) -> Option<Arc<Entity>> {
        if let Some(entity) = self.entities.read().await.get(name) {
            return Some(entity.clone());
        }

        let built = {
            let factories = self.factories.read().await;
            let factory = factories.get(name)?;
            factory(ctx)
        };

        match built {
            Some(entity) => {
                self.add_entity(entity.clone()).await;
                Some(entity)
            }
            None => {
                log::debug!("[entity] {name} intentionally not registered");
                None
            }
        }
    }

    /// 已注册实体名，按插入顺序
    pub async fn names(&self) -> Vec<String> {
        self.entities
            .read()
            .await
            .keys()
            .map(str::to_string)
            .collect()
    }
}
