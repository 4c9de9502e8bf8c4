//! 导航协作者契约
//!
//! 路由与面包屑由外壳实现；核心只读取按键索引的导航状态（当前主键、
//! 过滤条件），并在需要跳转时发出页面展示请求。

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// 导航状态协作者
pub trait Navigation: Send + Sync {
    /// 读取一项导航状态（如 `user-pkey`），不存在时返回 `None`
    fn get_state(&self, key: &str) -> Option<String>;

    /// 请求展示某实体的某个 facet 页面
    fn show_page(&self, entity: &str, facet: &str, pkey: Option<&str>);
}

/// 基于内存映射的导航实现
///
/// 缺省实现，测试与无壳嵌入场景可直接使用。`show_page` 记录最后一次
/// 跳转请求供外壳轮询。
#[derive(Debug, Default)]
pub struct StaticNavigation {
    state: Mutex<HashMap<String, String>>,
    last_page: Mutex<Option<(String, String, Option<String>)>>,
}

impl StaticNavigation {
    /// 创建空导航状态
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一项导航状态
    pub fn set_state(&self, key: impl Into<String>, value: impl Into<String>) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// 清除一项导航状态
    pub fn clear_state(&self, key: &str) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// 最后一次 `show_page` 请求：`(entity, facet, pkey)`
    #[must_use]
    pub fn last_page(&self) -> Option<(String, String, Option<String>)> {
        self.last_page
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigation for StaticNavigation {
    fn get_state(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn show_page(&self, entity: &str, facet: &str, pkey: Option<&str>) {
        log::debug!("[nav] show {entity}/{facet} pkey={pkey:?}");
        *self
            .last_page
            .lock()
            .unwrap_or_else(PoisonError::into_inner) =
            Some((entity.to_string(), facet.to_string(), pkey.map(str::to_string)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trip() {
        let nav = StaticNavigation::new();
        assert_eq!(nav.get_state("user-pkey"), None);

        nav.set_state("user-pkey", "admin");
        assert_eq!(nav.get_state("user-pkey"), Some("admin".to_string()));

        nav.clear_state("user-pkey");
        assert_eq!(nav.get_state("user-pkey"), None);
    }

    #[test]
    fn show_page_records_request() {
        let nav = StaticNavigation::new();
        nav.show_page("user", "default", Some("jsmith"));
        assert_eq!(
            nav.last_page(),
            Some((
                "user".to_string(),
                "default".to_string(),
                Some("jsmith".to_string())
            ))
        );
    }
}
