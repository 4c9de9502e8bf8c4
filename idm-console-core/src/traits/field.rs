//! 字段控件协作者契约

use serde_json::Value;

use crate::metadata::ParamMetadata;

/// 一个可编辑属性的 UI 状态绑定
///
/// 具体控件（文本框、多值编辑器、单选组）由外壳实现；核心只依赖
/// 装载/保存/脏检查/校验这组窄接口。
pub trait Field: Send {
    /// 属性名
    fn name(&self) -> &str;

    /// 模式已知参数的元数据；`None` 表示自由格式目录属性
    ///
    /// 区分决定保存编码：已知参数按标量/序列写入同名选项，未知属性
    /// 走 `setattr`/`addattr` 通用修改协议。
    fn param_info(&self) -> Option<&ParamMetadata>;

    /// 多值保存时是否拼接为一个逗号分隔的标量
    fn join(&self) -> bool {
        false
    }

    /// 从记录装载显示值，清除脏状态
    fn load(&mut self, record: &Value);

    /// 当前待保存值的有序序列
    fn save(&self) -> Vec<Value>;

    /// 当前值是否偏离最近一次装载
    fn is_dirty(&self) -> bool;

    /// 还原到最近一次装载的值
    fn reset(&mut self);

    /// 本地校验（含必填检查）是否通过
    fn is_valid(&self) -> bool;
}
