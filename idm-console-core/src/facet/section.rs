//! 详情区块 —— 共同装载、共同保存的一组字段

use serde_json::Value;

use idm_console_rpc::Command;

use crate::traits::Field;
use crate::utils::values::{join_values, value_text};
use crate::utils::OrderedMap;

/// 区块级自定义保存钩子
///
/// 常规区块按字段逐个差异编码；分组方式非常规的区块（如跨两个服务端
/// 方法的开关字段）实现此 trait，把待保存状态直接写入命令选项。
pub trait SectionSave: Send {
    /// 把区块的待保存状态写入命令
    fn save(&mut self, fields: &OrderedMap<Box<dyn Field>>, command: &mut Command);
}

/// 详情区块
///
/// 字段按注册顺序展示，名字唯一。区块不拥有实体，只保留实体名回引。
pub struct DetailsSection {
    /// 区块名
    pub name: String,
    /// 显示标签
    pub label: String,
    /// 所属实体名（加入 facet 时回填）
    pub entity: String,
    fields: OrderedMap<Box<dyn Field>>,
    custom_save: Option<Box<dyn SectionSave>>,
}

impl DetailsSection {
    /// 创建空区块
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            entity: String::new(),
            fields: OrderedMap::new(),
            custom_save: None,
        }
    }

    /// 追加字段（注册顺序即展示顺序）
    pub fn add_field(&mut self, field: Box<dyn Field>) {
        self.fields.put(field.name().to_string(), field);
    }

    /// 按名取字段
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&dyn Field> {
        self.fields.get(name).map(|field| &**field)
    }

    /// 按注册顺序迭代字段
    pub fn fields(&self) -> impl Iterator<Item = &dyn Field> {
        self.fields.values().map(|field| &**field)
    }

    /// 按注册顺序可变迭代字段
    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Field>> {
        self.fields.values_mut()
    }

    /// 安装自定义保存钩子
    pub fn set_custom_save(&mut self, save: Box<dyn SectionSave>) {
        self.custom_save = Some(save);
    }

    /// 是否声明了自定义保存
    #[must_use]
    pub fn has_custom_save(&self) -> bool {
        self.custom_save.is_some()
    }

    /// 执行自定义保存钩子
    pub(crate) fn apply_custom_save(&mut self, command: &mut Command) {
        if let Some(hook) = self.custom_save.as_mut() {
            hook.save(&self.fields, command);
        }
    }

    /// 标准保存编码：把每个脏字段写入命令；返回是否写入了任何内容
    pub(crate) fn save_dirty_fields(&self, command: &mut Command) -> bool {
        let mut changed = false;
        for field in self.fields() {
            if !field.is_dirty() {
                continue;
            }
            if encode_field_option(command, field) {
                changed = true;
            }
        }
        changed
    }

    /// 从记录装载所有字段
    pub fn load(&mut self, record: &Value) {
        for field in self.fields.values_mut() {
            field.load(record);
        }
    }

    /// 还原所有字段
    pub fn reset(&mut self) {
        for field in self.fields.values_mut() {
            field.reset();
        }
    }

    /// 任一字段为脏即区块为脏
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.fields.values().any(|field| field.is_dirty())
    }

    /// 所有字段都通过本地校验
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|field| field.is_valid())
    }
}

/// 把一个字段的待保存值编码进命令
///
/// 模式已知参数：单值写标量选项，配置拼接时写逗号拼接标量，其余写
/// 有序序列；主键参数跳过。模式未知的目录属性：首值 `setattr
/// name=value`，其余逐个 `addattr name=value`，对应服务端通用属性
/// 修改协议的替换/追加语义。
///
/// 返回是否向命令写入了内容。
pub(crate) fn encode_field_option(command: &mut Command, field: &dyn Field) -> bool {
    let mut values = field.save();

    if let Some(param) = field.param_info() {
        if param.primary_key {
            // 身份永不作为修改发送
            return false;
        }
        if values.len() == 1 {
            command.set_option(field.name(), values.remove(0));
        } else if field.join() {
            command.set_option(field.name(), join_values(&values));
        } else {
            command.set_option(field.name(), Value::Array(values));
        }
    } else {
        let name = field.name();
        let mut iter = values.iter();
        match iter.next() {
            Some(first) => {
                command.add_option("setattr", format!("{name}={}", value_text(first)));
            }
            None => {
                command.add_option("setattr", format!("{name}="));
            }
        }
        for value in iter {
            command.add_option("addattr", format!("{name}={}", value_text(value)));
        }
    }

    true
}
