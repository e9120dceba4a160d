//! # 日志元数据解析
//!
//! `other` 字段是一段可选的 JSON 对象文本。解析是全函数：
//! 空串、非法 JSON、非对象 JSON 都得到一个空的 `LogMetadata`，
//! 所有访问器返回 `None`，调用方据此回退或省略。

use serde_json::{Map, Value};

const FIRST_RESPONSE_KEY: &str = "frt";
const MODEL_RATIO_KEY: &str = "model_ratio";
const GROUP_RATIO_KEY: &str = "group_ratio";

/// 解析后的元数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogMetadata {
    fields: Map<String, Value>,
}

impl LogMetadata {
    /// 解析元数据文本，永不失败
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => Self { fields },
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite())
    }

    /// 首字延迟（毫秒），仅正数有效
    #[must_use]
    pub fn first_response_ms(&self) -> Option<f64> {
        self.number(FIRST_RESPONSE_KEY).filter(|ms| *ms > 0.0)
    }

    /// 模型倍率
    #[must_use]
    pub fn model_ratio(&self) -> Option<f64> {
        self.number(MODEL_RATIO_KEY)
    }

    /// 分组倍率
    #[must_use]
    pub fn group_ratio(&self) -> Option<f64> {
        self.number(GROUP_RATIO_KEY)
    }

    /// 由存在的倍率拼出详情，两者都缺失时返回 `None`
    #[must_use]
    pub fn ratio_detail(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.model_ratio().map(|ratio| format!("模型: {ratio:.5}")),
            self.group_ratio().map(|ratio| format!("分组倍率: {ratio:.2}")),
        ]
        .into_iter()
        .flatten()
        .collect();

        (!parts.is_empty()).then(|| parts.join(" * "))
    }
}
