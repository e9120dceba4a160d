//! # 实体定义测试

use crate::logs;
use sea_orm::{EntityName, IdenStatic, Set};

#[tokio::test]
async fn test_log_entry_creation() {
    let entry = logs::ActiveModel {
        user_id: Set(7),
        created_at: Set(1_700_000_000),
        log_type: Set(2),
        username: Set("alice".to_string()),
        model_name: Set("gpt-4o".to_string()),
        quota: Set(350_000),
        is_stream: Set(true),
        other: Set(r#"{"frt":850}"#.to_string()),
        ..Default::default()
    };

    assert_eq!(entry.username.as_ref(), "alice");
    assert_eq!(entry.quota.as_ref(), &350_000);
    assert_eq!(entry.is_stream.as_ref(), &true);
}

#[test]
fn test_log_type_column_maps_to_type() {
    assert_eq!(logs::Column::LogType.as_str(), "type");
    assert_eq!(logs::Column::ChannelId.as_str(), "channel_id");
    assert_eq!(logs::Entity.table_name(), "logs");
}

#[test]
fn test_model_serializes_with_wire_names() {
    let model = logs::Model {
        id: 1,
        user_id: 1,
        created_at: 1,
        log_type: 2,
        content: String::new(),
        username: "bob".to_string(),
        token_name: "default".to_string(),
        model_name: "gpt-4o-mini".to_string(),
        quota: 10,
        prompt_tokens: 1,
        completion_tokens: 2,
        use_time: 1,
        is_stream: false,
        channel_id: 3,
        token_id: 4,
        group: "default".to_string(),
        request_key: "req-1".to_string(),
        other: String::new(),
    };
    let value = serde_json::to_value(&model).expect("serialize log model");
    assert_eq!(value["type"], 2);
    assert_eq!(value["channel"], 3);
    assert!(value.get("log_type").is_none());
}
