//! # 日志导出
//!
//! 先按过滤条件取出至多 `max_rows` 行，查询失败时直接返回错误；
//! 查询成功后由后台任务逐行编码为 CSV 推入有界通道，
//! 接收端断开（客户端取消下载）后立即停止。

use super::filter::LogFilter;
use super::metadata::LogMetadata;
use super::query::LogQueryService;
use super::types::{LogEntry, PageRequest};
use crate::config::LogsConfig;
use crate::error::Result;
use crate::types::timezone_utils;
use crate::{
    ldebug,
    logging::{LogComponent, LogStage},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// UTF-8 BOM，表格软件据此识别编码
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 导出表头
pub const EXPORT_HEADERS: [&str; 13] = [
    "时间",
    "用户",
    "令牌",
    "类型",
    "模型",
    "用时/首字",
    "输入",
    "输出",
    "花费",
    "实际花费",
    "实际用量",
    "渠道",
    "详情",
];

const STREAM_MARKER: &str = " 流";
const EXPORT_CHANNEL_CAPACITY: usize = 64;

/// 导出参数
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub max_rows: u64,
    pub quota_per_unit: f64,
    pub currency_symbol: String,
}

impl From<&LogsConfig> for ExportSettings {
    fn from(config: &LogsConfig) -> Self {
        Self {
            max_rows: config.export_max_rows,
            quota_per_unit: config.quota_per_unit,
            currency_symbol: config.currency_symbol.clone(),
        }
    }
}

/// 导出结果：文件名和字节流
pub struct ExportArtifact {
    pub filename: String,
    pub row_count: usize,
    stream: ReceiverStream<std::io::Result<Bytes>>,
}

impl ExportArtifact {
    #[must_use]
    pub fn into_stream(self) -> ReceiverStream<std::io::Result<Bytes>> {
        self.stream
    }
}

/// 导出引擎
#[derive(Clone)]
pub struct ExportEngine {
    query: LogQueryService,
    settings: ExportSettings,
}

impl ExportEngine {
    #[must_use]
    pub const fn new(query: LogQueryService, settings: ExportSettings) -> Self {
        Self { query, settings }
    }

    /// 导出匹配的日志，时间按 `timezone` 展示
    pub async fn export(&self, filter: &LogFilter, timezone: Tz) -> Result<ExportArtifact> {
        let page = self
            .query
            .list_all(filter, PageRequest::new(0, self.settings.max_rows))
            .await?;
        let rows = page.items;
        let row_count = rows.len();

        let formatter = RowFormatter::new(self.settings.clone(), timezone);
        let (tx, rx) = mpsc::channel(EXPORT_CHANNEL_CAPACITY);
        tokio::spawn(stream_rows(tx, formatter, rows));

        Ok(ExportArtifact {
            filename: export_filename(Utc::now(), &timezone),
            row_count,
            stream: ReceiverStream::new(rx),
        })
    }
}

async fn stream_rows(
    tx: mpsc::Sender<std::io::Result<Bytes>>,
    formatter: RowFormatter,
    rows: Vec<LogEntry>,
) {
    let head = encode_record(EXPORT_HEADERS).map(|header| {
        let mut head = UTF8_BOM.to_vec();
        head.extend_from_slice(&header);
        Bytes::from(head)
    });
    let failed = head.is_err();
    if tx.send(head).await.is_err() || failed {
        return;
    }

    for (sent, entry) in rows.iter().enumerate() {
        let line = encode_record(formatter.format(entry)).map(Bytes::from);
        let failed = line.is_err();
        if tx.send(line).await.is_err() {
            ldebug!(
                "system",
                LogStage::Export,
                LogComponent::Export,
                "export_cancelled",
                "导出接收端已关闭，停止写出",
                rows_sent = sent,
                rows_total = rows.len(),
            );
            return;
        }
        if failed {
            return;
        }
    }
}

/// 文件名中带导出时间
#[must_use]
pub fn export_filename(now: DateTime<Utc>, timezone: &Tz) -> String {
    format!(
        "logs_{}.csv",
        now.with_timezone(timezone).format("%Y%m%d_%H%M%S")
    )
}

/// 单行数据的格式化
#[derive(Debug, Clone)]
pub struct RowFormatter {
    settings: ExportSettings,
    timezone: Tz,
}

impl RowFormatter {
    #[must_use]
    pub const fn new(settings: ExportSettings, timezone: Tz) -> Self {
        Self { settings, timezone }
    }

    /// 按表头顺序生成 13 列
    #[must_use]
    pub fn format(&self, entry: &LogEntry) -> [String; 13] {
        let metadata = LogMetadata::parse(&entry.other);
        [
            timezone_utils::format_timestamp_for_response(entry.created_at, &self.timezone),
            entry.username.clone(),
            entry.token_name.clone(),
            entry.log_type.to_string(),
            entry.model_name.clone(),
            elapsed_label(entry, &metadata),
            entry.prompt_tokens.to_string(),
            entry.completion_tokens.to_string(),
            self.format_cost(entry.quota),
            String::new(),
            "0".to_string(),
            entry.channel_id.to_string(),
            detail_label(entry, &metadata),
        ]
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn format_cost(&self, quota: i64) -> String {
        format!(
            "{}{:.6}",
            self.settings.currency_symbol,
            quota as f64 / self.settings.quota_per_unit
        )
    }
}

/// `"3 s"`，有首字延迟时追加 `" / 0.9 s"`，流式请求追加 `" 流"`
fn elapsed_label(entry: &LogEntry, metadata: &LogMetadata) -> String {
    let mut label = format!("{} s", entry.use_time);
    if let Some(frt_ms) = metadata.first_response_ms() {
        // 四舍五入到 0.1 秒
        let seconds = (frt_ms / 100.0).round() / 10.0;
        label.push_str(&format!(" / {seconds:.1} s"));
    }
    if entry.is_stream {
        label.push_str(STREAM_MARKER);
    }
    label
}

fn detail_label(entry: &LogEntry, metadata: &LogMetadata) -> String {
    if entry.content.is_empty() {
        metadata.ratio_detail().unwrap_or_default()
    } else {
        entry.content.clone()
    }
}

/// 编码一行 CSV，以换行结尾
pub fn encode_record<I, S>(fields: I) -> std::io::Result<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    writer.into_inner().map_err(csv::IntoInnerError::into_error)
}
