/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an opaque order id.
pub fn new_order_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Kitchen-slip form of a per-tenant order counter, e.g. `#0042`.
///
/// Counters beyond 9999 widen naturally instead of wrapping.
pub fn format_order_number(n: u64) -> String {
    format!("#{n:04}")
}
