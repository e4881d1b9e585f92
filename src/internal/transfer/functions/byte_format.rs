//! 字节数格式化，用于进度输出。

const UNITS: [&str; 5] = ["B", "KB", "M", "G", "T"];

/// 以 1024 为底格式化字节数，保留三位小数，如 `1.500KB`。超过 T 的值仍以 T 为单位。
pub fn format_bytes(value: f64) -> String {
    let mut value = value;
    let mut index = 0;
    while value >= 1024.0 && index < UNITS.len() - 1 {
        value /= 1024.0;
        index += 1;
    }
    format!("{:.3}{}", value, UNITS[index])
}
