/// Formats seconds as `m:ss`.
pub fn format_time(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remaining = seconds % 60;
    format!("{}:{:02}", minutes, remaining)
}
