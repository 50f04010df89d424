pub(super) fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub(super) fn parse_minutes(input: &str) -> u64 {
    input.trim().parse().unwrap_or(1)
}
