use chrono::NaiveTime;

// Two-digit 12-hour clock, e.g. "02:05 PM"
pub fn format_clock(time: &NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

pub fn format_status(label: &str, percentage: u8) -> String {
    format!("{} ({}%)", label, percentage)
}

/// Upper bound for a count axis: the next multiple of 5 above `peak`, never below `floor`.
pub fn axis_ceiling(peak: u32, floor: u32) -> u32 {
    let rounded = (peak / 5 + 1) * 5;
    rounded.max(floor)
}
