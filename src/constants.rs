pub const TICK_RATE_MS: u64 = 250;
pub const CLOCK_REFRESH_SECS: u64 = 60;
pub const LIVE_REFRESH_SECS: u64 = 10;

// Live chart window
pub const LIVE_WINDOW_LEN: usize = 6;
pub const MIN_VEHICLES: u32 = 10;
pub const MAX_VEHICLES: u32 = 24;

// Daily table covers 8 AM through 9 PM
pub const FIRST_HOUR: u32 = 8;
pub const LAST_HOUR: u32 = 21;

pub const MODERATE_THRESHOLD: u8 = 30;
pub const HIGH_THRESHOLD: u8 = 60;
