use std::collections::VecDeque;

use ratatui::style::Color;

use crate::constants::{FIRST_HOUR, HIGH_THRESHOLD, LAST_HOUR, LIVE_WINDOW_LEN, MODERATE_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CongestionSample {
    pub label: &'static str,
    pub percentage: u8,
}

impl CongestionSample {
    /// Hour plus meridiem initial, e.g. "10 AM" becomes "10a".
    pub fn short_label(&self) -> String {
        let mut parts = self.label.split_whitespace();
        let hour = parts.next().unwrap_or_default();
        let meridiem = parts
            .next()
            .and_then(|m| m.chars().next())
            .map(|c| c.to_ascii_lowercase().to_string())
            .unwrap_or_default();
        format!("{hour}{meridiem}")
    }
}

const fn sample(label: &'static str, percentage: u8) -> CongestionSample {
    CongestionSample { label, percentage }
}

// Hourly congestion from 8 AM to 9 PM
pub static DAILY_CONGESTION: [CongestionSample; 14] = [
    sample("8 AM", 25),
    sample("9 AM", 40),
    sample("10 AM", 35),
    sample("11 AM", 50),
    sample("12 PM", 65),
    sample("1 PM", 60),
    sample("2 PM", 55),
    sample("3 PM", 70),
    sample("4 PM", 75),
    sample("5 PM", 80),
    sample("6 PM", 65),
    sample("7 PM", 45),
    sample("8 PM", 30),
    sample("9 PM", 20),
];

/// Congestion percentage for a wall-clock hour (0-23), if the table covers it.
pub fn congestion_for_hour(hour: u32) -> Option<u8> {
    if !(FIRST_HOUR..=LAST_HOUR).contains(&hour) {
        return None;
    }
    DAILY_CONGESTION
        .get((hour - FIRST_HOUR) as usize)
        .map(|s| s.percentage)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficStatus {
    Low,
    Moderate,
    High,
}

impl TrafficStatus {
    pub fn classify(percentage: u8) -> Self {
        if percentage < MODERATE_THRESHOLD {
            Self::Low
        } else if percentage < HIGH_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Low => Color::LightGreen,
            Self::Moderate => Color::LightYellow,
            Self::High => Color::LightRed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSample {
    pub label: String,
    pub vehicles: u32,
}

/// Fixed-length window of recent vehicle counts, oldest first.
///
/// Labels are positional: the last entry is always "Current" and each
/// earlier entry is "N min ago" counting back from it.
#[derive(Debug, Clone)]
pub struct LiveWindow {
    samples: VecDeque<LiveSample>,
}

impl LiveWindow {
    pub fn new() -> Self {
        Self::from_counts(&[12, 15, 10, 18, 22, 25])
    }

    pub fn from_counts(counts: &[u32; LIVE_WINDOW_LEN]) -> Self {
        let mut window = Self {
            samples: counts
                .iter()
                .map(|&vehicles| LiveSample { label: String::new(), vehicles })
                .collect(),
        };
        window.relabel();
        window
    }

    pub fn push(&mut self, vehicles: u32) {
        self.samples.pop_front();
        self.samples.push_back(LiveSample { label: String::new(), vehicles });
        self.relabel();
    }

    fn relabel(&mut self) {
        let n = self.samples.len();
        for (i, s) in self.samples.iter_mut().enumerate() {
            s.label = if i + 1 == n {
                "Current".to_string()
            } else {
                format!("{} min ago", n - 1 - i)
            };
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = &LiveSample> + '_ {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn latest(&self) -> Option<&LiveSample> {
        self.samples.back()
    }

    pub fn peak(&self) -> u32 {
        self.samples.iter().map(|s| s.vehicles).max().unwrap_or(0)
    }
}

impl Default for LiveWindow {
    fn default() -> Self {
        Self::new()
    }
}
