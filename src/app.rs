use std::time::{Duration, Instant};

use chrono::{Local, NaiveTime, Timelike};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::DashboardConfig;
use crate::feed::VehicleSource;
use crate::traffic::{congestion_for_hour, CongestionSample, LiveWindow, TrafficStatus, DAILY_CONGESTION};
use crate::util::{format_clock, format_status};

/// Focusable controls, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Emergency,
    RerouteTraffic,
    SystemSettings,
    AlertAuthorities,
}

impl Control {
    pub const ACTIONS: [Control; 3] = [
        Control::RerouteTraffic,
        Control::SystemSettings,
        Control::AlertAuthorities,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Emergency => Self::RerouteTraffic,
            Self::RerouteTraffic => Self::SystemSettings,
            Self::SystemSettings => Self::AlertAuthorities,
            Self::AlertAuthorities => Self::Emergency,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Emergency => Self::AlertAuthorities,
            Self::RerouteTraffic => Self::Emergency,
            Self::SystemSettings => Self::RerouteTraffic,
            Self::AlertAuthorities => Self::SystemSettings,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Emergency => "Emergency Mode",
            Self::RerouteTraffic => "Reroute Traffic",
            Self::SystemSettings => "System Settings",
            Self::AlertAuthorities => "Alert Authorities",
        }
    }
}

// Advances `last` by whole periods so firings keep a fixed cadence.
// A stall longer than one period resyncs to `now` instead of replaying.
fn interval_elapsed(last: &mut Instant, interval: Duration, now: Instant) -> bool {
    if now.saturating_duration_since(*last) < interval {
        return false;
    }
    *last += interval;
    if now.saturating_duration_since(*last) >= interval {
        *last = now;
    }
    true
}

// Main application state
pub struct App {
    config: DashboardConfig,
    feed: Box<dyn VehicleSource>,

    clock_text: String,
    current_congestion: u8,
    emergency: bool,
    live: LiveWindow,
    focus: Control,
    running: bool,

    last_clock_refresh: Instant,
    last_live_refresh: Instant,
    pub last_tick: Instant,
}

impl App {
    pub fn new(config: DashboardConfig, feed: Box<dyn VehicleSource>) -> App {
        App::starting_at(config, feed, Instant::now(), Local::now().time())
    }

    /// Builds the state as of `start`, with the clock already showing `wall`.
    pub fn starting_at(
        config: DashboardConfig,
        feed: Box<dyn VehicleSource>,
        start: Instant,
        wall: NaiveTime,
    ) -> App {
        let mut app = App {
            config,
            feed,
            clock_text: String::new(),
            current_congestion: 0,
            emergency: false,
            live: LiveWindow::new(),
            focus: Control::default(),
            running: true,
            last_clock_refresh: start,
            last_live_refresh: start,
            last_tick: start,
        };
        app.refresh_clock(wall);
        app
    }

    pub fn refresh_clock(&mut self, wall: NaiveTime) {
        self.clock_text = format_clock(&wall);
        // Outside the table's hours the last known value stays on screen
        if let Some(pct) = congestion_for_hour(wall.hour()) {
            self.current_congestion = pct;
        }
    }

    pub fn rotate_live(&mut self) {
        let vehicles = self.feed.next_count();
        self.live.push(vehicles);
        log::debug!("live window rotated, current = {vehicles} vehicles");
    }

    pub fn on_tick(&mut self, now: Instant, wall: NaiveTime) {
        if interval_elapsed(&mut self.last_clock_refresh, self.config.clock_interval, now) {
            self.refresh_clock(wall);
        }
        if interval_elapsed(&mut self.last_live_refresh, self.config.live_interval, now) {
            self.rotate_live();
        }
        self.last_tick = now;
    }

    pub fn toggle_emergency(&mut self) {
        self.emergency = !self.emergency;
        log::info!("emergency mode {}", if self.emergency { "on" } else { "off" });
    }

    pub fn activate(&mut self) {
        match self.focus {
            Control::Emergency => self.toggle_emergency(),
            action => log::debug!("'{}' pressed, no action attached", action.label()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.toggle_emergency(),
            KeyCode::Tab | KeyCode::Right | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            _ => {}
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_rate(&self) -> Duration {
        self.config.tick_rate
    }

    pub fn clock_text(&self) -> &str {
        &self.clock_text
    }

    pub fn current_congestion(&self) -> u8 {
        self.current_congestion
    }

    pub fn status(&self) -> TrafficStatus {
        TrafficStatus::classify(self.current_congestion())
    }

    pub fn status_text(&self) -> String {
        format_status(self.status().label(), self.current_congestion())
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn focus(&self) -> Control {
        self.focus
    }

    pub fn daily(&self) -> &'static [CongestionSample] {
        &DAILY_CONGESTION
    }

    pub fn live(&self) -> &LiveWindow {
        &self.live
    }
}
