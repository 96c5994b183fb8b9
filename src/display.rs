//! The 16x2 character LCD and the four sensor screens.

use core::time::Duration;

use anyhow::Result;
use heapless::String;

use crate::config::{LCD_COLS, LCD_REFRESH, LCD_ROWS};
use crate::sensor::{sample, Climate, Reading, SensorBank};
use crate::timer::elapsed;

pub type Line = String<LCD_COLS>;

/// Minimal text surface of a character display.
pub trait CharDisplay {
    fn clear(&mut self) -> Result<()>;
    fn write_at(&mut self, col: u8, row: u8, text: &str) -> Result<()>;
}

/// Truncates to the display width.
pub fn fit(text: &str) -> Line {
    let mut line = Line::new();
    for ch in text.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
    line
}

/// Clears the display and writes `lines` from the top row down.
pub fn show<D: CharDisplay + ?Sized>(lcd: &mut D, lines: &[&str]) -> Result<()> {
    lcd.clear()?;
    for (row, text) in lines.iter().take(LCD_ROWS).enumerate() {
        lcd.write_at(0, row as u8, &fit(text))?;
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Climate,
    Smoke,
    Rain,
    Soil,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Climate, Screen::Smoke, Screen::Rain, Screen::Soil];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Both LCD lines for this screen.
    pub fn compose(self, reading: &Reading) -> [Line; 2] {
        match self {
            Screen::Climate => match reading.climate {
                Climate::Available { temp_c, humidity } => [
                    fit(&format!("Temp: {temp_c:.1} C")),
                    fit(&format!("Humidity: {humidity:.1}%")),
                ],
                Climate::Unavailable => [fit("Temp: -- C"), fit("Humidity: --%")],
            },
            Screen::Smoke => [
                fit("Smoke:"),
                fit(if reading.smoke_detected { "Detected" } else { "Clear" }),
            ],
            Screen::Rain => [
                fit("Rain:"),
                fit(if reading.raining { "Raining" } else { "Clear" }),
            ],
            Screen::Soil => [
                fit("Soil Moisture:"),
                fit(reading.soil.map_or("Unavailable", |s| s.label())),
            ],
        }
    }
}

/// Which screen is shown and when it was last drawn.
#[derive(Debug, Default)]
pub struct ScreenCursor {
    index: usize,
    last_refresh: Option<Duration>,
}

impl ScreenCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn screen(&self) -> Screen {
        Screen::from_index(self.index)
    }

    /// Back to the first screen, next draw one refresh period from `now`.
    pub fn reset(&mut self, now: Duration) {
        self.index = 0;
        self.last_refresh = Some(now);
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % Screen::ALL.len();
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.last_refresh = None;
    }

    pub fn is_due(&self, now: Duration) -> bool {
        match self.last_refresh {
            None => true,
            Some(at) => elapsed(now, at) >= LCD_REFRESH,
        }
    }

    pub fn mark_rendered(&mut self, now: Duration) {
        self.last_refresh = Some(now);
    }
}

/// Redraws the current screen with a fresh reading when due.
/// Returns whether anything was drawn.
pub fn render<D, S>(cursor: &mut ScreenCursor, lcd: &mut D, sensors: &mut S, now: Duration) -> Result<bool>
where
    D: CharDisplay + ?Sized,
    S: SensorBank + ?Sized,
{
    if !cursor.is_due(now) {
        return Ok(false);
    }
    // marked before drawing: a failed write waits for the next period
    cursor.mark_rendered(now);
    let reading = sample(sensors);
    let [top, bottom] = cursor.screen().compose(&reading);
    show(lcd, &[&top, &bottom])?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SoilStatus;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn reading() -> Reading {
        Reading {
            climate: Climate::Available {
                temp_c: 24.5,
                humidity: 60.0,
            },
            smoke_detected: true,
            raining: false,
            soil: Some(SoilStatus::Moist),
        }
    }

    #[test]
    fn cursor_cycles_through_four_screens() {
        let mut c = ScreenCursor::new();
        let mut seen = vec![c.index()];
        for _ in 0..8 {
            c.advance();
            assert!(c.index() < 4);
            seen.push(c.index());
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn refresh_policy() {
        let mut c = ScreenCursor::new();
        assert!(c.is_due(ms(0)));
        c.mark_rendered(ms(100));
        assert!(!c.is_due(ms(3_099)));
        assert!(c.is_due(ms(3_100)));
        c.mark_rendered(ms(3_100));
        c.advance();
        assert!(c.is_due(ms(3_101)));
    }

    #[test]
    fn reset_waits_a_full_period() {
        let mut c = ScreenCursor::new();
        c.advance();
        c.advance();
        c.reset(ms(1_000));
        assert_eq!(c.screen(), Screen::Climate);
        assert!(!c.is_due(ms(3_999)));
        assert!(c.is_due(ms(4_000)));
    }

    #[test]
    fn screen_lines() {
        let r = reading();
        let lines = |s: Screen| s.compose(&r).map(|l| l.as_str().to_owned());
        assert_eq!(lines(Screen::Climate), ["Temp: 24.5 C", "Humidity: 60.0%"]);
        assert_eq!(lines(Screen::Smoke), ["Smoke:", "Detected"]);
        assert_eq!(lines(Screen::Rain), ["Rain:", "Clear"]);
        assert_eq!(lines(Screen::Soil), ["Soil Moisture:", "Moist"]);
    }

    #[test]
    fn unavailable_values_are_not_rendered_as_nan() {
        let r = Reading {
            climate: Climate::Unavailable,
            soil: None,
            ..reading()
        };
        let climate = Screen::Climate.compose(&r);
        assert_eq!(climate[0].as_str(), "Temp: -- C");
        assert!(!climate[1].contains("NaN"));
        assert_eq!(Screen::Soil.compose(&r)[1].as_str(), "Unavailable");
    }

    #[test]
    fn long_text_is_truncated_to_width() {
        assert_eq!(fit("Humidity: 100.0%!!").len(), LCD_COLS);
    }
}
