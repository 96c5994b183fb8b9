use anyhow::Result;
use log::warn;

use crate::config::SOIL_MOIST_BELOW;

/// Temperature/humidity probe result. A failed or NaN read is kept as
/// `Unavailable` instead of leaking garbage floats to the LCD and HTTP.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Climate {
    Available { temp_c: f32, humidity: f32 },
    Unavailable,
}

impl Climate {
    pub fn from_raw(temp_c: f32, humidity: f32) -> Self {
        if temp_c.is_finite() && humidity.is_finite() {
            Climate::Available { temp_c, humidity }
        } else {
            Climate::Unavailable
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoilStatus {
    Moist,
    Dry,
}

impl SoilStatus {
    /// Fixed threshold, Dry side inclusive.
    pub fn classify(raw: u16) -> Self {
        if raw < SOIL_MOIST_BELOW {
            SoilStatus::Moist
        } else {
            SoilStatus::Dry
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SoilStatus::Moist => "Moist",
            SoilStatus::Dry => "Dry",
        }
    }
}

/*** App-Model ***/
/// One fresh sample of every sensor. Never cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub climate: Climate,
    pub smoke_detected: bool,
    pub raining: bool,
    /// `None` if the ADC read failed
    pub soil: Option<SoilStatus>,
}

/// Raw access to the four physical inputs.
pub trait SensorBank {
    /// (°C, %RH)
    fn climate(&mut self) -> Result<(f32, f32)>;
    /// Gas sensor digital output is at LOW level.
    fn smoke_line_low(&mut self) -> bool;
    /// Rain sensor digital output is at LOW level.
    fn rain_line_low(&mut self) -> bool;
    fn soil_raw(&mut self) -> Result<u16>;
}

/// Samples all sensors once. Smoke and rain are active-low.
pub fn sample<S: SensorBank + ?Sized>(bank: &mut S) -> Reading {
    let climate = match bank.climate() {
        Ok((t, h)) => Climate::from_raw(t, h),
        Err(e) => {
            warn!("climate read failed: {e:#}");
            Climate::Unavailable
        }
    };
    let soil = match bank.soil_raw() {
        Ok(raw) => Some(SoilStatus::classify(raw)),
        Err(e) => {
            warn!("soil read failed: {e:#}");
            None
        }
    };

    Reading {
        climate,
        smoke_detected: bank.smoke_line_low(),
        raining: bank.rain_line_low(),
        soil,
    }
}
