//! # weather-station
//! Environmental sensor station firmware: DHT11 climate, MQ-2 smoke,
//! rain and soil moisture on a PIN-gated 16x2 LCD, plus a small
//! dashboard served from the station's own Wi-Fi access point.
//!
//! Everything in this library is hardware independent; the ESP-IDF
//! drivers live in the binary and plug in through the traits in
//! [`sensor`], [`display`], [`keypad`] and [`alarm`].

pub mod alarm;
pub mod config;
pub mod display;
pub mod gate;
pub mod input;
pub mod keypad;
pub mod sensor;
pub mod station;
pub mod timer;
pub mod web;
