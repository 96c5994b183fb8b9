use anyhow::{anyhow, bail, Result};
use dht_sensor::{dht11, DhtReading};
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::delay::Delay;
use esp_idf_hal::gpio::{
    AnyIOPin, AnyInputPin, AnyOutputPin, Gpio34, IOPin, Input, InputOutput, InputPin, Output,
    OutputPin, PinDriver, Pins, Pull,
};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver, I2C0};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, LEDC};
use esp_idf_hal::prelude::*;
use esp_idf_hal::units::Hertz;
use hd44780_driver::bus::I2CBus;
use hd44780_driver::{Cursor, CursorBlink, Display, DisplayMode, HD44780};

use weather_station::alarm::Buzzer;
use weather_station::config::{ALARM_HZ, I2C_HZ, KEY_DEBOUNCE, LCD_ADDR};
use weather_station::display::CharDisplay;
use weather_station::keypad::Keypad;
use weather_station::sensor::SensorBank;

///  - I2C (LCD backpack): SDA=GPIO21, SCL=GPIO22
///  - DHT11 data:  GPIO5 (open drain)
///  - MQ-2 DO:     GPIO4
///  - Rain DO:     GPIO18
///  - Soil AO:     GPIO34 (ADC1)
///  - Buzzer:      GPIO23 (LEDC ch0)
///  - Keypad rows: GPIO12, 14, 27, 26; cols: GPIO25, 33, 32, 13

pub type HwKeypad = Keypad<PinDriver<'static, AnyOutputPin, Output>, PinDriver<'static, AnyIOPin, Input>>;

pub struct Board {
    pub sensors: HwSensors,
    pub lcd: Lcd,
    pub keypad: HwKeypad,
    pub buzzer: LedcBuzzer,
}

pub fn init_hw(pins: Pins, i2c0: I2C0, adc1: ADC1, ledc: LEDC) -> Result<Board> {
    // I2C
    let i2c = I2cDriver::new(
        i2c0,
        pins.gpio21,
        pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(I2C_HZ)),
    )?;
    let lcd = Lcd::new(i2c)?;

    // Sensors
    let mut dht = PinDriver::input_output_od(pins.gpio5.downgrade())?;
    dht.set_high()?;
    let smoke = PinDriver::input(pins.gpio4.downgrade_input())?;
    let rain = PinDriver::input(pins.gpio18.downgrade_input())?;
    let soil = AdcChannelDriver::new(
        AdcDriver::new(adc1)?,
        pins.gpio34,
        &AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        },
    )?;

    // Keypad
    let rows = [
        PinDriver::output(pins.gpio12.downgrade_output())?,
        PinDriver::output(pins.gpio14.downgrade_output())?,
        PinDriver::output(pins.gpio27.downgrade_output())?,
        PinDriver::output(pins.gpio26.downgrade_output())?,
    ];
    let cols = [
        pull_up(pins.gpio25.downgrade())?,
        pull_up(pins.gpio33.downgrade())?,
        pull_up(pins.gpio32.downgrade())?,
        pull_up(pins.gpio13.downgrade())?,
    ];

    // Buzzer
    let timer = LedcTimerDriver::new(ledc.timer0, &TimerConfig::new().frequency(ALARM_HZ.Hz().into()))?;
    let mut channel = LedcDriver::new(ledc.channel0, timer, pins.gpio23)?;
    channel.set_duty(0)?;

    Ok(Board {
        sensors: HwSensors {
            dht,
            smoke,
            rain,
            soil,
            delay: Delay::new_default(),
        },
        lcd,
        keypad: Keypad::new(rows, cols, KEY_DEBOUNCE),
        buzzer: LedcBuzzer { channel, hz: ALARM_HZ },
    })
}

fn pull_up(pin: AnyIOPin) -> Result<PinDriver<'static, AnyIOPin, Input>> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

/*** Sensors ***/
pub struct HwSensors {
    dht: PinDriver<'static, AnyIOPin, InputOutput>,
    smoke: PinDriver<'static, AnyInputPin, Input>,
    rain: PinDriver<'static, AnyInputPin, Input>,
    soil: AdcChannelDriver<'static, Gpio34, AdcDriver<'static, ADC1>>,
    delay: Delay,
}

impl SensorBank for HwSensors {
    fn climate(&mut self) -> Result<(f32, f32)> {
        let r = dht11::Reading::read(&mut self.delay, &mut self.dht)
            .map_err(|e| anyhow!("dht11: {e:?}"))?;
        Ok((f32::from(r.temperature), f32::from(r.relative_humidity)))
    }

    fn smoke_line_low(&mut self) -> bool {
        self.smoke.is_low()
    }

    fn rain_line_low(&mut self) -> bool {
        self.rain.is_low()
    }

    fn soil_raw(&mut self) -> Result<u16> {
        Ok(self.soil.read_raw()?)
    }
}

/*** LCD ***/
pub struct Lcd {
    lcd: HD44780<I2CBus<I2cDriver<'static>>>,
    delay: Delay,
}

impl Lcd {
    fn new(i2c: I2cDriver<'static>) -> Result<Self> {
        let mut delay = Delay::new_default();
        let mut lcd = HD44780::new_i2c(i2c, LCD_ADDR, &mut delay).map_err(|e| anyhow!("lcd init: {e:?}"))?;
        lcd.reset(&mut delay).map_err(|e| anyhow!("lcd reset: {e:?}"))?;
        lcd.set_display_mode(
            DisplayMode {
                display: Display::On,
                cursor_visibility: Cursor::Invisible,
                cursor_blink: CursorBlink::Off,
            },
            &mut delay,
        )
        .map_err(|e| anyhow!("lcd mode: {e:?}"))?;
        lcd.clear(&mut delay).map_err(|e| anyhow!("lcd clear: {e:?}"))?;
        Ok(Self { lcd, delay })
    }
}

impl CharDisplay for Lcd {
    fn clear(&mut self) -> Result<()> {
        self.lcd.clear(&mut self.delay).map_err(|e| anyhow!("lcd clear: {e:?}"))
    }

    fn write_at(&mut self, col: u8, row: u8, text: &str) -> Result<()> {
        // HD44780 DDRAM: second line starts at 0x40
        self.lcd
            .set_cursor_pos(row * 0x40 + col, &mut self.delay)
            .map_err(|e| anyhow!("lcd cursor: {e:?}"))?;
        self.lcd
            .write_str(text, &mut self.delay)
            .map_err(|e| anyhow!("lcd write: {e:?}"))
    }
}

/*** Buzzer ***/
pub struct LedcBuzzer {
    channel: LedcDriver<'static>,
    // LEDC timer frequency, fixed at init
    hz: u32,
}

impl Buzzer for LedcBuzzer {
    fn start_tone(&mut self, hz: u32) -> Result<()> {
        if hz != self.hz {
            bail!("buzzer timer runs at {} Hz, not {hz} Hz", self.hz);
        }
        let half = self.channel.get_max_duty() / 2;
        self.channel.set_duty(half)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.channel.set_duty(0)?;
        Ok(())
    }
}
