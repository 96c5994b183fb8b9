use core::time::Duration;

// Access point credentials and the keypad PIN come from the build environment
// (STATION_AP_SSID / STATION_AP_PASS / STATION_PIN), with the factory defaults below.
const fn env_or(value: Option<&'static str>, default: &'static str) -> &'static str {
    match value {
        Some(v) => v,
        None => default,
    }
}

/*** Network ***/
pub const AP_SSID: &str = env_or(option_env!("STATION_AP_SSID"), "Weather-system");
pub const AP_PASS: &str = env_or(option_env!("STATION_AP_PASS"), "12345678");
pub const AP_CHANNEL: u8 = 1;

/// How long a `/data` handler waits for the control loop to answer.
pub const HTTP_REPLY_TIMEOUT: Duration = Duration::from_millis(2_000);

/*** Access ***/
// Compared in plaintext, no lockout. Parsed by gate::AccessPin at startup.
pub const ACCESS_PIN: &str = env_or(option_env!("STATION_PIN"), "2233");

/*** Hardware & Sensor ***/
pub const I2C_HZ: u32 = 100_000;
pub const LCD_ADDR: u8 = 0x27; // PCF8574 backpack default
pub const LCD_COLS: usize = 16;
pub const LCD_ROWS: usize = 2;

// Raw ADC below this is wet soil. Uncalibrated.
pub const SOIL_MOIST_BELOW: u16 = 600;

pub const KEY_DEBOUNCE: Duration = Duration::from_millis(10);

/*** Buzzer ***/
pub const ALARM_HZ: u32 = 1_000;
pub const ALARM_PULSE: Duration = Duration::from_millis(500);

/*** UI timing ***/
pub const LCD_REFRESH: Duration = Duration::from_millis(3_000);
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(1_000);
pub const MESSAGE_HOLD: Duration = Duration::from_millis(1_000);
pub const BOOT_BANNER: Duration = Duration::from_millis(3_000);

pub const SCREEN_NEXT_KEY: char = '#';
pub const LOCK_KEY: char = '5';
