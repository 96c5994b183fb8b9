#[cfg(target_os = "espidf")]
mod hw;
#[cfg(target_os = "espidf")]
mod server;
#[cfg(target_os = "espidf")]
mod wifi;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::thread;
    use std::time::Duration;

    use esp_idf_svc::log::EspLogger;

    esp_idf_sys::link_patches();
    EspLogger::initialize_default();

    let _handle = thread::Builder::new()
        .name("app".into())
        .stack_size(24 * 1024)
        .spawn(|| {
            if let Err(e) = app() {
                log::error!("app() failed: {e:?}");
            }
        })?;

    // no supervised restart: a failed app() leaves the device idle
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

#[cfg(target_os = "espidf")]
fn app() -> anyhow::Result<()> {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use log::{info, warn};

    use weather_station::config;
    use weather_station::gate::AccessPin;
    use weather_station::station::Station;
    use weather_station::timer::{Clock, MonotonicClock};

    let pin = AccessPin::parse(config::ACCESS_PIN)?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // HW
    let board = hw::init_hw(peripherals.pins, peripherals.i2c0, peripherals.adc1, peripherals.ledc)?;

    // Network
    let (_wifi, ip) = wifi::start_access_point(peripherals.modem, sysloop, nvs)?;
    let (requests_tx, requests_rx) = mpsc::channel();
    let _server = server::start_web(requests_tx)?;
    info!("HTTP server started on http://{ip}/");

    let clock = MonotonicClock::new();
    let mut station = Station::new(pin, board.sensors, board.lcd, board.keypad, board.buzzer);
    station.boot(&ip.to_string(), clock.now())?;

    loop {
        let now = clock.now();
        station.answer_pending(&requests_rx, now);
        if let Err(e) = station.step(now) {
            warn!("ui step failed: {e:#}");
        }
        // let the idle task run
        thread::sleep(Duration::from_millis(5));
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("weather-station is ESP32 firmware; build it for an xtensa-esp32-espidf target");
}
