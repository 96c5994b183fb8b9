fn main() {
    println!("cargo:rerun-if-env-changed=STATION_AP_SSID");
    println!("cargo:rerun-if-env-changed=STATION_AP_PASS");
    println!("cargo:rerun-if-env-changed=STATION_PIN");

    // host builds (unit tests) have no ESP-IDF to link against
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("espidf") {
        return;
    }

    embuild::espidf::sysenv::output();

    println!("cargo:rerun-if-changed=sdkconfig.defaults");
}
