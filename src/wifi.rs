use std::net::Ipv4Addr;

use anyhow::{anyhow, Result};
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AccessPointConfiguration, AuthMethod, BlockingWifi, Configuration as WifiCfg, EspWifi};
use log::info;

use weather_station::config::{AP_CHANNEL, AP_PASS, AP_SSID};

/// Brings up the station's own access point. The returned driver must be
/// kept alive for as long as the AP should stay up.
pub fn start_access_point(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
) -> Result<(BlockingWifi<EspWifi<'static>>, Ipv4Addr)> {
    let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
    let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

    wifi.set_configuration(&WifiCfg::AccessPoint(AccessPointConfiguration {
        ssid: AP_SSID.try_into().map_err(|_| anyhow!("AP SSID too long"))?,
        password: AP_PASS.try_into().map_err(|_| anyhow!("AP password too long"))?,
        auth_method: AuthMethod::WPA2Personal,
        channel: AP_CHANNEL,
        ..Default::default()
    }))?;
    wifi.start()?;
    wifi.wait_netif_up()?;

    let ip = wifi.wifi().ap_netif().get_ip_info()?.ip;
    info!("access point `{AP_SSID}` started, IP: {ip}");
    Ok((wifi, ip))
}
