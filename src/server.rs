use std::sync::mpsc::{self, Sender};

use anyhow::Result;
use embedded_svc::http::Method;
use embedded_svc::io::Write;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use log::warn;

use weather_station::config::HTTP_REPLY_TIMEOUT;
use weather_station::station::DataRequest;
use weather_station::web::{CONTENT_TYPE_HTML, INDEX_HTML};

/// Registers `/` and `/data`. `/data` is answered by the control loop,
/// which owns the sensors and the buzzer; the handler only forwards.
pub fn start_web(requests: Sender<DataRequest>) -> Result<EspHttpServer<'static>> {
    let cfg = Configuration {
        stack_size: 10 * 1024,
        ..Default::default()
    };
    let mut server = EspHttpServer::new(&cfg)?;

    // --- GET / : dashboard ---
    server.fn_handler("/", Method::Get, |req| -> anyhow::Result<()> {
        let headers = [("Content-Type", CONTENT_TYPE_HTML)];
        let mut resp = req.into_response(200, Some("OK"), &headers)?;
        resp.write_all(INDEX_HTML.as_bytes())?;
        Ok(())
    })?;

    // --- GET /data : sensor fragment ---
    {
        server.fn_handler("/data", Method::Get, move |req| -> anyhow::Result<()> {
            let (reply, answer) = mpsc::sync_channel(1);
            let queued = requests.send(DataRequest { reply }).is_ok();

            match queued.then(|| answer.recv_timeout(HTTP_REPLY_TIMEOUT).ok()).flatten() {
                Some(html) => {
                    let headers = [("Content-Type", CONTENT_TYPE_HTML)];
                    let mut resp = req.into_response(200, Some("OK"), &headers)?;
                    resp.write_all(html.as_bytes())?;
                }
                None => {
                    warn!("/data: control loop did not answer");
                    let mut resp = req.into_response(503, Some("Service Unavailable"), &[])?;
                    resp.write_all(&[])?;
                }
            }
            Ok(())
        })?;
    }

    Ok(server)
}
