//! Dashboard page and the `/data` fragment.
//!
//! The fragment only ever contains numbers and fixed labels, so it is
//! spliced into the page without escaping.

use core::fmt::Write;

use crate::sensor::{Climate, Reading};

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// Renders the four sensor boxes, always in the same order:
/// climate, smoke, rain, soil.
pub fn render_fragment(reading: &Reading) -> String {
    let mut out = String::with_capacity(384);

    let (temp, hum) = match reading.climate {
        Climate::Available { temp_c, humidity } => (format!("{temp_c:.1}"), format!("{humidity:.1}")),
        Climate::Unavailable => ("--".to_owned(), "--".to_owned()),
    };
    let _ = write!(
        out,
        "<div class='sensorBox temp'><b>Temperature:</b> {temp} °C<br><b>Humidity:</b> {hum} %</div>"
    );
    let _ = write!(
        out,
        "<div class='sensorBox smoke'><b>Smoke:</b> {}</div>",
        if reading.smoke_detected { "Detected" } else { "Clear" }
    );
    let _ = write!(
        out,
        "<div class='sensorBox rain'><b>Rain:</b> {}</div>",
        if reading.raining { "Raining" } else { "Clear" }
    );
    let _ = write!(
        out,
        "<div class='sensorBox water'><b>Soil Moisture:</b> {}</div>",
        reading.soil.map_or("Unavailable", |s| s.label())
    );
    out
}

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width,initial-scale=1" />
<title>Sensor Dashboard</title>
<style>
  body { background:#f0f4f8; font-family:'Segoe UI', system-ui, sans-serif; margin:0; padding:0;
         display:flex; flex-direction:column; min-height:100vh; }
  header { background:#1e88e5; color:#fff; padding:20px; text-align:center; font-size:24px; font-weight:bold; }
  main { flex:1; display:flex; justify-content:center; align-items:center; padding:20px; }
  #sensorData { background:#fff; padding:20px; border-radius:12px; box-shadow:0 6px 15px rgba(0,0,0,.1);
                font-size:18px; line-height:1.8; color:#333; min-width:250px; max-width:90%; }
  footer { background:#1e88e5; color:#fff; text-align:center; padding:15px; font-size:14px; }
  .sensorBox { padding:10px; border-radius:8px; margin-bottom:15px; color:#fff; font-size:16px;
               box-shadow:0 5px 10px rgba(0,0,0,.1); }
  .temp  { background-color:#FF6F61; }
  .smoke { background-color:#FFB74D; }
  .rain  { background-color:#4CAF50; }
  .water { background-color:#2196F3; }
</style>
</head>
<body>
<header>Sensor Dashboard</header>
<main>
  <div id="sensorData">Loading...</div>
</main>
<footer>ESP Sensor Monitor</footer>
<script>
function fetchData() {
  fetch('/data')
    .then(r => r.text())
    .then(html => { document.getElementById('sensorData').innerHTML = html; })
    .catch(e => console.log(e));
}
setInterval(fetchData, 1000);
fetchData();
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SoilStatus;

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

    fn section_order(html: &str) -> Vec<&str> {
        html.match_indices("<div class='sensorBox ")
            .map(|(i, _)| {
                let rest = &html[i + "<div class='sensorBox ".len()..];
                &rest[..rest.find('\'').unwrap()]
            })
            .collect()
    }

    #[test]
    fn fragment_example() {
        let html = render_fragment(&reading());
        assert!(html.contains("24.5 °C"));
        assert!(html.contains("60.0 %"));
        assert!(html.contains("<b>Smoke:</b> Detected"));
        assert!(html.contains("<b>Rain:</b> Clear"));
        assert!(html.contains("<b>Soil Moisture:</b> Moist"));
    }

    #[test]
    fn fragment_always_has_four_sections_in_order() {
        let variants = [
            reading(),
            Reading {
                climate: Climate::Unavailable,
                smoke_detected: false,
                raining: true,
                soil: None,
            },
            Reading {
                soil: Some(SoilStatus::Dry),
                ..reading()
            },
        ];
        for r in variants {
            let html = render_fragment(&r);
            assert_eq!(section_order(&html), ["temp", "smoke", "rain", "water"]);
        }
    }

    #[test]
    fn unavailable_climate_renders_placeholder() {
        let html = render_fragment(&Reading {
            climate: Climate::Unavailable,
            ..reading()
        });
        assert!(html.contains("-- °C"));
        assert!(!html.contains("NaN"));
    }

    #[test]
    fn page_polls_data_every_second() {
        assert!(INDEX_HTML.contains("fetch('/data')"));
        assert!(INDEX_HTML.contains("setInterval(fetchData, 1000)"));
        assert!(INDEX_HTML.contains("id=\"sensorData\""));
    }
}
