//! Terminal side of the presentation contract.

use std::io::{self, Write};

use wxnow_core::{PresentationEvent, WeatherReport};

/// The fields a weather screen shows. Every finished fetch rewrites all of
/// them, so a failure never leaves the previous city's numbers behind.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WeatherPanel {
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub temperature: String,
    pub feels_like: String,
    pub loading: bool,
    /// Last failure or notice, shown instead of a report.
    pub message: Option<String>,
}

impl WeatherPanel {
    pub fn apply(&mut self, event: PresentationEvent) {
        match event {
            PresentationEvent::Loading(loading) => self.loading = loading,
            PresentationEvent::Finished(Ok(report)) => self.show(report),
            PresentationEvent::Finished(Err(err)) => {
                self.clear();
                self.message = Some(err.to_string());
            }
            PresentationEvent::Notice(notice) => self.message = Some(notice),
        }
    }

    fn show(&mut self, report: WeatherReport) {
        self.name = report.location_name.unwrap_or_default();
        self.title = report.condition;
        self.subtitle = report.description;
        self.temperature = format!("Temperature is {}\u{2103}", report.temperature_celsius);
        self.feels_like = format!("Feels like {}\u{2103}", report.feels_like_celsius);
        self.message = None;
    }

    fn clear(&mut self) {
        self.name.clear();
        self.title.clear();
        self.subtitle.clear();
        self.temperature.clear();
        self.feels_like.clear();
    }

    /// Non-empty fields, one per line.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        for line in [&self.name, &self.title, &self.subtitle, &self.temperature, &self.feels_like] {
            if !line.is_empty() {
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxnow_core::FetchError;

    fn report() -> WeatherReport {
        WeatherReport {
            location_name: Some("London".into()),
            condition: "Rain".into(),
            description: "light rain".into(),
            temperature_celsius: 9.5,
            feels_like_celsius: 7.25,
        }
    }

    #[test]
    fn report_fills_every_field() {
        let mut panel = WeatherPanel::default();
        panel.apply(PresentationEvent::Loading(true));
        panel.apply(PresentationEvent::Loading(false));
        panel.apply(PresentationEvent::Finished(Ok(report())));

        let mut out = Vec::new();
        panel.write_to(&mut out).unwrap();

        assert!(!panel.loading);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "London\nRain\nlight rain\nTemperature is 9.5\u{2103}\nFeels like 7.25\u{2103}\n"
        );
    }

    #[test]
    fn failure_clears_previous_report() {
        let mut panel = WeatherPanel::default();
        panel.apply(PresentationEvent::Finished(Ok(report())));
        panel.apply(PresentationEvent::Finished(Err(FetchError::NetworkFailure(
            "connection reset".into(),
        ))));

        assert!(panel.name.is_empty());
        assert!(panel.title.is_empty());
        assert!(panel.temperature.is_empty());
        assert_eq!(panel.message.as_deref(), Some("connection reset"));
    }

    #[test]
    fn missing_name_is_left_blank() {
        let mut panel = WeatherPanel::default();
        panel.apply(PresentationEvent::Finished(Ok(WeatherReport {
            location_name: None,
            ..report()
        })));

        let mut out = Vec::new();
        panel.write_to(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Rain\n"));
    }

    #[test]
    fn notice_does_not_touch_fields() {
        let mut panel = WeatherPanel::default();
        panel.apply(PresentationEvent::Notice("Enter City".into()));

        assert!(panel.title.is_empty());
        assert_eq!(panel.message.as_deref(), Some("Enter City"));
    }
}
