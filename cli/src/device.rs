//! Formatting of registered Apple devices.
//!
//! Rendering a device is a pure function of the device payload plus the team
//! it was resolved under. The terminal frontend only decides where the
//! rendered text goes.

use std::fmt::Write as _;

use console::style;

use crate::api::AppleDevice;

/// Team metadata passed down to the device formatter.
#[derive(Debug, Clone, Copy)]
pub struct TeamContext<'a> {
    /// Display name of the resolved team, when known.
    pub apple_team_name: Option<&'a str>,
    /// Identifier of the resolved team.
    pub apple_team_identifier: &'a str,
}

impl TeamContext<'_> {
    /// Human label for the team: `name (id)` when a name is known, else `id`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.apple_team_name {
            Some(name) if !name.is_empty() => {
                format!("{name} ({})", self.apple_team_identifier)
            }
            _ => self.apple_team_identifier.to_string(),
        }
    }
}

/// Render one device as a block of labelled lines.
#[must_use]
pub fn format_device(device: &AppleDevice, ctx: &TeamContext<'_>) -> String {
    let mut block = String::new();

    if let Some(name) = device.name.as_deref() {
        push_field(&mut block, "Name", name);
    }
    push_field(&mut block, "Identifier", &device.identifier);
    if let Some(class) = device.device_class.as_deref() {
        push_field(&mut block, "Class", describe_class(class));
    }
    if let Some(model) = device.model.as_deref() {
        push_field(&mut block, "Model", model);
    }
    if let Some(enabled) = device.enabled {
        push_field(&mut block, "Enabled", if enabled { "yes" } else { "no" });
    }
    if let Some(created_at) = device.created_at {
        push_field(
            &mut block,
            "Created",
            &created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        );
    }
    push_field(&mut block, "Apple team", &ctx.label());

    // Drop the trailing newline so blocks join cleanly.
    block.pop();
    block
}

/// Join formatted device blocks with a visually distinct separator.
///
/// No separator appears before the first or after the last block.
#[must_use]
pub fn render_device_list(devices: &[AppleDevice], ctx: &TeamContext<'_>) -> String {
    let separator = format!("\n\n{}\n\n", style("———").dim());
    devices
        .iter()
        .map(|device| format_device(device, ctx))
        .collect::<Vec<_>>()
        .join(&separator)
}

fn push_field(block: &mut String, label: &str, value: &str) {
    // Pad before styling so ANSI escapes don't skew the column width.
    let _ = writeln!(block, "{} {value}", style(format!("{label:<12}")).bold());
}

/// Map the raw device class reported by the API to its marketing spelling.
fn describe_class(raw: &str) -> &str {
    match raw {
        "IPHONE" => "iPhone",
        "IPAD" => "iPad",
        "MAC" => "Mac",
        "APPLE_TV" => "Apple TV",
        "APPLE_WATCH" => "Apple Watch",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn device(identifier: &str, name: Option<&str>) -> AppleDevice {
        AppleDevice {
            identifier: identifier.to_string(),
            name: name.map(str::to_string),
            device_class: None,
            model: None,
            enabled: None,
            created_at: None,
        }
    }

    fn ctx<'a>() -> TeamContext<'a> {
        TeamContext {
            apple_team_name: Some("Alpha"),
            apple_team_identifier: "T1",
        }
    }

    #[test]
    fn formats_all_known_fields() {
        let device = AppleDevice {
            identifier: "00008110-000A1B2C3D4E5F6G".to_string(),
            name: Some("Kim's iPhone".to_string()),
            device_class: Some("IPHONE".to_string()),
            model: Some("iPhone 15 Pro".to_string()),
            enabled: Some(true),
            created_at: Some(chrono::Utc.with_ymd_and_hms(2026, 1, 12, 9, 30, 0).unwrap()),
        };

        let block = format_device(&device, &ctx());
        let plain = console::strip_ansi_codes(&block).to_string();

        assert!(plain.contains("Kim's iPhone"));
        assert!(plain.contains("00008110-000A1B2C3D4E5F6G"));
        assert!(plain.contains("iPhone 15 Pro"));
        assert!(plain.contains("Class        iPhone"));
        assert!(plain.contains("Enabled      yes"));
        assert!(plain.contains("2026-01-12 09:30 UTC"));
        assert!(plain.contains("Alpha (T1)"));
    }

    #[test]
    fn skips_absent_fields() {
        let block = format_device(&device("udid-1", None), &ctx());
        let plain = console::strip_ansi_codes(&block).to_string();

        assert!(plain.contains("Identifier"));
        assert!(!plain.contains("Name "));
        assert!(!plain.contains("Model"));
        assert!(!plain.contains("Created"));
    }

    #[test]
    fn team_label_falls_back_to_identifier() {
        let ctx = TeamContext {
            apple_team_name: None,
            apple_team_identifier: "T1",
        };
        assert_eq!(ctx.label(), "T1");
    }

    #[test]
    fn renders_separator_only_between_blocks() {
        let devices = vec![
            device("udid-1", Some("One")),
            device("udid-2", Some("Two")),
            device("udid-3", Some("Three")),
        ];

        let rendered = render_device_list(&devices, &ctx());
        let plain = console::strip_ansi_codes(&rendered).to_string();

        assert_eq!(plain.matches("———").count(), 2);
        assert!(!plain.starts_with('\n'));
        assert!(!plain.ends_with('\n'));

        let first = plain.find("udid-1").unwrap();
        let sep = plain.find("———").unwrap();
        let second = plain.find("udid-2").unwrap();
        assert!(first < sep && sep < second);
    }

    #[test]
    fn single_device_renders_without_separator() {
        let rendered = render_device_list(&[device("udid-1", None)], &ctx());
        assert!(!rendered.contains("———"));
    }

    #[test]
    fn empty_list_renders_to_nothing() {
        assert_eq!(render_device_list(&[], &ctx()), String::new());
    }
}
