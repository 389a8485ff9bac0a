//! Plain-text rendering of dashboard views.

use pocket_weather::{
    AdviceIcon, Advisory, AlertSeverity, ComparisonTable, Observation, Priority, Trend,
    WeatherAlert,
};

/// A reading with its unit, or "n/a" when it is missing
pub fn reading(value: f64, unit: &str) -> String {
    if value.is_finite() {
        format!("{}{}", value, unit)
    } else {
        "n/a".to_string()
    }
}

fn priority_badge(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "[HIGH]  ",
        Priority::Medium => "[MEDIUM]",
        Priority::Low => "[LOW]   ",
    }
}

fn advice_symbol(icon: AdviceIcon) -> &'static str {
    match icon {
        AdviceIcon::Umbrella => "☂",
        AdviceIcon::Sunglasses => "😎",
        AdviceIcon::Thermometer => "🌡",
        AdviceIcon::Shirt => "🧥",
        AdviceIcon::Snowflake => "❄",
        AdviceIcon::Wind => "💨",
        AdviceIcon::Droplets => "💧",
        AdviceIcon::Sun => "☀",
        AdviceIcon::Cloud => "☁",
        AdviceIcon::AlertTriangle => "⚠",
        AdviceIcon::Mask => "😷",
    }
}

fn severity_marker(severity: AlertSeverity) -> &'static str {
    match severity {
        AlertSeverity::Low => "i",
        AlertSeverity::Moderate => "!",
        AlertSeverity::High => "!!",
        AlertSeverity::Extreme => "!!!",
    }
}

pub fn cards(observations: &[Observation]) -> String {
    let mut out = String::from("Current Weather\n");
    for o in observations {
        out.push_str(&card(o));
    }
    out
}

fn card(o: &Observation) -> String {
    let marker = if o.is_current_location { " (current location)" } else { "" };
    let mut card = format!(
        "\n  {}, {}{}\n    {}  {}  {}\n    feels like {}  high {}  low {}\n",
        o.city,
        o.country,
        marker,
        reading(o.temperature, "°C"),
        o.condition.description(),
        o.description,
        reading(o.feels_like, "°C"),
        reading(o.high, "°C"),
        reading(o.low, "°C"),
    );
    card.push_str(&format!(
        "    humidity {}  wind {}  UV {}  visibility {}  pressure {}\n",
        reading(o.humidity, "%"),
        reading(o.wind_speed, " km/h"),
        reading(o.uv_index, ""),
        reading(o.visibility, " km"),
        reading(o.pressure, " hPa"),
    ));
    if let (Some(rise), Some(set)) = (o.sunrise, o.sunset) {
        card.push_str(&format!(
            "    sunrise {}  sunset {} (UTC)\n",
            rise.format("%H:%M"),
            set.format("%H:%M")
        ));
    }
    card
}

pub fn alerts(alerts: &[&WeatherAlert]) -> String {
    let mut out = String::from("Weather Alerts\n");
    for a in alerts {
        out.push_str(&format!(
            "\n  {:<3} {} [{}] {}\n",
            severity_marker(a.severity),
            a.title,
            a.kind.label(),
            a.cities.join(", ")
        ));
        if !a.description.is_empty() {
            out.push_str(&format!("      {}\n", a.description));
        }
        out.push_str(&format!(
            "      Expires: {}\n",
            a.expires_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    out
}

pub fn comparison(table: &ComparisonTable) -> String {
    const LABEL_WIDTH: usize = 12;
    const CELL_WIDTH: usize = 18;

    let mut out = String::from("City Comparison\n\n");
    out.push_str(&format!("  {:<LABEL_WIDTH$}", "Metric"));
    for city in &table.cities {
        out.push_str(&format!("{:>CELL_WIDTH$}", city.city));
    }
    out.push('\n');

    for row in &table.rows {
        out.push_str(&format!("  {:<LABEL_WIDTH$}", row.metric.label));
        for cell in &row.cells {
            let value = reading(cell.value, row.metric.unit);
            let marker = match cell.trend {
                Trend::Best => "best",
                _ => cell.trend.arrow(),
            };
            out.push_str(&format!("{:>CELL_WIDTH$}", format!("{} {}", value, marker)));
        }
        out.push('\n');
    }
    out
}

pub fn advice(advice: &[Advisory]) -> String {
    let mut out = String::from("Weather Advice\n");
    if advice.is_empty() {
        out.push_str("\n  Nothing to watch out for.\n");
        return out;
    }
    for a in advice {
        out.push_str(&format!(
            "\n  {} {} {}\n      {}\n",
            priority_badge(a.priority),
            advice_symbol(a.icon),
            a.title,
            a.description
        ));
    }
    out
}
