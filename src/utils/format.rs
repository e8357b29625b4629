use chrono::{DateTime, Utc};

pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    if bytes < 1024 * 1024 {
        return format!("{:.1} KB", bytes as f64 / 1024.0);
    }
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

const INTERVALS: &[(&str, i64)] = &[
    ("año", 31_536_000),
    ("mes", 2_592_000),
    ("semana", 604_800),
    ("día", 86_400),
    ("hora", 3_600),
    ("minuto", 60),
];

/// 以西班牙文顯示相對時間，例如 "Hace 3 horas"
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    for (name, span) in INTERVALS {
        let count = seconds / span;
        if count >= 1 {
            let suffix = match (count > 1, *name) {
                (false, _) => "",
                (true, "mes") => "es",
                (true, _) => "s",
            };
            return format!("Hace {} {}{}", count, name, suffix);
        }
    }

    "Justo ahora".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
    }

    #[test]
    fn test_time_ago() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(20), now), "Justo ahora");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "Hace 1 minuto");
        assert_eq!(time_ago(now - Duration::hours(5), now), "Hace 5 horas");
        assert_eq!(time_ago(now - Duration::days(65), now), "Hace 2 meses");
        assert_eq!(time_ago(now - Duration::days(400), now), "Hace 1 año");
    }
}
