//! Status string presentation shared by the GUI and CLI front ends.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    Success,
    Info,
    Warning,
    Caution,
    Danger,
    Neutral,
}

/// Unrecognized statuses, including project and checkout states, are neutral.
pub fn status_tone(status: &str) -> StatusTone {
    match status {
        "available" => StatusTone::Success,
        "checked_out" => StatusTone::Info,
        "in_maintenance" => StatusTone::Warning,
        "needs_calibration" => StatusTone::Caution,
        "lost" | "damaged" => StatusTone::Danger,
        _ => StatusTone::Neutral,
    }
}

/// `in_maintenance` -> `IN MAINTENANCE`.
pub fn status_label(status: &str) -> String {
    status.replace('_', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_is_distinct_from_available_and_unknown() {
        let maintenance = status_tone("in_maintenance");
        assert_ne!(maintenance, status_tone("available"));
        assert_ne!(maintenance, status_tone("mystery_state"));
        assert_eq!(status_tone("mystery_state"), StatusTone::Neutral);
    }

    #[test]
    fn lost_and_damaged_share_danger_tone() {
        assert_eq!(status_tone("lost"), StatusTone::Danger);
        assert_eq!(status_tone("damaged"), StatusTone::Danger);
        assert_eq!(status_tone("needs_calibration"), StatusTone::Caution);
        assert_eq!(status_tone("checked_out"), StatusTone::Info);
    }

    #[test]
    fn labels_replace_every_underscore() {
        assert_eq!(status_label("in_maintenance"), "IN MAINTENANCE");
        assert_eq!(status_label("on_hold"), "ON HOLD");
        assert_eq!(status_label(""), "");
        assert_eq!(status_label("x_y_z"), "X Y Z");
    }
}
