//! Lifecycle of the telemetry pipeline.

/// `Idle` until sensor availability is confirmed, then `Active` for the rest
/// of the session. Sensor loss after start surfaces as delivery errors, not
/// as a transition back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorStatus {
    #[default]
    Idle,
    Active,
}

impl SensorStatus {
    pub fn is_active(self) -> bool {
        matches!(self, SensorStatus::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SensorStatus::Idle => "idle",
            SensorStatus::Active => "active",
        }
    }
}

impl std::fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
