//! Maps `Box<dyn Error>` from the sensor boundary to typed `TelemetryError`.
//!
//! `gforce_traits::MotionSensor` returns `Box<dyn Error + Send + Sync>`; with
//! the `sim-errors` feature, `gforce_sim::error::SimError` is downcast for a
//! precise mapping before falling back to the message text.

use crate::error::TelemetryError;

pub fn map_sensor_error(e: &(dyn std::error::Error + 'static)) -> TelemetryError {
    #[cfg(feature = "sim-errors")]
    {
        use gforce_sim::error::SimError;
        if let Some(sim) = e.downcast_ref::<SimError>() {
            return match sim {
                SimError::Unavailable => TelemetryError::SensorUnavailable(sim.to_string()),
                other => TelemetryError::SensorDelivery(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("unavailable") || lower.contains("not available") {
        TelemetryError::SensorUnavailable(s)
    } else {
        TelemetryError::SensorDelivery(s)
    }
}
