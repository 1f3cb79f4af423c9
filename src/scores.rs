//! Best-score persistence
//!
//! One numeric value per storage key (LocalStorage on web), read at startup
//! and written on new-best events. Missing or unparseable values default to
//! zero rather than erroring.

/// Orbit Hop best score
pub const ORBIT_BEST_KEY: &str = "rocketArcade.orbit.best.v2";
/// Balance the Rocket best survival time (seconds)
pub const BALANCE_BEST_TIME_KEY: &str = "rocketArcade.balance.best.v2";
/// Balance the Rocket best score
pub const BALANCE_BEST_SCORE_KEY: &str = "rocketArcade.balance.bestScore.v2";

/// Gate Run bests are per calendar day: everyone flying today's seed
/// competes on today's key
pub fn gate_best_key(day_label: &str) -> String {
    format!("rocketArcade.gate.best.{day_label}")
}

/// A single persisted best-score numeral
#[derive(Debug, Clone)]
pub struct BestScore {
    key: String,
    pub value: f64,
}

impl BestScore {
    /// Load the best for a key, defaulting to zero when absent
    pub fn load(key: &str) -> Self {
        let value = read_value(key);
        Self {
            key: key.to_string(),
            value,
        }
    }

    /// Record a run result. Returns true (and persists) on a new best.
    pub fn submit(&mut self, value: f64) -> bool {
        if value <= self.value {
            return false;
        }
        self.value = value;
        write_value(&self.key, self.value);
        log::info!("New best for {}: {}", self.key, self.value);
        true
    }

    /// Hard reset back to zero (persisted)
    pub fn reset(&mut self) {
        self.value = 0.0;
        write_value(&self.key, 0.0);
    }
}

#[cfg(target_arch = "wasm32")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}

#[cfg(target_arch = "wasm32")]
fn read_value(key: &str) -> f64 {
    let Some(storage) = storage() else { return 0.0 };
    match storage.get_item(key) {
        Ok(Some(raw)) => raw.parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(target_arch = "wasm32")]
fn write_value(key: &str, value: f64) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(key, &value.to_string());
    }
}

/// Native stubs: the demo binary keeps bests in memory only
#[cfg(not(target_arch = "wasm32"))]
fn read_value(_key: &str) -> f64 {
    0.0
}

#[cfg(not(target_arch = "wasm32"))]
fn write_value(_key: &str, _value: f64) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_value_defaults_to_zero() {
        let best = BestScore::load(ORBIT_BEST_KEY);
        assert_eq!(best.value, 0.0);
    }

    #[test]
    fn test_submit_keeps_the_maximum() {
        let mut best = BestScore::load(ORBIT_BEST_KEY);
        assert!(best.submit(120.0));
        assert!(!best.submit(80.0), "lower result is not a new best");
        assert_eq!(best.value, 120.0);
        assert!(best.submit(121.0));
        assert_eq!(best.value, 121.0);
    }

    #[test]
    fn test_equal_result_is_not_a_new_best() {
        let mut best = BestScore::load(ORBIT_BEST_KEY);
        best.submit(50.0);
        assert!(!best.submit(50.0));
    }

    #[test]
    fn test_reset_clears_the_best() {
        let mut best = BestScore::load(ORBIT_BEST_KEY);
        best.submit(500.0);
        best.reset();
        assert_eq!(best.value, 0.0);
    }

    #[test]
    fn test_gate_keys_embed_the_day() {
        let a = gate_best_key("2026-08-07");
        let b = gate_best_key("2026-08-08");
        assert_ne!(a, b);
        assert!(a.contains("2026-08-07"));
    }
}
