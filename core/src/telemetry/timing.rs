use std::time::{Duration, Instant};

/// Runs `f` and logs how long it took under `label`.
pub fn timed<T, F: FnOnce() -> T>(label: &str, f: F) -> (T, Duration) {
    let started = Instant::now();
    let value = f();
    let elapsed = started.elapsed();
    log::info!("{} took {:.3} ms", label, elapsed.as_secs_f64() * 1e3);
    (value, elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_returns_closure_value() {
        let (value, elapsed) = timed("sleep", || {
            std::thread::sleep(Duration::from_millis(5));
            7
        });
        assert_eq!(value, 7);
        assert!(elapsed >= Duration::from_millis(5));
    }
}
