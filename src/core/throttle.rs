use crate::domain::ports::DelayStrategy;
use std::time::Duration;

pub const DEFAULT_IMPORT_DELAY: Duration = Duration::from_millis(50);

/// 固定間隔，避免對 API 造成壓力
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(DEFAULT_IMPORT_DELAY)
    }
}

impl DelayStrategy for FixedDelay {
    fn delay_for(&self, _index: usize) -> Duration {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayStrategy for NoDelay {
    fn delay_for(&self, _index: usize) -> Duration {
        Duration::ZERO
    }
}

pub async fn pause(strategy: &dyn DelayStrategy, index: usize) {
    let delay = strategy.delay_for(index);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay_default_is_fifty_millis() {
        let delay = FixedDelay::default();
        assert_eq!(delay.delay_for(0), Duration::from_millis(50));
        assert_eq!(delay.delay_for(99), Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_no_delay_returns_immediately() {
        let start = std::time::Instant::now();
        for i in 0..100 {
            pause(&NoDelay, i).await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
