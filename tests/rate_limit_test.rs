#[cfg(test)]
mod fixed_window_rate_limiting {
    use std::time::Duration;

    use seloger::utilities::rate_limit::{RateLimitConfig, RateLimiter};

    const WINDOW: RateLimitConfig = RateLimitConfig {
        window_ms: 60_000,
        max_requests: 2,
    };

    #[tokio::test]
    async fn zero_max_requests_never_allows() {
        let limiter = RateLimiter::in_memory();
        let config = RateLimitConfig {
            window_ms: 60_000,
            max_requests: 0,
        };

        for _ in 0..3 {
            let outcome = limiter.check("ip:1.2.3.4", config).await.unwrap();
            assert!(!outcome.allowed);
            assert_eq!(outcome.remaining, 0);
        }
    }

    #[tokio::test]
    async fn third_call_in_window_is_denied() {
        let limiter = RateLimiter::in_memory();

        let first = limiter.check("ip:1.2.3.4", WINDOW).await.unwrap();
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);

        let second = limiter.check("ip:1.2.3.4", WINDOW).await.unwrap();
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);

        let third = limiter.check("ip:1.2.3.4", WINDOW).await.unwrap();
        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);
    }

    #[tokio::test]
    async fn window_expiry_starts_a_fresh_count() {
        let limiter = RateLimiter::in_memory();
        let config = RateLimitConfig {
            window_ms: 50,
            max_requests: 2,
        };

        assert!(limiter.check("ip:1.2.3.4", config).await.unwrap().allowed);
        assert!(limiter.check("ip:1.2.3.4", config).await.unwrap().allowed);
        assert!(!limiter.check("ip:1.2.3.4", config).await.unwrap().allowed);

        tokio::time::sleep(Duration::from_millis(80)).await;

        let fresh = limiter.check("ip:1.2.3.4", config).await.unwrap();
        assert!(fresh.allowed);
        assert_eq!(fresh.remaining, 1);
    }

    #[tokio::test]
    async fn identities_are_counted_separately() {
        let limiter = RateLimiter::in_memory();
        let config = RateLimitConfig {
            window_ms: 60_000,
            max_requests: 1,
        };

        assert!(limiter.check("user:a", config).await.unwrap().allowed);
        assert!(!limiter.check("user:a", config).await.unwrap().allowed);
        assert!(limiter.check("user:b", config).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn windows_of_different_lengths_do_not_collide() {
        let limiter = RateLimiter::in_memory();
        let short = RateLimitConfig {
            window_ms: 1_000,
            max_requests: 1,
        };
        let long = RateLimitConfig {
            window_ms: 60_000,
            max_requests: 1,
        };

        assert!(limiter.check("ip:1.2.3.4", short).await.unwrap().allowed);
        assert!(limiter.check("ip:1.2.3.4", long).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn reset_time_lands_at_the_window_end() {
        let limiter = RateLimiter::in_memory();
        let before = chrono::Utc::now().timestamp_millis();

        let outcome = limiter.check("ip:1.2.3.4", WINDOW).await.unwrap();
        let after = chrono::Utc::now().timestamp_millis();

        assert!(outcome.reset_at_ms >= before + WINDOW.window_ms);
        assert!(outcome.reset_at_ms <= after + WINDOW.window_ms);
    }
}
