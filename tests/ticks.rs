mod tests {
    use prop_lights::{Instant, ticks};

    #[test]
    fn test_elapsed_zero() {
        assert_eq!(ticks::elapsed_ms(42, 42), 0);
    }

    #[test]
    fn test_elapsed() {
        assert_eq!(ticks::elapsed_ms(100, 60), 40);
    }

    #[test]
    fn test_elapsed_across_wraparound() {
        assert_eq!(ticks::elapsed_ms(5, u32::MAX - 4), 10);
    }

    #[test]
    fn test_millis_truncates() {
        assert_eq!(ticks::millis(Instant::from_millis(1500)), 1500);
        assert_eq!(ticks::millis(Instant::from_millis(u64::from(u32::MAX) + 7)), 6);
    }
}
