mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use embedded_hal::delay::DelayNs;
    use prop_lights::{
        ConfigCell, ConfigRecord, Instant, LedStripChannel, Light, LightConfig, Rgb, StripDriver,
    };

    #[derive(Clone, Default)]
    struct RecordingStrip(Rc<RefCell<Vec<Vec<Rgb>>>>);

    impl StripDriver for RecordingStrip {
        fn write(&mut self, colors: &[Rgb]) {
            self.0.borrow_mut().push(colors.to_vec());
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn steady(_elapsed: u32, _pattern: u8, _prev: u8, _step: u8) -> u8 {
        255
    }

    /// Position-dependent wash, so shared-buffer writes are observable.
    #[allow(clippy::cast_possible_truncation)]
    fn ramp(_now_ms: u32, pixels: &mut [Rgb]) {
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = Rgb {
                r: i as u8,
                g: 0,
                b: 0,
            };
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    fn channel(
        cell: &ConfigCell,
        driver: RecordingStrip,
    ) -> LedStripChannel<'_, RecordingStrip, NoDelay, 8> {
        // two flicker patterns, so the idle wash sits on id 2
        LedStripChannel::new(cell.handle(), steady, 2, ramp, driver, 4, NoDelay)
    }

    #[test]
    fn test_unsized_strip_shares_first_buffer() {
        let cell = ConfigCell::new();
        let first = RecordingStrip::default();
        let second = RecordingStrip::default();
        let mut strip = channel(&cell, first.clone());
        assert!(strip.add_strip(second.clone(), None).is_ok());

        assert_eq!(strip.buffer_index(0), Some(0));
        assert_eq!(strip.buffer_index(1), Some(0));

        // Select the idle slot so the render is position-dependent, then
        // check the wash written through buffer 0 shows on both bindings.
        cell.handle().set_pattern(2);
        strip.setup(at(0));
        strip.update(at(16));

        let expected: Vec<Rgb> = (0u8..4).map(|i| Rgb { r: i, g: 0, b: 0 }).collect();
        assert_eq!(strip.pixels(0).unwrap(), expected.as_slice());
        assert_eq!(strip.pixels(1).unwrap(), expected.as_slice());
        assert_eq!(first.0.borrow().last().unwrap(), &expected);
        assert_eq!(second.0.borrow().last().unwrap(), &expected);
    }

    #[test]
    fn test_sized_strip_gets_own_buffer() {
        let cell = ConfigCell::new();
        let mut strip = channel(&cell, RecordingStrip::default());
        assert!(strip.add_strip(RecordingStrip::default(), Some(2)).is_ok());

        assert_eq!(strip.buffer_index(1), Some(1));
        assert_eq!(strip.pixels(1).unwrap().len(), 2);
    }

    #[test]
    fn test_strip_slots_are_bounded() {
        let cell = ConfigCell::new();
        let mut strip = channel(&cell, RecordingStrip::default());
        assert!(strip.add_strip(RecordingStrip::default(), None).is_ok());
        assert!(strip.add_strip(RecordingStrip::default(), None).is_ok());
        assert!(strip.add_strip(RecordingStrip::default(), None).is_err());
    }

    #[test]
    fn test_brightness_ceiling() {
        let cell = ConfigCell::new();
        let driver = RecordingStrip::default();
        let mut strip = channel(&cell, driver.clone());
        strip.set_max_brightness(0);
        strip.setup(at(0));
        assert!(strip.update(at(16)));
        // a zero ceiling blacks the strip out no matter the flicker value
        assert_eq!(strip.pixels(0).unwrap(), &[BLACK; 4]);
    }

    #[test]
    fn test_update_reports_active_even_when_gated() {
        let cell = ConfigCell::new();
        let driver = RecordingStrip::default();
        let mut strip = channel(&cell, driver.clone());
        strip.setup(at(0));
        assert!(strip.update(at(1)));
        // only the setup frame went out
        assert_eq!(driver.0.borrow().len(), 1);
    }

    #[test]
    fn test_pulse_flashes_white_black() {
        let cell = ConfigCell::new();
        let driver = RecordingStrip::default();
        let mut strip = channel(&cell, driver.clone());
        strip.setup(at(0));
        strip.pulse();

        let frames = driver.0.borrow();
        assert_eq!(frames.len(), 9);
        for pair in frames[1..].chunks(2) {
            assert_eq!(pair[0].as_slice(), &[WHITE; 4]);
            assert_eq!(pair[1].as_slice(), &[BLACK; 4]);
        }
    }

    #[test]
    fn test_next_pattern_includes_idle_slot() {
        let cell = ConfigCell::new();
        let mut strip = channel(&cell, RecordingStrip::default());
        strip.next_pattern();
        strip.next_pattern();
        assert_eq!(strip.selected_pattern(), 2);
        strip.next_pattern();
        assert_eq!(strip.selected_pattern(), 0);
    }

    #[test]
    fn test_color_cycle_advances_hue() {
        let cell = ConfigCell::new();
        let mut strip = channel(&cell, RecordingStrip::default());
        cell.handle().set_cycle_color(true);
        strip.setup(at(0));

        strip.update(at(25));
        assert_eq!(cell.handle().snapshot().hue, 1);
        // gate holds inside the 20ms window
        strip.update(at(30));
        assert_eq!(cell.handle().snapshot().hue, 1);
        strip.update(at(45));
        assert_eq!(cell.handle().snapshot().hue, 2);
    }

    #[test]
    fn test_deserialize_wraps_to_selectable_range() {
        let cell = ConfigCell::new();
        let mut strip = channel(&cell, RecordingStrip::default());
        let record = ConfigRecord::pack(LightConfig {
            cycle_color: false,
            pattern_id: 7,
            hue: 0,
            saturation: 0,
        });
        strip.deserialize(&record);
        assert_eq!(strip.selected_pattern(), 7 % 3);
        assert!(cell.handle().take_changed());
    }
}
