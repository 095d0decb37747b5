//! Async task tests on the embassy mock time driver

#[cfg(test)]
mod tests {
    use core::cell::RefCell;
    use core::future::Future;
    use core::pin::pin;
    use core::task::{Context, Waker};
    use std::sync::Mutex;

    use decoder_core::mock::{MockDisplay, MockKey};
    use decoder_core::{
        render_task, timing_task, CharacterDisplay, DecoderConfig, DisplayOptions, HalError,
        NoTone, PulseBuffer,
    };
    use embassy_time::{Duration, MockDriver};

    /// Mock time is process-wide, so tests take turns
    static CLOCK: Mutex<()> = Mutex::new(());

    /// Display handle the test keeps reading while the render task owns it
    struct SharedDisplay<'a>(&'a RefCell<MockDisplay>);

    impl CharacterDisplay for SharedDisplay<'_> {
        type Error = HalError;

        fn init(&mut self, options: DisplayOptions) -> Result<(), Self::Error> {
            self.0.borrow_mut().init(options)
        }

        fn clear(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().clear()
        }

        fn move_cursor(&mut self, x: u8, y: u8) -> Result<(), Self::Error> {
            self.0.borrow_mut().move_cursor(x, y)
        }

        fn write_char(&mut self, c: char) -> Result<(), Self::Error> {
            self.0.borrow_mut().write_char(c)
        }
    }

    fn tick() -> Duration {
        Duration::from_micros(125)
    }

    /// Run both tasks for one key sample per tick, advancing mock time
    /// between samples
    fn run_tasks(levels: &[(bool, u32)], display: &RefCell<MockDisplay>) {
        let _clock = CLOCK.lock().unwrap_or_else(|e| e.into_inner());
        let driver = MockDriver::get();

        let key = MockKey::new();
        let mut ring = PulseBuffer::new();
        let (producer, consumer) = ring.split();

        let mut timing = pin!(timing_task(
            &key,
            NoTone,
            producer,
            DecoderConfig::default(),
            tick()
        ));
        let mut render = pin!(render_task(SharedDisplay(display), consumer, tick()));
        let mut cx = Context::from_waker(Waker::noop());

        for &(pressed, ticks) in levels {
            key.set_pressed(pressed);
            for _ in 0..ticks {
                assert!(timing.as_mut().poll(&mut cx).is_pending());
                // Polling again before the ticker fires must not sample twice
                assert!(timing.as_mut().poll(&mut cx).is_pending());
                assert!(render.as_mut().poll(&mut cx).is_pending());
                driver.advance(tick());
            }
        }
        assert!(render.as_mut().poll(&mut cx).is_pending());
    }

    #[test]
    fn test_keyed_e_reaches_display() {
        let display = RefCell::new(MockDisplay::new());
        run_tasks(&[(true, 20), (false, 400)], &display);

        let display = display.borrow();
        assert!(display.options().is_some());
        assert_eq!(display.row(0).as_str(), "E");
        assert_eq!(display.written(), 1);
    }

    #[test]
    fn test_ticker_paces_dash_threshold() {
        let dot = RefCell::new(MockDisplay::new());
        run_tasks(&[(true, 128), (false, 400)], &dot);
        assert_eq!(dot.borrow().row(0).as_str(), "E");

        let dash = RefCell::new(MockDisplay::new());
        run_tasks(&[(true, 129), (false, 400)], &dash);
        assert_eq!(dash.borrow().row(0).as_str(), "T");
    }

    #[test]
    fn test_idle_key_leaves_display_blank() {
        let display = RefCell::new(MockDisplay::new());
        run_tasks(&[(false, 500)], &display);

        let display = display.borrow();
        assert!(display.options().is_some());
        assert_eq!(display.cursor(), (0, 0));
        assert_eq!(display.written(), 0);
    }

    #[test]
    fn test_two_characters_through_tasks() {
        // N (dash dot), then I (dot dot) after a character gap
        let display = RefCell::new(MockDisplay::new());
        run_tasks(
            &[
                (true, 200),
                (false, 50),
                (true, 20),
                (false, 320),
                (true, 20),
                (false, 50),
                (true, 20),
                (false, 400),
            ],
            &display,
        );
        assert_eq!(display.borrow().row(0).as_str(), "NI");
    }
}
