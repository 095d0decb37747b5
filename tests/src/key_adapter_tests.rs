//! Key adapter against scripted embedded-hal pins

#[cfg(test)]
mod tests {
    use decoder_core::{
        ActiveLowKey, DecoderConfig, DecoderFSM, HalError, KeyInput, NoTone, PulseBuffer,
        PulseCode, TimingState,
    };
    use embedded_hal_mock::eh1::pin::{Mock as PinMock, State, Transaction};
    use embedded_hal_mock::eh1::MockError;
    use std::io::ErrorKind;

    #[test]
    fn test_active_low_levels() {
        let expectations = [
            Transaction::get(State::High),
            Transaction::get(State::Low),
            Transaction::get(State::High),
        ];
        let mut key = ActiveLowKey::new(PinMock::new(&expectations));

        assert!(!key.is_pressed().unwrap());
        assert!(key.is_pressed().unwrap());
        assert!(!key.is_pressed().unwrap());

        let mut pin = key.release();
        pin.done();
    }

    #[test]
    fn test_pin_error_maps_to_gpio_error() {
        let expectations =
            [Transaction::get(State::Low).with_error(MockError::Io(ErrorKind::NotConnected))];
        let mut key = ActiveLowKey::new(PinMock::new(&expectations));

        assert_eq!(key.is_pressed(), Err(HalError::GpioError));

        let mut pin = key.release();
        pin.done();
    }

    #[test]
    fn test_fsm_over_pin_dot() {
        // 3 samples low (pressed), then high until the character commits
        let config = DecoderConfig::default();
        let released = config.char_commit_ticks() as usize + 1;
        let mut expectations = Vec::new();
        expectations.extend(std::iter::repeat(Transaction::get(State::Low)).take(3));
        expectations.extend(std::iter::repeat(Transaction::get(State::High)).take(released));

        let mut key = ActiveLowKey::new(PinMock::new(&expectations));
        let mut tone = NoTone;
        let mut ring = PulseBuffer::new();
        let (mut tx, mut rx) = ring.split();
        let mut fsm = DecoderFSM::new(config);

        let mut emitted = Vec::new();
        for _ in 0..expectations.len() {
            if let Some(code) = fsm.on_tick(&mut key, &mut tone, &mut tx) {
                emitted.push(code);
            }
        }

        assert_eq!(emitted, vec![PulseCode::from_raw(0b10)]);
        assert_eq!(rx.try_pop(), Some(PulseCode::from_raw(0b10)));
        assert_eq!(fsm.current_state(), TimingState::Idle);

        let mut pin = key.release();
        pin.done();
    }
}
