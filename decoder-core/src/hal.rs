//! Hardware Abstraction Layer for the decoder

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::types::{DecoderConfig, DisplayOptions, ToneLevel};

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// PWM channel rejected a duty cycle
    PwmError,
    /// Display driver failed
    DisplayError,
    /// Hardware not initialized
    NotInitialized,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::PwmError => write!(f, "PWM operation failed"),
            HalError::DisplayError => write!(f, "Display operation failed"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Trait for the straight-key input
pub trait KeyInput {
    type Error: From<HalError>;

    /// Check if the key is currently pressed
    fn is_pressed(&mut self) -> Result<bool, Self::Error>;
}

/// Trait for the sidetone output
pub trait ToneOutput {
    type Error: From<HalError>;

    /// Start sounding (or change to) the given level
    fn enable(&mut self, level: ToneLevel) -> Result<(), Self::Error>;

    /// Stop sounding
    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// Trait for a character display such as an HD44780 module
pub trait CharacterDisplay {
    type Error: From<HalError>;

    /// Initialize the controller
    fn init(&mut self, options: DisplayOptions) -> Result<(), Self::Error>;

    /// Clear the screen and home the cursor
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Move the cursor to column `x`, row `y`
    fn move_cursor(&mut self, x: u8, y: u8) -> Result<(), Self::Error>;

    /// Write one character at the cursor and advance it
    fn write_char(&mut self, c: char) -> Result<(), Self::Error>;
}

/// Key on an embedded-hal input pin with pull-up, pressed = low
pub struct ActiveLowKey<P> {
    pin: P,
}

impl<P> ActiveLowKey<P>
where
    P: InputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Give back the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> KeyInput for ActiveLowKey<P>
where
    P: InputPin,
{
    type Error = HalError;

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low().map_err(|_| HalError::GpioError)
    }
}

/// Sidetone on an embedded-hal PWM channel.
///
/// Enabling selects the duty preset for the level, disabling drives the
/// channel fully off.
pub struct PwmTone<P> {
    channel: P,
    dot_duty_percent: u8,
    dash_duty_percent: u8,
    enabled: bool,
}

impl<P> PwmTone<P>
where
    P: SetDutyCycle,
{
    pub fn new(channel: P, config: &DecoderConfig) -> Self {
        Self {
            channel,
            dot_duty_percent: config.dot_duty_percent,
            dash_duty_percent: config.dash_duty_percent,
            enabled: false,
        }
    }

    /// True while the channel is driven with a tone
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Give back the channel
    pub fn release(self) -> P {
        self.channel
    }
}

impl<P> ToneOutput for PwmTone<P>
where
    P: SetDutyCycle,
{
    type Error = HalError;

    fn enable(&mut self, level: ToneLevel) -> Result<(), Self::Error> {
        let percent = match level {
            ToneLevel::Dot => self.dot_duty_percent,
            ToneLevel::Dash => self.dash_duty_percent,
        };
        self.channel
            .set_duty_cycle_percent(percent)
            .map_err(|_| HalError::PwmError)?;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.channel
            .set_duty_cycle_fully_off()
            .map_err(|_| HalError::PwmError)?;
        self.enabled = false;
        Ok(())
    }
}

/// Tone output for builds without a sounder
pub struct NoTone;

impl ToneOutput for NoTone {
    type Error = HalError;

    fn enable(&mut self, _level: ToneLevel) -> Result<(), Self::Error> {
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::Cell;
    use heapless::{String, Vec};

    #[derive(Default)]
    pub struct MockKey {
        pressed: Cell<bool>,
        fail: Cell<bool>,
    }

    impl MockKey {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_pressed(&self, pressed: bool) {
            self.pressed.set(pressed);
        }

        /// Make subsequent reads fail
        pub fn set_failing(&self, fail: bool) {
            self.fail.set(fail);
        }

        fn read(&self) -> Result<bool, HalError> {
            if self.fail.get() {
                return Err(HalError::GpioError);
            }
            Ok(self.pressed.get())
        }
    }

    impl KeyInput for MockKey {
        type Error = HalError;

        fn is_pressed(&mut self) -> Result<bool, Self::Error> {
            self.read()
        }
    }

    /// Shared handle, so a test can move the key while the FSM samples it
    impl KeyInput for &MockKey {
        type Error = HalError;

        fn is_pressed(&mut self) -> Result<bool, Self::Error> {
            (**self).read()
        }
    }

    /// Tone state change recorded by [`MockTone`]
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum ToneEvent {
        On(ToneLevel),
        Off,
    }

    #[derive(Default)]
    pub struct MockTone {
        level: Option<ToneLevel>,
        events: Vec<ToneEvent, 64>,
    }

    impl MockTone {
        pub fn new() -> Self {
            Self::default()
        }

        /// Level currently sounding, `None` when silent
        pub fn level(&self) -> Option<ToneLevel> {
            self.level
        }

        pub fn is_active(&self) -> bool {
            self.level.is_some()
        }

        /// Recorded changes, oldest first (first 64 kept)
        pub fn events(&self) -> &[ToneEvent] {
            &self.events
        }

        pub fn clear_events(&mut self) {
            self.events.clear();
        }
    }

    impl ToneOutput for MockTone {
        type Error = HalError;

        fn enable(&mut self, level: ToneLevel) -> Result<(), Self::Error> {
            self.level = Some(level);
            self.events.push(ToneEvent::On(level)).ok();
            Ok(())
        }

        fn disable(&mut self) -> Result<(), Self::Error> {
            self.level = None;
            self.events.push(ToneEvent::Off).ok();
            Ok(())
        }
    }

    /// 16x2 text display that keeps what is on screen
    pub struct MockDisplay {
        options: Option<DisplayOptions>,
        cells: [[char; 16]; 2],
        cursor: (u8, u8),
        clears: usize,
        written: usize,
    }

    impl Default for MockDisplay {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockDisplay {
        pub const COLUMNS: u8 = 16;
        pub const ROWS: u8 = 2;

        pub fn new() -> Self {
            Self {
                options: None,
                cells: [[' '; 16]; 2],
                cursor: (0, 0),
                clears: 0,
                written: 0,
            }
        }

        /// Options passed to `init`, `None` before initialization
        pub fn options(&self) -> Option<DisplayOptions> {
            self.options
        }

        /// Text of one row without trailing blanks
        pub fn row(&self, y: u8) -> String<64> {
            let mut text = String::new();
            if let Some(cells) = self.cells.get(y as usize) {
                for &c in cells.iter() {
                    text.push(c).ok();
                }
            }
            while text.ends_with(' ') {
                text.pop();
            }
            text
        }

        pub fn cursor(&self) -> (u8, u8) {
            self.cursor
        }

        /// Number of `clear` calls
        pub fn clears(&self) -> usize {
            self.clears
        }

        /// Number of `write_char` calls
        pub fn written(&self) -> usize {
            self.written
        }
    }

    impl CharacterDisplay for MockDisplay {
        type Error = HalError;

        fn init(&mut self, options: DisplayOptions) -> Result<(), Self::Error> {
            self.options = Some(options);
            Ok(())
        }

        fn clear(&mut self) -> Result<(), Self::Error> {
            if self.options.is_none() {
                return Err(HalError::NotInitialized);
            }
            self.cells = [[' '; 16]; 2];
            self.cursor = (0, 0);
            self.clears += 1;
            Ok(())
        }

        fn move_cursor(&mut self, x: u8, y: u8) -> Result<(), Self::Error> {
            if self.options.is_none() {
                return Err(HalError::NotInitialized);
            }
            if x >= Self::COLUMNS || y >= Self::ROWS {
                return Err(HalError::InvalidConfig);
            }
            self.cursor = (x, y);
            Ok(())
        }

        fn write_char(&mut self, c: char) -> Result<(), Self::Error> {
            if self.options.is_none() {
                return Err(HalError::NotInitialized);
            }
            let (x, y) = self.cursor;
            self.written += 1;
            // Characters past the last column are lost, as on the module
            if x < Self::COLUMNS {
                self.cells[y as usize][x as usize] = c;
                self.cursor = (x + 1, y);
            }
            Ok(())
        }
    }
}
