//! Core data types for the Morse decoder

/// Morse code elements
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    /// Short key-down pulse
    Dot,
    /// Long key-down pulse
    Dash,
}

impl Element {
    /// Bit appended to a [`PulseCode`] for this element
    pub const fn bit(&self) -> u8 {
        match self {
            Element::Dot => 0,
            Element::Dash => 1,
        }
    }

    /// Tone level sounded while this element is being keyed
    pub const fn tone_level(&self) -> ToneLevel {
        match self {
            Element::Dot => ToneLevel::Dot,
            Element::Dash => ToneLevel::Dash,
        }
    }
}

/// Sentinel-prefixed pulse accumulator.
///
/// The leading `1` marks where the symbol starts, so `.` (`0b10`) and
/// `..` (`0b100`) stay distinct. Dots append `0`, dashes append `1`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseCode(u8);

impl PulseCode {
    /// Empty accumulator holding only the sentinel bit
    pub const SENTINEL: PulseCode = PulseCode(1);

    /// Longest symbol the accumulator can hold before the sentinel would
    /// be shifted out
    pub const MAX_ELEMENTS: u32 = 7;

    /// Wrap a raw code as read from the ring buffer
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw code value
    pub const fn raw(&self) -> u8 {
        self.0
    }

    /// True if no element has been appended yet
    pub const fn is_empty(&self) -> bool {
        self.0 == Self::SENTINEL.0
    }

    /// Number of elements accumulated after the sentinel
    pub const fn len(&self) -> u32 {
        match self.0 {
            0 => 0,
            raw => 7 - raw.leading_zeros(),
        }
    }

    /// Append one element.
    ///
    /// Once [`Self::MAX_ELEMENTS`] elements are held further elements are
    /// dropped; the code then stays outside the table and decodes as unknown.
    pub fn push(&mut self, element: Element) {
        if self.0 & 0x80 != 0 {
            return;
        }
        self.0 = (self.0 << 1) | element.bit();
    }

    /// Builder form of [`Self::push`]
    pub const fn with(self, element: Element) -> Self {
        if self.0 & 0x80 != 0 {
            return self;
        }
        Self((self.0 << 1) | element.bit())
    }

    /// Build a code from a dot/dash pattern such as `".-"`.
    ///
    /// Characters other than `.` and `-` are skipped.
    pub fn from_pattern(pattern: &str) -> Self {
        let mut code = Self::SENTINEL;
        for ch in pattern.chars() {
            match ch {
                '.' => code.push(Element::Dot),
                '-' => code.push(Element::Dash),
                _ => {}
            }
        }
        code
    }

    /// Elements of this code in keying order
    pub fn elements(&self) -> impl Iterator<Item = Element> {
        let raw = self.0;
        let len = self.len();
        (0..len).rev().map(move |shift| {
            if raw >> shift & 1 == 1 {
                Element::Dash
            } else {
                Element::Dot
            }
        })
    }
}

impl Default for PulseCode {
    fn default() -> Self {
        Self::SENTINEL
    }
}

impl From<PulseCode> for u8 {
    fn from(code: PulseCode) -> u8 {
        code.0
    }
}

/// Tone intensity presets
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneLevel {
    /// Louder preset used while a pulse may still be a dot
    Dot,
    /// Quieter preset once the pulse has become a dash
    Dash,
}

/// Tone side effect requested by one tick of the timing FSM
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneAction {
    /// Leave the tone output as it is
    Unchanged,
    /// Enable the tone at the given level
    Sound(ToneLevel),
    /// Disable the tone
    Silence,
}

/// FSM states of the timing state machine
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingState {
    /// Key released, no symbol in progress
    Idle,
    /// Key held, not yet long enough to be a dash
    DotOrDash,
    /// Key still held after the pulse became a dash
    DashExtension,
    /// Key released inside a symbol, waiting for the next pulse
    SymbolGap,
    /// Symbol finished, waiting for the character to be committed
    CharacterGap,
}

impl TimingState {
    /// Returns true if this state expects the key to be held
    pub const fn is_keyed(&self) -> bool {
        match self {
            TimingState::DotOrDash | TimingState::DashExtension => true,
            TimingState::Idle | TimingState::SymbolGap | TimingState::CharacterGap => false,
        }
    }

    /// Returns true if a symbol is being accumulated
    pub const fn in_symbol(&self) -> bool {
        !matches!(self, TimingState::Idle)
    }
}

/// Decoder configuration parameters, all durations in timer ticks
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderConfig {
    /// Key-down ticks before a pulse counts as a dash
    pub dot_ticks: u16,
    /// Re-arm period while a dash is held
    pub dash_hold_ticks: u16,
    /// Silence that ends a symbol
    pub symbol_gap_ticks: u16,
    /// Further silence before the character is committed
    pub char_gap_ticks: u16,
    /// Grace countdown armed in Idle after a character is committed
    pub idle_grace_ticks: u16,
    /// Tone duty cycle for the dot level, in percent
    pub dot_duty_percent: u8,
    /// Tone duty cycle for the dash level, in percent
    pub dash_duty_percent: u8,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            dot_ticks: 128,
            dash_hold_ticks: 240,
            symbol_gap_ticks: 255,
            char_gap_ticks: 128,
            idle_grace_ticks: 64,
            dot_duty_percent: 50,
            dash_duty_percent: 25,
        }
    }
}

impl DecoderConfig {
    /// Create a new configuration with validation
    pub fn new(
        dot_ticks: u16,
        dash_hold_ticks: u16,
        symbol_gap_ticks: u16,
        char_gap_ticks: u16,
        idle_grace_ticks: u16,
        dot_duty_percent: u8,
        dash_duty_percent: u8,
    ) -> Result<Self, &'static str> {
        if dot_ticks == 0 || dash_hold_ticks == 0 {
            return Err("Pulse thresholds must be at least one tick");
        }
        if symbol_gap_ticks == 0 || char_gap_ticks == 0 {
            return Err("Gap thresholds must be at least one tick");
        }
        if dot_duty_percent == 0 || dot_duty_percent > 100 {
            return Err("Dot duty must be between 1 and 100 percent");
        }
        if dash_duty_percent == 0 || dash_duty_percent > 100 {
            return Err("Dash duty must be between 1 and 100 percent");
        }

        Ok(Self {
            dot_ticks,
            dash_hold_ticks,
            symbol_gap_ticks,
            char_gap_ticks,
            idle_grace_ticks,
            dot_duty_percent,
            dash_duty_percent,
        })
    }

    /// Duty cycle preset for a tone level
    pub const fn duty_percent(&self, level: ToneLevel) -> u8 {
        match level {
            ToneLevel::Dot => self.dot_duty_percent,
            ToneLevel::Dash => self.dash_duty_percent,
        }
    }

    /// Silence after the last pulse before a character is pushed
    pub const fn char_commit_ticks(&self) -> u32 {
        self.symbol_gap_ticks as u32 + self.char_gap_ticks as u32
    }
}

/// Options passed to the character display at start-up
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayOptions {
    /// Display enabled
    pub display_on: bool,
    /// Underline cursor visible
    pub cursor_on: bool,
    /// Cursor blinking
    pub blink: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            display_on: true,
            cursor_on: false,
            blink: false,
        }
    }
}
