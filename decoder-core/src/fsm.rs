//! Tick-driven timing state machine for straight-key decoding

use crate::hal::{KeyInput, ToneOutput};
use crate::ring::PulseProducer;
use crate::types::{DecoderConfig, Element, PulseCode, TimingState, ToneAction, ToneLevel};

/// Effects of one tick
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    /// Requested change of the tone output
    pub tone: ToneAction,
    /// Completed character code to hand to the renderer
    pub emitted: Option<PulseCode>,
}

impl TickOutput {
    const NONE: TickOutput = TickOutput {
        tone: ToneAction::Unchanged,
        emitted: None,
    };

    const fn tone(tone: ToneAction) -> Self {
        Self { tone, emitted: None }
    }
}

/// Main decoder FSM implementation.
///
/// Owned by the timer context; nothing in here is shared with the
/// rendering loop except the codes pushed through the producer.
pub struct DecoderFSM {
    state: TimingState,
    countdown: u16,
    code: PulseCode,
    config: DecoderConfig,
}

impl DecoderFSM {
    /// Create new FSM with given configuration
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            state: TimingState::Idle,
            countdown: 0,
            code: PulseCode::SENTINEL,
            config,
        }
    }

    /// Get current FSM state
    pub fn current_state(&self) -> TimingState {
        self.state
    }

    /// Ticks left before the current countdown expires
    pub fn countdown(&self) -> u16 {
        self.countdown
    }

    /// Symbol accumulated so far
    pub fn pending_code(&self) -> PulseCode {
        self.code
    }

    /// Run one timer tick: sample the key, advance the FSM, drive the tone
    /// and push a finished code into the queue.
    ///
    /// A key that cannot be read counts as released for this tick; tone
    /// driver failures are ignored.
    pub fn on_tick<K, T, const N: usize>(
        &mut self,
        key: &mut K,
        tone: &mut T,
        queue: &mut PulseProducer<'_, N>,
    ) -> Option<PulseCode>
    where
        K: KeyInput,
        T: ToneOutput,
    {
        let pressed = match key.is_pressed() {
            Ok(pressed) => pressed,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Key read failed, treating as released");
                false
            }
        };

        let output = self.step(pressed);

        let tone_result = match output.tone {
            ToneAction::Unchanged => Ok(()),
            ToneAction::Sound(level) => tone.enable(level),
            ToneAction::Silence => tone.disable(),
        };
        if tone_result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Tone output failed: {:?}", output.tone);
        }

        if let Some(code) = output.emitted {
            queue.push(code);
        }
        output.emitted
    }

    /// Advance the FSM by one tick with the sampled key level.
    ///
    /// Every state except Idle spends the tick's decrement before looking at
    /// the key, so a countdown of `n` expires on the `n`-th tick after it
    /// was armed.
    pub fn step(&mut self, pressed: bool) -> TickOutput {
        match self.state {
            TimingState::Idle => self.handle_idle(pressed),
            TimingState::DotOrDash => self.handle_dot_or_dash(pressed),
            TimingState::DashExtension => self.handle_dash_extension(pressed),
            TimingState::SymbolGap => self.handle_symbol_gap(pressed),
            TimingState::CharacterGap => self.handle_character_gap(pressed),
        }
    }

    /// Handle Idle state transitions
    fn handle_idle(&mut self, pressed: bool) -> TickOutput {
        if pressed {
            self.code = PulseCode::SENTINEL;
            return self.begin_pulse();
        }
        // Post-character grace only runs down, nothing waits on it
        self.countdown = self.countdown.saturating_sub(1);
        TickOutput::NONE
    }

    /// Handle DotOrDash state transitions
    fn handle_dot_or_dash(&mut self, pressed: bool) -> TickOutput {
        self.tick_down();
        if !pressed {
            self.code.push(Element::Dot);
            #[cfg(feature = "defmt")]
            defmt::debug!("Dot, code {=u8:#x}", self.code.raw());
            return self.end_pulse();
        }

        if self.countdown == 0 {
            self.code.push(Element::Dash);
            #[cfg(feature = "defmt")]
            defmt::debug!("Dash, code {=u8:#x}", self.code.raw());
            self.countdown = self.config.dash_hold_ticks;
            self.transition(TimingState::DashExtension);
            return TickOutput::tone(ToneAction::Sound(ToneLevel::Dash));
        }
        TickOutput::NONE
    }

    /// Handle DashExtension state transitions
    fn handle_dash_extension(&mut self, pressed: bool) -> TickOutput {
        self.tick_down();
        if !pressed {
            return self.end_pulse();
        }

        if self.countdown == 0 {
            // Held dashes are tracked indefinitely
            self.countdown = self.config.dash_hold_ticks;
        }
        TickOutput::NONE
    }

    /// Handle SymbolGap state transitions
    fn handle_symbol_gap(&mut self, pressed: bool) -> TickOutput {
        self.tick_down();
        if pressed {
            return self.begin_pulse();
        }

        if self.countdown == 0 {
            self.countdown = self.config.char_gap_ticks;
            self.transition(TimingState::CharacterGap);
        }
        TickOutput::NONE
    }

    /// Handle CharacterGap state transitions
    fn handle_character_gap(&mut self, pressed: bool) -> TickOutput {
        self.tick_down();
        if pressed {
            // The finished symbol is committed before the next one starts
            let emitted = self.take_code();
            let mut output = self.begin_pulse();
            output.emitted = emitted;
            return output;
        }

        if self.countdown == 0 {
            let emitted = self.take_code();
            self.countdown = self.config.idle_grace_ticks;
            self.transition(TimingState::Idle);
            return TickOutput {
                tone: ToneAction::Unchanged,
                emitted,
            };
        }
        TickOutput::NONE
    }

    /// Key went down: time a new pulse at the dot level
    fn begin_pulse(&mut self) -> TickOutput {
        self.countdown = self.config.dot_ticks;
        self.transition(TimingState::DotOrDash);
        TickOutput::tone(ToneAction::Sound(ToneLevel::Dot))
    }

    /// Key went up: measure the gap to the next pulse
    fn end_pulse(&mut self) -> TickOutput {
        self.countdown = self.config.symbol_gap_ticks;
        self.transition(TimingState::SymbolGap);
        TickOutput::tone(ToneAction::Silence)
    }

    fn take_code(&mut self) -> Option<PulseCode> {
        let code = core::mem::replace(&mut self.code, PulseCode::SENTINEL);
        if code.is_empty() {
            return None;
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("Symbol complete: {=u8:#x}", code.raw());
        Some(code)
    }

    fn tick_down(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
    }

    fn transition(&mut self, next: TimingState) {
        #[cfg(feature = "defmt")]
        defmt::trace!("FSM {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Reset FSM to initial state, dropping any partial symbol
    pub fn reset(&mut self) {
        self.state = TimingState::Idle;
        self.countdown = 0;
        self.code = PulseCode::SENTINEL;
    }

    /// Get current configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Update configuration; running countdowns keep their current value
    pub fn set_config(&mut self, config: DecoderConfig) {
        self.config = config;
    }
}

/// Async task driving the FSM from an embassy ticker instead of a timer
/// interrupt
#[cfg(feature = "embassy-time")]
pub async fn timing_task<K, T, const N: usize>(
    mut key: K,
    mut tone: T,
    mut queue: PulseProducer<'_, N>,
    config: DecoderConfig,
    tick: embassy_time::Duration,
) where
    K: KeyInput,
    T: ToneOutput,
{
    use embassy_time::Ticker;

    let mut fsm = DecoderFSM::new(config);
    let mut ticker = Ticker::every(tick);

    loop {
        let _emitted = fsm.on_tick(&mut key, &mut tone, &mut queue);

        #[cfg(feature = "defmt")]
        if let Some(code) = _emitted {
            defmt::info!("Decoded {}", crate::decode::decode(code));
        }

        ticker.next().await;
    }
}
