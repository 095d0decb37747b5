//! Test utilities for decoder core functionality

#[cfg(feature = "test-utils")]
pub mod key_script {
    //! Key-level scripts in timer ticks

    use crate::decode::encode;
    use crate::types::{DecoderConfig, Element};
    use std::string::String;
    use std::vec::Vec;

    /// One stretch of constant key level
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeySegment {
        pub pressed: bool,
        pub ticks: u32,
    }

    /// Tick counts that land safely inside each timing window of a config
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyTiming {
        /// Pressed samples for a dot
        pub dot: u32,
        /// Pressed samples for a dash
        pub dash: u32,
        /// Released samples between pulses of one symbol
        pub element_gap: u32,
        /// Released samples between characters; the next press lands in
        /// Character-Gap
        pub char_gap: u32,
        /// Released samples after which the last character is committed
        pub settle: u32,
    }

    impl KeyTiming {
        pub fn from_config(config: &DecoderConfig) -> Self {
            let dot_ticks = config.dot_ticks as u32;
            let symbol_gap = config.symbol_gap_ticks as u32;
            Self {
                dot: (dot_ticks / 2).max(1),
                dash: dot_ticks + dot_ticks / 2 + 1,
                element_gap: (symbol_gap / 2).max(1),
                char_gap: symbol_gap + (config.char_gap_ticks as u32 / 2).max(1) + 1,
                settle: config.char_commit_ticks() + 1,
            }
        }
    }

    /// Key pattern to replay against the FSM
    #[derive(Debug, Clone, Default)]
    pub struct KeyScript {
        pub segments: Vec<KeySegment>,
        pub description: String,
    }

    impl KeyScript {
        pub fn new(description: &str) -> Self {
            Self {
                segments: Vec::new(),
                description: String::from(description),
            }
        }

        /// Hold the key down for `ticks` samples
        pub fn press(mut self, ticks: u32) -> Self {
            self.push(true, ticks);
            self
        }

        /// Leave the key up for `ticks` samples
        pub fn release(mut self, ticks: u32) -> Self {
            self.push(false, ticks);
            self
        }

        /// Key one element of the given timing
        pub fn element(self, element: Element, timing: &KeyTiming) -> Self {
            match element {
                Element::Dot => self.press(timing.dot),
                Element::Dash => self.press(timing.dash),
            }
        }

        /// Key a dot/dash pattern such as `"-.-."` with element gaps
        pub fn pattern(mut self, pattern: &str, timing: &KeyTiming) -> Self {
            let mut first = true;
            for ch in pattern.chars() {
                let element = match ch {
                    '.' => Element::Dot,
                    '-' => Element::Dash,
                    _ => continue,
                };
                if !first {
                    self = self.release(timing.element_gap);
                }
                self = self.element(element, timing);
                first = false;
            }
            self
        }

        /// Key `text` letter by letter, ending with enough silence for the
        /// last character to be committed.
        ///
        /// Spaces become a full settle gap. Returns the first character
        /// the table cannot key.
        pub fn from_text(text: &str, config: &DecoderConfig) -> Result<Self, char> {
            let timing = KeyTiming::from_config(config);
            let mut script = Self::new(text);
            let mut pending_gap = false;

            for ch in text.chars() {
                if ch == ' ' {
                    if pending_gap {
                        script = script.release(timing.settle);
                        pending_gap = false;
                    }
                    continue;
                }
                let code = encode(ch).ok_or(ch)?;
                if pending_gap {
                    script = script.release(timing.char_gap);
                }
                for element in code.elements() {
                    if script.ends_pressed() {
                        script = script.release(timing.element_gap);
                    }
                    script = script.element(element, &timing);
                }
                pending_gap = true;
            }

            if pending_gap {
                script = script.release(timing.settle);
            }
            Ok(script)
        }

        /// Total samples in the script
        pub fn total_ticks(&self) -> u64 {
            self.segments.iter().map(|s| s.ticks as u64).sum()
        }

        /// Key level at every tick, in order
        pub fn levels(&self) -> impl Iterator<Item = bool> + '_ {
            self.segments
                .iter()
                .flat_map(|s| core::iter::repeat(s.pressed).take(s.ticks as usize))
        }

        fn ends_pressed(&self) -> bool {
            self.segments.last().map(|s| s.pressed).unwrap_or(false)
        }

        fn push(&mut self, pressed: bool, ticks: u32) {
            if ticks == 0 {
                return;
            }
            match self.segments.last_mut() {
                Some(last) if last.pressed == pressed => last.ticks += ticks,
                _ => self.segments.push(KeySegment { pressed, ticks }),
            }
        }
    }
}

#[cfg(feature = "test-utils")]
pub mod simulation {
    //! Whole-pipeline replay with mock hardware

    use super::key_script::KeyScript;
    use crate::fsm::DecoderFSM;
    use crate::hal::mock::{MockDisplay, MockKey, ToneEvent, MockTone};
    use crate::render::Renderer;
    use crate::ring::PulseBuffer;
    use crate::types::{DecoderConfig, PulseCode};
    use std::string::String;
    use std::vec::Vec;

    /// What a replay produced
    #[derive(Debug, Clone, Default)]
    pub struct Transcript {
        /// Codes pushed by the FSM, in order
        pub codes: Vec<PulseCode>,
        /// Characters the renderer wrote, in order
        pub text: String,
        /// Screen contents at the end, one entry per row
        pub screen: Vec<String>,
        /// Number of display clears
        pub clears: usize,
        /// Tone changes (first 64)
        pub tone_events: Vec<ToneEvent>,
        /// Ticks executed
        pub ticks: u64,
    }

    /// Replays a [`KeyScript`] tick by tick through FSM, ring and renderer
    pub struct Simulation {
        config: DecoderConfig,
        poll_every: u32,
    }

    impl Simulation {
        pub fn new(config: DecoderConfig) -> Self {
            Self {
                config,
                poll_every: 1,
            }
        }

        /// Let the renderer run only once every `ticks` timer ticks
        pub fn poll_every(mut self, ticks: u32) -> Self {
            self.poll_every = ticks.max(1);
            self
        }

        pub fn run(&self, script: &KeyScript) -> Transcript {
            let mut ring = PulseBuffer::new();
            let (mut producer, mut consumer) = ring.split();
            let mut fsm = DecoderFSM::new(self.config);
            let key = MockKey::new();
            let mut key_ref = &key;
            let mut tone = MockTone::new();
            let mut renderer = Renderer::new(MockDisplay::new());
            renderer.start();

            let mut transcript = Transcript::default();
            for pressed in script.levels() {
                key.set_pressed(pressed);
                if let Some(code) = fsm.on_tick(&mut key_ref, &mut tone, &mut producer) {
                    transcript.codes.push(code);
                }
                transcript.ticks += 1;

                if transcript.ticks % self.poll_every as u64 == 0 {
                    if let Some(ch) = renderer.poll(&mut consumer) {
                        transcript.text.push(ch);
                    }
                }
            }

            // Main loop catches up once the key falls silent
            while let Some(ch) = renderer.poll(&mut consumer) {
                transcript.text.push(ch);
            }

            let display = renderer.display();
            for y in 0..MockDisplay::ROWS {
                transcript.screen.push(String::from(display.row(y).as_str()));
            }
            transcript.clears = display.clears();
            transcript.tone_events = tone.events().to_vec();
            transcript
        }
    }

    /// Replay with the default renderer cadence
    pub fn simulate(config: DecoderConfig, script: &KeyScript) -> Transcript {
        Simulation::new(config).run(script)
    }
}
