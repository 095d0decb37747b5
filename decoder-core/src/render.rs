//! Rendering consumer: moves decoded characters from the ring to the display

use crate::decode::decode;
use crate::hal::CharacterDisplay;
use crate::ring::PulseConsumer;
use crate::types::DisplayOptions;

/// Main-loop side of the pipeline.
///
/// Never blocks: [`Renderer::poll`] handles at most one code and returns
/// straight away when the ring is empty.
pub struct Renderer<D> {
    display: D,
    options: DisplayOptions,
    rendered: usize,
}

impl<D> Renderer<D>
where
    D: CharacterDisplay,
{
    /// Wrap a display with the default options (display on, cursor off)
    pub fn new(display: D) -> Self {
        Self::with_options(display, DisplayOptions::default())
    }

    pub fn with_options(display: D, options: DisplayOptions) -> Self {
        Self {
            display,
            options,
            rendered: 0,
        }
    }

    /// Initialize the display and home the cursor
    pub fn start(&mut self) {
        if self.display.init(self.options).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Display init failed");
        }
        self.display.move_cursor(0, 0).ok();
        #[cfg(feature = "defmt")]
        defmt::info!("Display ready");
    }

    /// Render the next pending code, if any, and return its character.
    ///
    /// The screen is cleared whenever the producer's cursor sits on a
    /// multiple of the ring capacity at the moment of the pop, i.e. once
    /// per full buffer cycle. The check reads the producer cursor, not the
    /// index of the code just popped.
    pub fn poll<const N: usize>(&mut self, queue: &mut PulseConsumer<'_, N>) -> Option<char> {
        let code = queue.try_pop()?;

        if (queue.write_cursor() & (N - 1)) == 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!("Buffer cycle complete, clearing display");
            self.display.clear().ok();
            self.display.move_cursor(0, 0).ok();
        }

        let ch = decode(code);
        if self.display.write_char(ch).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Display write failed for {}", ch);
        }
        self.rendered = self.rendered.wrapping_add(1);
        Some(ch)
    }

    /// Render everything currently waiting, returning how many characters
    /// were written
    pub fn drain<const N: usize>(&mut self, queue: &mut PulseConsumer<'_, N>) -> usize {
        let mut count = 0;
        while self.poll(queue).is_some() {
            count += 1;
        }
        count
    }

    /// Characters rendered since start-up
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Give back the display
    pub fn release(self) -> D {
        self.display
    }
}

/// Async task polling the ring and rendering to the display.
///
/// Yields for `idle` whenever the ring is empty so lower-priority tasks can
/// run between ticks.
#[cfg(feature = "embassy-time")]
pub async fn render_task<D, const N: usize>(
    display: D,
    mut queue: PulseConsumer<'_, N>,
    idle: embassy_time::Duration,
) where
    D: CharacterDisplay,
{
    use embassy_time::Timer;

    let mut renderer = Renderer::new(display);
    renderer.start();

    loop {
        if renderer.poll(&mut queue).is_none() {
            Timer::after(idle).await;
        }
    }
}
