use super::Clock;
use core::cell::Cell;
use critical_section::Mutex;

/// Millisecond counter advanced from a periodic timer interrupt.
///
/// Declare it as a `static`, call [`tick`](TickCounter::tick) from the timer ISR
/// and hand `&TICKS` to the application as its [`Clock`].
///
/// # Example
/// ```rust
/// use sx1272_pingpong::timer::{Clock, TickCounter};
///
/// static TICKS: TickCounter = TickCounter::new();
///
/// // #[interrupt]
/// // fn TIM2() {
/// TICKS.tick(1);
/// // }
///
/// let mut clock = &TICKS;
/// assert_eq!(clock.now_ms(), 1);
/// ```
pub struct TickCounter {
    ms: Mutex<Cell<u32>>,
}

impl TickCounter {
    /// Creates a counter at 0 ms. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            ms: Mutex::new(Cell::new(0)),
        }
    }

    /// Advances the counter by `elapsed_ms`, wrapping on overflow.
    pub fn tick(&self, elapsed_ms: u32) {
        critical_section::with(|cs| {
            let cell = self.ms.borrow(cs);
            cell.set(cell.get().wrapping_add(elapsed_ms));
        });
    }

    /// Current counter value.
    pub fn read(&self) -> u32 {
        critical_section::with(|cs| self.ms.borrow(cs).get())
    }

    /// Sets the counter back to 0.
    pub fn reset(&self) {
        critical_section::with(|cs| self.ms.borrow(cs).set(0));
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for TickCounter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TickCounter")
            .field("ms", &self.read())
            .finish()
    }
}

impl Clock for &TickCounter {
    fn start(&mut self) {
        self.reset();
    }

    fn now_ms(&mut self) -> u32 {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counter_advances_and_wraps() {
        let counter = TickCounter::new();
        counter.tick(5);
        counter.tick(10);
        assert_eq!(counter.read(), 15);
        counter.tick(u32::MAX);
        assert_eq!(counter.read(), 14);
    }

    #[test]
    fn test_start_resets_clock() {
        let counter = TickCounter::new();
        counter.tick(100);
        let mut clock = &counter;
        clock.start();
        assert_eq!(clock.now_ms(), 0);
        counter.tick(3);
        assert_eq!(clock.now_ms(), 3);
    }
}
