//! Mock collaborators for device tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use mockall::mock;
use stm32sim_core::signal::InputPin;
use stm32sim_core::soc::devices::Device;
use stm32sim_core::soc::entropy::EntropySource;

mock! {
    pub Entropy {}
    impl EntropySource for Entropy {
        fn fill(&mut self, buf: &mut [u8]);
    }
}

/// Entropy source whose n-th draw fills every byte with `n` (starting at 1).
#[derive(Debug, Default)]
pub struct CountingEntropy {
    draws: u8,
}

impl EntropySource for CountingEntropy {
    fn fill(&mut self, buf: &mut [u8]) {
        self.draws = self.draws.wrapping_add(1);
        buf.fill(self.draws);
    }
}

/// A plain RAM-like device that counts how often it is accessed.
#[derive(Debug)]
pub struct ScratchDevice {
    name: &'static str,
    base: u64,
    data: Vec<u8>,
    /// Accesses seen so far, shared with the test.
    pub accesses: Arc<AtomicU64>,
    ticks_until_reset: Option<u32>,
}

impl ScratchDevice {
    /// Creates a zeroed device of `size` bytes at `base`.
    pub fn new(name: &'static str, base: u64, size: usize) -> Self {
        Self {
            name,
            base,
            data: vec![0; size],
            accesses: Arc::new(AtomicU64::new(0)),
            ticks_until_reset: None,
        }
    }

    /// Makes the device request a reset on its `ticks`-th tick.
    pub fn reset_after(mut self, ticks: u32) -> Self {
        self.ticks_until_reset = Some(ticks);
        self
    }

    fn touch(&self) {
        let _ = self.accesses.fetch_add(1, Ordering::Relaxed);
    }
}

impl Device for ScratchDevice {
    fn name(&self) -> &str {
        self.name
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base, self.data.len() as u64)
    }

    fn read_u8(&mut self, offset: u64) -> u8 {
        self.touch();
        self.data[offset as usize]
    }

    fn read_u16(&mut self, offset: u64) -> u16 {
        self.touch();
        let o = offset as usize;
        u16::from_le_bytes([self.data[o], self.data[o + 1]])
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        self.touch();
        let o = offset as usize;
        u32::from_le_bytes(self.data[o..o + 4].try_into().unwrap())
    }

    fn read_u64(&mut self, offset: u64) -> u64 {
        self.touch();
        let o = offset as usize;
        u64::from_le_bytes(self.data[o..o + 8].try_into().unwrap())
    }

    fn write_u8(&mut self, offset: u64, val: u8) {
        self.touch();
        self.data[offset as usize] = val;
    }

    fn write_u16(&mut self, offset: u64, val: u16) {
        self.touch();
        let o = offset as usize;
        self.data[o..o + 2].copy_from_slice(&val.to_le_bytes());
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        self.touch();
        let o = offset as usize;
        self.data[o..o + 4].copy_from_slice(&val.to_le_bytes());
    }

    fn write_u64(&mut self, offset: u64, val: u64) {
        self.touch();
        let o = offset as usize;
        self.data[o..o + 8].copy_from_slice(&val.to_le_bytes());
    }

    fn tick(&mut self) -> bool {
        match &mut self.ticks_until_reset {
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                *n == 0
            }
            None => false,
        }
    }
}

/// Records every level delivered to an input, tagged with a label.
#[derive(Debug, Clone, Default)]
pub struct LevelRecorder {
    events: Arc<Mutex<Vec<(usize, bool)>>>,
}

impl LevelRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// An input that records `(label, level)` on every delivery.
    pub fn input(&self, label: usize) -> InputPin {
        let events = Arc::clone(&self.events);
        InputPin::new(move |level| events.lock().unwrap().push((label, level)))
    }

    /// Every `(label, level)` recorded so far, in delivery order.
    pub fn events(&self) -> Vec<(usize, bool)> {
        self.events.lock().unwrap().clone()
    }

    /// Most recent level seen with `label`.
    pub fn last(&self, label: usize) -> Option<bool> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(l, _)| *l == label)
            .map(|&(_, level)| level)
    }
}
