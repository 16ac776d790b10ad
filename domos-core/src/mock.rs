//! Test doubles for the hardware traits

extern crate std;

use core::cell::RefCell;
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use domos_hal::{AnalogOutput, ByteStore, OutputPin, StoreError, UartRx, UartTx};
use embedded_hal::delay::DelayNs;

/// In-memory byte store
pub struct MockStore {
    pub bytes: Vec<u8>,
    pub writes: usize,
    /// Fail with a device error once this many writes have succeeded
    pub fail_after: Option<usize>,
}

impl MockStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: std::vec![0; capacity],
            writes: 0,
            fail_after: None,
        }
    }
}

impl ByteStore for MockStore {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read(&mut self, address: usize) -> Result<u8, StoreError> {
        self.bytes.get(address).copied().ok_or(StoreError::OutOfBounds)
    }

    fn write(&mut self, address: usize, value: u8) -> Result<(), StoreError> {
        if self.fail_after == Some(self.writes) {
            return Err(StoreError::Device);
        }
        let slot = self.bytes.get_mut(address).ok_or(StoreError::OutOfBounds)?;
        *slot = value;
        self.writes += 1;
        Ok(())
    }
}

/// Something the signal bus did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Level(u8),
    Line { index: usize, high: bool },
    Delay(u32),
}

/// Shared, ordered record of bus activity
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub struct MockPin {
    index: usize,
    high: bool,
    log: EventLog,
}

impl MockPin {
    pub fn new(index: usize, log: &EventLog) -> Self {
        Self {
            index,
            high: false,
            log: log.clone(),
        }
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high = true;
        self.log.push(Event::Line {
            index: self.index,
            high: true,
        });
    }

    fn set_low(&mut self) {
        self.high = false;
        self.log.push(Event::Line {
            index: self.index,
            high: false,
        });
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

pub struct MockAnalog {
    level: u8,
    log: EventLog,
}

impl MockAnalog {
    pub fn new(log: &EventLog) -> Self {
        Self {
            level: 0,
            log: log.clone(),
        }
    }
}

impl AnalogOutput for MockAnalog {
    fn set_level(&mut self, level: u8) {
        self.level = level;
        self.log.push(Event::Level(level));
    }

    fn level(&self) -> u8 {
        self.level
    }
}

pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::Delay(ms));
    }
}

/// Serial console with scripted input
#[derive(Default)]
pub struct MockUart {
    pub rx: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, text: &str) {
        self.rx.extend(text.bytes());
    }

    /// Lines written so far, terminators stripped
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.output)
            .split("\r\n")
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn take_lines(&mut self) -> Vec<String> {
        let lines = self.lines();
        self.output.clear();
        lines
    }
}

impl UartTx for MockUart {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.output.extend_from_slice(data);
        Ok(())
    }
}

impl UartRx for MockUart {
    type Error = Infallible;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.rx.pop_front())
    }
}
