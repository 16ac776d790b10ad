//! Registry session
//!
//! Owns everything one module needs at runtime: the registry, the signal
//! bus, the delay source, the partially received line and the latched
//! error. [`RegistrySession::work`] is called from the main loop; each call
//! does at most one of:
//!
//! - report the error left by the previous command
//! - consume received bytes and, once a line is complete, execute it
//!
//! Errors never stop the session. Only `exit` does.

use domos_hal::{AnalogOutput, ByteStore, OutputPin, UartRx, UartTx};
use domos_protocol::{Command, DriveLevel, ErrorKind, LineBuffer, ParseError, Reply, Tokenizer};
use embedded_hal::delay::DelayNs;

use crate::address::encode;
use crate::bus::SignalBus;
use crate::error::{BootError, RegistryError};
use crate::record::PeripheralRecord;
use crate::registry::Registry;

/// Serial link failure while serving the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<R, T> {
    Rx(R),
    Tx(T),
}

/// Command failure, or a reply that could not be sent
enum Fault<E> {
    Command(ErrorKind),
    Link(E),
}

impl<E> From<ErrorKind> for Fault<E> {
    fn from(kind: ErrorKind) -> Self {
        Fault::Command(kind)
    }
}

impl<E> From<RegistryError> for Fault<E> {
    fn from(e: RegistryError) -> Self {
        Fault::Command(e.into())
    }
}

impl<E> From<ParseError> for Fault<E> {
    fn from(e: ParseError) -> Self {
        Fault::Command(e.into())
    }
}

/// What a call to [`RegistrySession::work`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// Session is off
    Off,
    /// No complete line yet
    Idle,
    /// Pending error reported
    ReportedError(ErrorKind),
    /// A line was executed; any error is latched for the next call
    Executed,
}

/// One registry, one serial channel, one command at a time
pub struct RegistrySession<S, P, A, D> {
    registry: Registry<S>,
    bus: SignalBus<P, A>,
    delay: D,
    line: LineBuffer,
    last_error: Option<ErrorKind>,
    on: bool,
}

impl<S, P, A, D> RegistrySession<S, P, A, D>
where
    S: ByteStore,
    P: OutputPin,
    A: AnalogOutput,
    D: DelayNs,
{
    /// Start a session
    ///
    /// The bus must have exactly as many address lines as the configuration.
    pub fn new(registry: Registry<S>, bus: SignalBus<P, A>, delay: D) -> Result<Self, BootError> {
        let expected = registry.config().address_pin_count;
        let actual = bus.line_count();
        if expected != actual {
            return Err(BootError::BusMismatch { expected, actual });
        }

        Ok(Self {
            registry,
            bus,
            delay,
            line: LineBuffer::new(),
            last_error: None,
            on: true,
        })
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<S> {
        &mut self.registry
    }

    pub fn bus(&self) -> &SignalBus<P, A> {
        &self.bus
    }

    /// False once `exit` was executed
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Error waiting to be reported
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// Send the welcome banner
    pub fn announce<T: UartTx>(&mut self, tx: &mut T) -> Result<(), T::Error> {
        let result = send(tx, Reply::Welcome);
        self.settle(result)
    }

    /// Serve the channel once
    ///
    /// A pending error is reported and the call returns without reading
    /// input. Otherwise received bytes are consumed until a line completes
    /// or nothing is left.
    pub fn work<R, T>(
        &mut self,
        rx: &mut R,
        tx: &mut T,
    ) -> Result<Activity, LinkError<R::Error, T::Error>>
    where
        R: UartRx,
        T: UartTx,
    {
        if !self.on {
            return Ok(Activity::Off);
        }

        if let Some(kind) = self.last_error.take() {
            let result = send(tx, Reply::Error(kind));
            self.settle(result).map_err(LinkError::Tx)?;
            return Ok(Activity::ReportedError(kind));
        }

        while let Some(byte) = rx.try_read_byte().map_err(LinkError::Rx)? {
            match self.line.feed(byte) {
                Ok(None) => {}
                Ok(Some(line)) => {
                    self.execute(&line, tx).map_err(LinkError::Tx)?;
                    return Ok(Activity::Executed);
                }
                Err(e) => {
                    self.last_error = Some(e.into());
                    return Ok(Activity::Executed);
                }
            }
        }

        Ok(Activity::Idle)
    }

    /// Parse and execute one command line
    ///
    /// A command failure is latched, not returned; only a failed reply
    /// write is an error here.
    pub fn execute<T: UartTx>(&mut self, line: &str, tx: &mut T) -> Result<(), T::Error> {
        let result = self.dispatch(line, tx);
        self.settle(result)
    }

    /// Latch a command failure, pass a link failure on
    fn settle<E>(&mut self, result: Result<(), Fault<E>>) -> Result<(), E> {
        match result {
            Ok(()) => Ok(()),
            Err(Fault::Command(kind)) => {
                self.last_error = Some(kind);
                Ok(())
            }
            Err(Fault::Link(e)) => Err(e),
        }
    }

    fn dispatch<T: UartTx>(&mut self, line: &str, tx: &mut T) -> Result<(), Fault<T::Error>> {
        let pin_count = self.registry.config().address_pin_count;

        let command = match Command::parse(line, pin_count) {
            Ok(command) => command,
            // A full registry refuses `create` before its arguments are read;
            // only faults of the line as a whole come first
            Err(e)
                if !matches!(e, ParseError::LineTooLong | ParseError::InvalidCharacter)
                    && is_create(line)
                    && self.registry.is_full() =>
            {
                return Err(RegistryError::Full.into())
            }
            Err(e) => return Err(e.into()),
        };

        match command {
            Command::Create { name, number } => {
                let record = self.registry.create(name, number)?;
                send_record(tx, &record, true)
            }
            Command::Turn { name, level } => self.turn(&name, &level),
            Command::Delete { name } => {
                self.registry.delete(&name)?;
                send(tx, Reply::Deleted)
            }
            Command::List => {
                for record in self.registry.list()? {
                    send_record(tx, &record?, false)?;
                }
                Ok(())
            }
            Command::Reset => {
                self.registry
                    .layout_mut()
                    .clear_provisioning()
                    .map_err(RegistryError::from)?;
                send(tx, Reply::ResetComplete)
            }
            Command::Exit => {
                self.on = false;
                send(tx, Reply::Goodbye)
            }
        }
    }

    fn turn<E>(&mut self, name: &str, level: &str) -> Result<(), Fault<E>> {
        let index = self
            .registry
            .find_by_name(name)?
            .ok_or(RegistryError::NotFound)?;
        let level = DriveLevel::from_token(level)?;
        let record = self.registry.record(index)?;

        // Numbers are range-checked when created
        let bits = encode(record.number as u16, self.bus.line_count())
            .map_err(|_| ErrorKind::BadThingsHappen)?;
        self.bus.activate(&bits, level, &mut self.delay);
        Ok(())
    }
}

/// Whether the first word of `line` is the `create` keyword
fn is_create(line: &str) -> bool {
    matches!(
        Tokenizer::new(line).next_token(),
        Ok(Some(keyword)) if keyword.eq_ignore_ascii_case("create")
    )
}

/// Render and write one reply; a reply that does not fit is latched as an
/// internal error
fn send<T: UartTx>(tx: &mut T, reply: Reply<'_>) -> Result<(), Fault<T::Error>> {
    let line = reply.render().map_err(|_| ErrorKind::BadThingsHappen)?;
    tx.write_line(&line).map_err(Fault::Link)
}

fn send_record<T: UartTx>(
    tx: &mut T,
    record: &PeripheralRecord,
    created: bool,
) -> Result<(), Fault<T::Error>> {
    let reply = if created {
        Reply::Created {
            name: &record.name,
            number: record.number,
        }
    } else {
        Reply::Listed {
            name: &record.name,
            number: record.number,
        }
    };
    send(tx, reply)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::bus::{AddressLines, ADDRESS_PROPAGATION_MS, OUTPUT_SETTLE_MS};
    use crate::config::ProvisioningRequest;
    use crate::mock::{Event, EventLog, MockAnalog, MockDelay, MockPin, MockStore, MockUart};
    use std::string::String;
    use std::vec::Vec;

    type TestSession = RegistrySession<MockStore, MockPin, MockAnalog, MockDelay>;

    /// Transmitter whose every write fails
    struct BrokenTx;

    impl UartTx for BrokenTx {
        type Error = ();

        fn write_blocking(&mut self, _data: &[u8]) -> Result<(), ()> {
            Err(())
        }
    }

    fn session(pins: &[u8], log: &EventLog) -> TestSession {
        let (registry, _) =
            Registry::open(MockStore::new(1024), &ProvisioningRequest::new(pins)).unwrap();
        let mut lines = AddressLines::new();
        for index in 0..pins.len() {
            let _ = lines.push(MockPin::new(index, log));
        }
        let bus = SignalBus::new(lines, MockAnalog::new(log));
        RegistrySession::new(registry, bus, MockDelay::new(log)).unwrap()
    }

    /// Send one line and run the loop until it is executed and any error reported
    fn run(session: &mut TestSession, uart: &mut MockUart, line: &str) -> Vec<String> {
        let mut link = MockUart::new();
        link.send(line);
        link.send("\n");
        while !link.rx.is_empty() || session.last_error().is_some() {
            let _ = session.work(&mut link, uart);
        }
        uart.take_lines()
    }

    #[test]
    fn test_bus_mismatch() {
        let log = EventLog::default();
        let (registry, _) =
            Registry::open(MockStore::new(256), &ProvisioningRequest::new(&[2, 3, 4])).unwrap();
        let mut lines = AddressLines::new();
        let _ = lines.push(MockPin::new(0, &log));
        let bus = SignalBus::new(lines, MockAnalog::new(&log));

        let result = RegistrySession::new(registry, bus, MockDelay::new(&log));
        assert!(matches!(
            result,
            Err(BootError::BusMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_announce() {
        let log = EventLog::default();
        let mut session = session(&[2, 3, 4], &log);
        let mut uart = MockUart::new();
        session.announce(&mut uart).unwrap();
        assert_eq!(uart.lines(), std::vec!["Welcome to DomoS"]);
    }

    #[test]
    fn test_scenario() {
        let log = EventLog::default();
        let mut session = session(&[2, 3, 4], &log);
        let mut uart = MockUart::new();

        assert_eq!(
            run(&mut session, &mut uart, "create as 5"),
            std::vec!["Peripheral 5 with number 5 (addressing 101) created successfully!"]
        );
        assert_eq!(
            run(&mut session, &mut uart, "create name lamp as b101"),
            std::vec!["error 17: The number is already in use."]
        );
        assert_eq!(session.registry().count(), 1);
        assert_eq!(
            run(&mut session, &mut uart, "create name lamp as 3"),
            std::vec!["Peripheral lamp with number 3 (addressing 11) created successfully!"]
        );
        assert_eq!(
            run(&mut session, &mut uart, "delete 5"),
            std::vec!["Peripheral deleted successfully"]
        );
        assert_eq!(
            run(&mut session, &mut uart, "list"),
            std::vec!["Peripheral lamp with number 3 (addressing 11)"]
        );

        log.clear();
        assert!(run(&mut session, &mut uart, "turn lamp h").is_empty());
        let events = log.events();
        assert_eq!(events[0], Event::Level(255));
        assert_eq!(events[1], Event::Delay(OUTPUT_SETTLE_MS));
        assert_eq!(
            &events[2..5],
            &[
                Event::Line {
                    index: 0,
                    high: false
                },
                Event::Line {
                    index: 1,
                    high: true
                },
                Event::Line {
                    index: 2,
                    high: true
                },
            ]
        );
        assert_eq!(events[5], Event::Delay(ADDRESS_PROPAGATION_MS));
        assert_eq!(events[6], Event::Level(0));
    }

    #[test]
    fn test_error_reported_on_next_call() {
        let log = EventLog::default();
        let mut session = session(&[2, 3, 4], &log);
        let mut uart = MockUart::new();

        let mut link = MockUart::new();
        link.send("list\ncreate\n");

        // First call executes `list` and latches the error
        assert_eq!(session.work(&mut link, &mut uart), Ok(Activity::Executed));
        assert_eq!(
            session.last_error(),
            Some(ErrorKind::ThereAreZeroPeripheral)
        );
        assert!(uart.lines().is_empty());

        // Second call only reports, `create` stays unread
        assert_eq!(
            session.work(&mut link, &mut uart),
            Ok(Activity::ReportedError(ErrorKind::ThereAreZeroPeripheral))
        );
        assert_eq!(
            uart.take_lines(),
            std::vec!["error 23: There are no peripherals to show."]
        );
        assert_eq!(link.rx.len(), 7);
        assert_eq!(session.registry().count(), 0);

        assert_eq!(session.work(&mut link, &mut uart), Ok(Activity::Executed));
        assert_eq!(session.registry().count(), 1);
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_idle_without_input() {
        let log = EventLog::default();
        let mut session = session(&[2, 3], &log);
        let mut uart = MockUart::new();
        let mut link = MockUart::new();
        link.send("cre");
        assert_eq!(session.work(&mut link, &mut uart), Ok(Activity::Idle));
        assert_eq!(session.work(&mut link, &mut uart), Ok(Activity::Idle));
    }

    #[test]
    fn test_parse_errors() {
        let log = EventLog::default();
        let mut session = session(&[2, 3, 4], &log);
        let mut uart = MockUart::new();

        let cases = [
            ("launch", 3),
            ("   ", 4),
            ("create color red", 5),
            ("create name", 6),
            ("create name abcdefghij", 7),
            ("create as", 8),
            ("create as b1111", 9),
            ("create as 0", 14),
            ("create as 8", 22),
            ("create as x1", 24),
            ("delete ghost", 11),
            ("list", 23),
            ("create abcdefghijklmnop", 2),
        ];
        for (line, code) in cases {
            let replies = run(&mut session, &mut uart, line);
            assert_eq!(replies.len(), 1, "{}", line);
            let expected = std::format!("error {}:", code);
            assert!(replies[0].starts_with(&expected), "{} -> {}", line, replies[0]);
        }
        assert_eq!(session.registry().count(), 0);
    }

    #[test]
    fn test_line_too_long() {
        let log = EventLog::default();
        let mut session = session(&[2, 3], &log);
        let mut uart = MockUart::new();
        let long = "a ".repeat(40);
        assert_eq!(
            run(&mut session, &mut uart, &long),
            std::vec!["error 1: The command line exceeds 63 characters."]
        );
    }

    #[test]
    fn test_turn_errors() {
        let log = EventLog::default();
        let mut session = session(&[2, 3, 4], &log);
        let mut uart = MockUart::new();
        run(&mut session, &mut uart, "create name lamp");

        // Lookup fails before the level is looked at
        assert!(run(&mut session, &mut uart, "turn ghost x")[0].starts_with("error 11:"));
        assert!(run(&mut session, &mut uart, "turn lamp x")[0].starts_with("error 12:"));
        assert!(run(&mut session, &mut uart, "turn lamp v6")[0].starts_with("error 21:"));
        assert!(run(&mut session, &mut uart, "turn lamp v-1")[0].starts_with("error 20:"));
        assert!(run(&mut session, &mut uart, "turn lamp %101")[0].starts_with("error 26:"));

        log.clear();
        assert!(run(&mut session, &mut uart, "turn lamp %50").is_empty());
        assert_eq!(log.events()[0], Event::Level(127));
    }

    #[test]
    fn test_reset_and_exit() {
        let log = EventLog::default();
        let mut session = session(&[2, 3], &log);
        let mut uart = MockUart::new();

        assert_eq!(
            run(&mut session, &mut uart, "reset"),
            std::vec!["Resetting complete, now reset your module"]
        );
        assert_eq!(&session.registry().layout().store().bytes[..2], &[0, 0]);
        // Still serving until restarted
        assert!(session.is_on());

        assert_eq!(
            run(&mut session, &mut uart, "EXIT"),
            std::vec!["Bye bye from me and my creator ;)"]
        );
        assert!(!session.is_on());

        let mut link = MockUart::new();
        link.send("list\n");
        assert_eq!(session.work(&mut link, &mut uart), Ok(Activity::Off));
        assert_eq!(link.rx.len(), 5);
    }

    #[test]
    fn test_full_registry_refuses_create_before_arguments() {
        let log = EventLog::default();
        let mut session = session(&[2], &log);
        let mut uart = MockUart::new();
        run(&mut session, &mut uart, "create name lamp");
        assert!(session.registry().is_full());

        for line in [
            "create",
            "create as 5",
            "create name abcdefghijk",
            "create as b11",
            "create bogus",
            "CREATE name lamp",
        ] {
            assert_eq!(
                run(&mut session, &mut uart, line),
                std::vec!["error 15: The maximum number of peripherals was reached."],
                "{}",
                line
            );
        }

        // Other commands still report their own errors
        assert!(run(&mut session, &mut uart, "delete")[0].starts_with("error 6:"));
        assert_eq!(session.registry().count(), 1);
    }

    #[test]
    fn test_exit_stops_even_if_farewell_fails() {
        let log = EventLog::default();
        let mut session = session(&[2, 3], &log);

        assert_eq!(session.execute("exit", &mut BrokenTx), Err(()));
        assert!(!session.is_on());
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_link_failure_is_not_latched() {
        let log = EventLog::default();
        let mut session = session(&[2, 3], &log);

        assert_eq!(session.announce(&mut BrokenTx), Err(()));
        assert_eq!(session.execute("reset", &mut BrokenTx), Err(()));
        assert_eq!(session.last_error(), None);
        assert!(session.is_on());
    }

    #[test]
    fn test_oversized_reply_is_latched_not_sent() {
        let log = EventLog::default();
        let mut session = session(&[2, 3], &log);
        let mut uart = MockUart::new();
        let long = [b'n'; domos_protocol::MAX_REPLY_LEN];
        let name = core::str::from_utf8(&long).unwrap();

        let result = send(&mut uart, Reply::Listed { name, number: 1 });
        assert!(session.settle(result).is_ok());
        assert_eq!(session.last_error(), Some(ErrorKind::BadThingsHappen));
        assert!(uart.take_lines().is_empty());

        // The latched error is reported in place of the lost reply
        let mut link = MockUart::new();
        assert_eq!(
            session.work(&mut link, &mut uart),
            Ok(Activity::ReportedError(ErrorKind::BadThingsHappen))
        );
        let lines = uart.take_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("error "));
        assert_eq!(session.last_error(), None);
    }
}
