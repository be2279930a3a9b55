//! Interactive menu loop over any line-oriented input and output.

use crate::config::Config;
use crate::menu::{parse_class, parse_count, parse_name, InputError, MenuChoice, MENU};
use box_office_core::{AllocationEngine, CancelOutcome, Registration};
use std::io::{self, BufRead, Write};

/// Whether the loop should keep reading commands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One terminal session driving an [`AllocationEngine`].
///
/// Engine errors are printed and the menu is shown again; only I/O errors
/// on the terminal itself end the session early. End of input is treated
/// like choosing Exit.
pub struct Session<R, W> {
    engine: AllocationEngine,
    max_per_request: u32,
    position_offset: usize,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Create a session reading answers from `input` and writing to `output`
    pub fn new(engine: AllocationEngine, config: &Config, input: R, output: W) -> Self {
        Self {
            engine,
            max_per_request: config.tickets.max_per_request,
            position_offset: config.display.position_offset,
            input,
            output,
        }
    }

    /// Run the menu until Exit or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written.
    pub fn run(&mut self) -> io::Result<()> {
        tracing::info!("Session started");

        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(answer) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let choice = match answer.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    continue;
                }
            };
            tracing::debug!(%choice, "Menu selection");

            let flow = match choice {
                MenuChoice::Register => self.register()?,
                MenuChoice::CheckAvailability => self.check_availability()?,
                MenuChoice::Process => self.process()?,
                MenuChoice::Cancel => self.cancel()?,
                MenuChoice::ViewSummary => self.view_summary()?,
                MenuChoice::Exit => {
                    writeln!(self.output, "Goodbye.")?;
                    Flow::Quit
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }

        tracing::info!("Session ended");
        Ok(())
    }

    /// The engine behind this session
    #[must_use]
    pub const fn engine(&self) -> &AllocationEngine {
        &self.engine
    }

    /// Consume the session, returning its output
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    // ========== Menu actions ==========

    fn register(&mut self) -> io::Result<Flow> {
        let Some(name) = self.ask("Enter name: ", parse_name)? else {
            return Ok(Flow::Quit);
        };
        let Some(label) = self.prompt("Ticket type (V for VIP, R for Regular): ")? else {
            return Ok(Flow::Quit);
        };
        let max = self.max_per_request;
        let Some(count) = self.ask("Number of tickets: ", |s| parse_count(s, max))? else {
            return Ok(Flow::Quit);
        };

        match self.engine.register_labeled(&name, &label, count) {
            Ok(registration) => self.print_registration(&registration)?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn check_availability(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "{}", self.engine.availability())?;
        Ok(Flow::Continue)
    }

    fn process(&mut self) -> io::Result<Flow> {
        match self.engine.process_tickets() {
            Ok(confirmed) if confirmed.is_empty() => {
                writeln!(self.output, "No tickets to process.")?;
            }
            Ok(confirmed) => {
                writeln!(self.output, "Confirmed tickets:")?;
                for allocation in &confirmed {
                    writeln!(self.output, "  {allocation}")?;
                }
            }
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn cancel(&mut self) -> io::Result<Flow> {
        let Some(name) = self.ask("Enter name: ", parse_name)? else {
            return Ok(Flow::Quit);
        };
        let Some(class) = self.ask("Ticket type (V for VIP, R for Regular): ", parse_class)?
        else {
            return Ok(Flow::Quit);
        };
        let max = self.max_per_request;
        let Some(count) = self.ask("Number of tickets to cancel: ", |s| parse_count(s, max))?
        else {
            return Ok(Flow::Quit);
        };

        match self.engine.cancel(&name, class, count) {
            Ok(CancelOutcome::Cancelled {
                class,
                cancelled,
                requested,
            }) => writeln!(
                self.output,
                "Cancelled {cancelled} of {requested} {class} request(s) for {name}."
            )?,
            Ok(CancelOutcome::NotFound { class }) => {
                writeln!(self.output, "No {class} requests found for {name}.")?;
            }
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn view_summary(&mut self) -> io::Result<Flow> {
        match self.engine.summary() {
            Ok(summary) => writeln!(self.output, "{summary}")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    // ========== Prompting ==========

    fn print_registration(&mut self, registration: &Registration) -> io::Result<()> {
        let positions = registration
            .positions
            .iter()
            .map(|p| p.with_offset(self.position_offset).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            self.output,
            "Registered {} {} ticket(s) for {}. Queue position(s): {positions}",
            registration.positions.len(),
            registration.class,
            registration.name,
        )
    }

    /// Prints `message` and reads one line; `None` at end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prompts until `parse` accepts the answer; `None` at end of input.
    fn ask<T>(
        &mut self,
        message: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> io::Result<Option<T>> {
        loop {
            let Some(answer) = self.prompt(message)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use box_office_core::{AllocationEnvironment, Capacity, TicketClass};
    use box_office_testing::{test_clock, InMemoryTransactionLog};
    use std::sync::Arc;

    fn run(input: &str) -> (String, AllocationEngine) {
        let (output, engine, _log) = run_with_limit(input, 10);
        (output, engine)
    }

    fn run_with_limit(
        input: &str,
        max_per_request: u32,
    ) -> (String, AllocationEngine, InMemoryTransactionLog) {
        let log = InMemoryTransactionLog::new();
        let env = AllocationEnvironment::new(Arc::new(test_clock()), Arc::new(log.clone()));
        let max = max_per_request.to_string();
        let config = Config::from_lookup(|key| match key {
            "BOX_OFFICE_PRIORITY_CAPACITY" | "BOX_OFFICE_STANDARD_CAPACITY" => {
                Some("2".to_string())
            }
            "BOX_OFFICE_MAX_TICKETS_PER_REQUEST" => Some(max.clone()),
            _ => None,
        });
        let engine = AllocationEngine::new(config.initial_capacity(), env).unwrap();

        let mut session = Session::new(engine, &config, input.as_bytes(), Vec::new());
        session.run().unwrap();
        let Session { engine, output, .. } = session;
        (String::from_utf8(output).unwrap(), engine, log)
    }

    #[test]
    fn registration_shows_offset_positions() {
        let (output, engine) = run("1\nAlice\nV\n2\n6\n");

        assert!(output.contains("Registered 2 VIP ticket(s) for Alice. Queue position(s): 1001, 1002"));
        assert_eq!(engine.queue(TicketClass::Priority).len(), 2);
    }

    #[test]
    fn bad_answers_reprompt() {
        let (output, engine) = run("9\n1\n \nBob\nR\n0\n1\n6\n");

        assert!(output.contains("Invalid choice \"9\""));
        assert!(output.contains("Name cannot be empty"));
        assert!(output.contains("Invalid count \"0\""));
        assert_eq!(engine.queue_snapshot(TicketClass::Standard), ["Bob"]);
    }

    #[test]
    fn engine_errors_are_reported_and_the_loop_continues() {
        let (output, engine) = run("1\nEve\nR\n5\n2\n6\n");

        assert!(output.contains("Error: "));
        assert!(output.contains("Regular Tickets: 2"));
        assert!(engine.queue(TicketClass::Standard).is_empty());
    }

    #[test]
    fn process_then_cancel_then_summary() {
        let (output, engine) = run("1\nAnn\nV\n1\n1\nBen\nV\n2\n3\n4\nBen\nV\n1\n5\n6\n");

        assert!(output.contains("  Ann - VIP"));
        assert!(output.contains("  Ben - VIP"));
        assert!(output.contains("Cancelled 1 of 1 VIP request(s) for Ben."));
        assert!(output.contains("Ledger: reconciled"));
        assert_eq!(engine.remaining(TicketClass::Priority), Capacity(0));
    }

    #[test]
    fn end_of_input_exits_quietly() {
        let (output, _) = run("1\nAnn\n");

        assert!(!output.contains("Goodbye."));
    }

    #[test]
    fn counts_above_the_request_limit_never_reach_the_engine() {
        let limit_error = "Invalid count \"4\", enter a whole number from 1 to 3";

        let (output, engine, log) = run_with_limit("1\nAnn\nV\n4\n", 3);
        assert!(output.contains(limit_error));
        assert_eq!(output.matches("Number of tickets: ").count(), 2);
        assert!(log.is_empty());
        assert!(engine.queue(TicketClass::Priority).is_empty());

        let (output, _, log) = run_with_limit("4\nAnn\nR\n4\n", 3);
        assert!(output.contains(limit_error));
        assert_eq!(output.matches("Number of tickets to cancel: ").count(), 2);
        assert!(log.is_empty());
    }
}
