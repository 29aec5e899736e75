mod console;
mod render;
mod session;

use std::sync::Arc;

use anyhow::Result;
use safar_catalog::{FlightCatalog, SmallTalkTable};
use safar_core::{validate_phone, BookingField, FlightRecord, Intent};
use safar_ml::{IntentPrediction, SafarMlStack};
use safar_observability::SessionMetrics;
use tracing::{debug, info, instrument};

pub use console::{Console, ScriptedConsole, StdConsole, BOT_PREFIX};
pub use session::Session;

pub const USER_PROMPT: &str = "You: ";
pub const FALLBACK_REPLY: &str = "I'm sorry, I didn't understand that. Can you please try again?";
pub const SMALL_TALK_FALLBACK: &str =
    "I'm not sure how to respond to that, but I'm here to help with flights!";
pub const FAREWELL_REPLY: &str = "Goodbye! Have a great day!";
pub const BOT_NAME_REPLY: &str = "My name is Flight Assistant! I'm here to help you.";

const SELECT_PROMPT: &str = "Select the flight by number or flight ID: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Finished,
}

/// The conversation driver. Catalog, small talk and classifier are shared and
/// read-only; all mutable state lives in the `Session` passed to each turn.
#[derive(Clone)]
pub struct FlightAssistant {
    catalog: Arc<FlightCatalog>,
    small_talk: Arc<SmallTalkTable>,
    ml_stack: SafarMlStack,
    metrics: Arc<SessionMetrics>,
}

impl FlightAssistant {
    pub fn new(
        catalog: Arc<FlightCatalog>,
        small_talk: Arc<SmallTalkTable>,
        ml_stack: SafarMlStack,
        metrics: Arc<SessionMetrics>,
    ) -> Self {
        Self {
            catalog,
            small_talk,
            ml_stack,
            metrics,
        }
    }

    pub fn catalog(&self) -> &FlightCatalog {
        &self.catalog
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn classify(&self, text: &str) -> IntentPrediction {
        self.metrics.inc_classifier_inference();
        self.ml_stack.classifier.predict(text)
    }

    /// Onboarding followed by the main loop. Returns the finished session, or
    /// `None` if input closed before onboarding completed.
    pub fn run(&self, console: &mut dyn Console) -> Result<Option<Session>> {
        let Some(mut session) = self.onboard(console)? else {
            info!("input closed during onboarding");
            return Ok(None);
        };

        loop {
            let Some(text) = console.read_line(USER_PROMPT)? else {
                info!(session_id = %session.id, "input closed");
                break;
            };
            if self.handle_turn(&mut session, &text, console)? == TurnOutcome::Finished {
                break;
            }
        }

        info!(
            session_id = %session.id,
            bookings = session.bookings.len(),
            metrics = ?self.metrics.snapshot(),
            "session finished"
        );
        Ok(Some(session))
    }

    pub fn onboard(&self, console: &mut dyn Console) -> Result<Option<Session>> {
        console.write_line("Welcome to the Safar Flight Booking Assistant!")?;
        console.say("Hello! May I know your name?")?;
        let Some(name) = console.read_line(USER_PROMPT)? else {
            return Ok(None);
        };

        console.say(&format!(
            "Nice to meet you, {name}! Can I have your phone number?"
        ))?;
        let phone = loop {
            let Some(raw) = console.read_line(USER_PROMPT)? else {
                return Ok(None);
            };
            match validate_phone(&raw) {
                Ok(phone) => break phone,
                Err(err) => console.say(&err.to_string())?,
            }
        };

        console.say(
            "Thank you! You can ask me to book a flight, view all flights, or chat with me. Type 'exit' to quit.",
        )?;

        let session = Session::new(name, phone);
        info!(session_id = %session.id, "session started");
        Ok(Some(session))
    }

    #[instrument(skip_all, fields(session_id = %session.id))]
    pub fn handle_turn(
        &self,
        session: &mut Session,
        text: &str,
        console: &mut dyn Console,
    ) -> Result<TurnOutcome> {
        self.metrics.inc_turn();
        let prediction = self.classify(text);
        debug!(
            intent = %prediction.intent,
            confidence = prediction.confidence,
            model = prediction.model,
            "intent classified"
        );

        match prediction.intent {
            Intent::Farewell => {
                console.say(FAREWELL_REPLY)?;
                return Ok(TurnOutcome::Finished);
            }
            Intent::Help => self.help(console)?,
            Intent::BookFlight => return self.book_flight(session, console),
            Intent::ViewFlights => self.view_flights(console)?,
            Intent::MyBooking => self.my_bookings(session, console)?,
            Intent::UpdateBooking => return self.update_bookings(session, console),
            Intent::CancelBooking => return self.cancel_bookings(session, console),
            Intent::MyName => console.say(&format!("Your name is {}.", session.user_name))?,
            Intent::BotName => console.say(BOT_NAME_REPLY)?,
            Intent::SmallTalk => {
                let reply = self.small_talk.respond(text).unwrap_or(SMALL_TALK_FALLBACK);
                console.say(reply)?;
            }
            Intent::Unknown => {
                self.metrics.inc_fallback();
                console.say(FALLBACK_REPLY)?;
            }
        }

        Ok(TurnOutcome::Continue)
    }

    fn help(&self, console: &mut dyn Console) -> Result<()> {
        console.say("Here are some things you can ask me to do:")?;
        for line in render::help_lines(&self.ml_stack.examples) {
            console.write_line(&line)?;
        }
        Ok(())
    }

    fn view_flights(&self, console: &mut dyn Console) -> Result<()> {
        if self.catalog.is_empty() {
            return console.say("There are no flights in the catalog right now.");
        }

        console.say("Here is a list of all available flights:")?;
        for flight in self.catalog.all() {
            console.write_line(&flight.summary())?;
        }
        Ok(())
    }

    fn book_flight(&self, session: &mut Session, console: &mut dyn Console) -> Result<TurnOutcome> {
        console.say("Sure, let's book a flight.")?;

        let mut answers = Vec::with_capacity(4);
        for prompt in [
            "Where are you departing from? ",
            "Where are you traveling to? ",
            "What is your travel date (DD/MM/YYYY)? ",
            "What class would you prefer (Economy/Business)? ",
        ] {
            let Some(answer) = console.read_line(prompt)? else {
                return Ok(TurnOutcome::Finished);
            };
            answers.push(answer);
        }

        let flights = match self
            .catalog
            .search(&answers[0], &answers[1], &answers[2], &answers[3])
        {
            Ok(flights) => flights,
            Err(err) => {
                console.say(&err.to_string())?;
                return Ok(TurnOutcome::Continue);
            }
        };

        console.say("Here are the available flights:")?;
        for line in render::numbered_flights(&flights) {
            console.write_line(&line)?;
        }

        let Some(selected) = select_flight(&flights, console)? else {
            return Ok(TurnOutcome::Finished);
        };

        match session
            .bookings
            .book(selected, &session.user_name, &session.user_phone)
        {
            Ok(booking) => {
                self.metrics.inc_booking();
                console.say(&format!(
                    "Your booking is confirmed! Reference: {}.",
                    booking.reference
                ))?;
                for line in render::booking_confirmation(&booking) {
                    console.write_line(&line)?;
                }
            }
            Err(err) => console.say(&err.to_string())?,
        }

        Ok(TurnOutcome::Continue)
    }

    fn my_bookings(&self, session: &Session, console: &mut dyn Console) -> Result<()> {
        if session.bookings.is_empty() {
            return console.say("You have no active bookings.");
        }

        console.say("Here are your active bookings:")?;
        for booking in session.bookings.list() {
            for line in render::booking_overview(booking) {
                console.write_line(&line)?;
            }
        }
        Ok(())
    }

    /// Changes apply to every booking in the session, not a chosen one.
    fn update_bookings(
        &self,
        session: &mut Session,
        console: &mut dyn Console,
    ) -> Result<TurnOutcome> {
        if session.bookings.is_empty() {
            console.say("You have no active bookings to update.")?;
            return Ok(TurnOutcome::Continue);
        }

        console.say("Let's update your booking. What would you like to change?")?;
        console.write_line(
            "Options: origin, destination, date, class (you can specify multiple, separated by commas). Changes apply to all of your bookings.",
        )?;
        let Some(requested) = console.read_line(USER_PROMPT)? else {
            return Ok(TurnOutcome::Finished);
        };

        let mut changes = Vec::new();
        for name in requested
            .split(',')
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
        {
            match name.parse::<BookingField>() {
                Ok(BookingField::Reference) | Err(_) => {
                    console.say(&format!("Invalid field '{name}'. Skipping."))?;
                }
                Ok(field) => {
                    let Some(value) = console.read_line(&format!("Enter new {field}: "))? else {
                        return Ok(TurnOutcome::Finished);
                    };
                    changes.push((name, value));
                }
            }
        }

        if changes.is_empty() {
            console.say("Nothing to update.")?;
            return Ok(TurnOutcome::Continue);
        }

        let report = session.bookings.update(&changes);
        for applied in &report.applied {
            console.say(&format!(
                "Your {} for booking {} has been updated to {}.",
                applied.field, applied.reference, applied.value
            ))?;
        }
        for rejected in &report.rejected {
            console.say(&format!(
                "Could not update {} for booking {}: {}",
                rejected.field_name, rejected.reference, rejected.error
            ))?;
        }

        Ok(TurnOutcome::Continue)
    }

    fn cancel_bookings(
        &self,
        session: &mut Session,
        console: &mut dyn Console,
    ) -> Result<TurnOutcome> {
        if session.bookings.is_empty() {
            console.say("You have no active bookings to cancel.")?;
            return Ok(TurnOutcome::Continue);
        }

        console.say("Are you sure you want to cancel all bookings? (yes/no)")?;
        let Some(confirmation) = console.read_line(USER_PROMPT)? else {
            return Ok(TurnOutcome::Finished);
        };

        if session.bookings.cancel_all(&confirmation) {
            self.metrics.inc_cancellation();
            console.say("All your bookings have been cancelled.")?;
        } else {
            console.say("Cancellation aborted.")?;
        }
        Ok(TurnOutcome::Continue)
    }
}

/// Re-prompts until the user picks one of `flights`. `None` when input closes.
fn select_flight<'a>(
    flights: &'a [FlightRecord],
    console: &mut dyn Console,
) -> Result<Option<&'a FlightRecord>> {
    loop {
        let Some(selection) = console.read_line(SELECT_PROMPT)? else {
            return Ok(None);
        };
        match resolve_selection(flights, &selection) {
            Ok(flight) => return Ok(Some(flight)),
            Err(message) => console.say(message)?,
        }
    }
}

fn resolve_selection<'a>(
    flights: &'a [FlightRecord],
    selection: &str,
) -> Result<&'a FlightRecord, &'static str> {
    let selection = selection.trim();
    if !selection.is_empty() && selection.chars().all(|ch| ch.is_ascii_digit()) {
        return selection
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|idx| flights.get(idx))
            .ok_or("Invalid selection. Please enter a valid flight number.");
    }

    flights
        .iter()
        .find(|flight| flight.id.eq_ignore_ascii_case(selection))
        .ok_or("Invalid input. Please select a valid flight number or flight ID.")
}
