//! Generic runtime for session orchestration.
//!
//! The Runtime drives the session event loop, coordinating between:
//! - [`Session`]: the state machine
//! - [`Controller`]: the external document controller
//! - [`Driver`]: rendering, user input and navigation
//!
//! Everything runs on one task. Each controller event, input or debounce
//! deadline is processed to completion, including the commands and
//! navigations it produces, before the next one is polled.

use tokio::time::{Instant, sleep_until};

use crate::{
    Controller, Driver, RuntimeError, Session, SessionAction, SessionConfig, SessionEvent,
};

type Error<C, D> = RuntimeError<<C as Controller>::Error, <D as Driver>::Error>;

/// What one loop iteration observed.
enum Step {
    Event(SessionEvent<Instant>),
    InputClosed,
    ControllerClosed,
}

/// Generic runtime that orchestrates Session, Controller and Driver.
///
/// # Type Parameters
///
/// - `C`: external document controller
/// - `D`: platform-specific rendering and navigation
pub struct Runtime<C, D>
where
    C: Controller,
    D: Driver,
{
    controller: C,
    driver: D,
    session: Session<Instant>,
}

impl<C, D> Runtime<C, D>
where
    C: Controller,
    D: Driver,
{
    /// Create a runtime. The session opens at the driver's current location.
    pub fn new(controller: C, driver: D, config: SessionConfig) -> Self {
        let session = Session::new(config, driver.current_location());
        Self { controller, driver, session }
    }

    /// Run the session until the controller closes or the user quits.
    ///
    /// This is the core orchestration loop that:
    /// 1. Subscribes to every lifecycle event and dispatches `init`
    /// 2. Starts the one-shot raw content load
    /// 3. Applies controller events, user input and debounce deadlines one at
    ///    a time, in the order they become ready
    /// 4. Flushes the pending edit before stopping
    ///
    /// # Errors
    ///
    /// Returns an error if the controller or driver fails, or if the
    /// controller emits a malformed event.
    pub async fn run(&mut self) -> Result<(), Error<C, D>> {
        for kind in Session::<Instant>::subscriptions() {
            self.controller.subscribe(kind);
        }
        self.driver.render(&self.session).map_err(RuntimeError::Driver)?;

        let init = self.session.init();
        self.process_actions(init).await?;

        let raw = self.controller.load_raw();
        tokio::pin!(raw);
        let mut raw_pending = true;
        let mut input_open = true;

        loop {
            let deadline = self.session.deadline();

            let step: Result<Step, Error<C, D>> = tokio::select! {
                biased;

                result = &mut raw, if raw_pending => {
                    raw_pending = false;
                    let raw = result
                        .inspect_err(|e| tracing::warn!(error = %e, "raw load failed"))
                        .ok();
                    Ok(Step::Event(SessionEvent::RawLoaded(raw)))
                },
                event = self.controller.next_event() => match event {
                    Ok(Some(event)) => Ok(Step::Event(SessionEvent::Lifecycle(event))),
                    Ok(None) => Ok(Step::ControllerClosed),
                    Err(e) => Err(RuntimeError::Controller(e)),
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    Ok(Step::Event(SessionEvent::Tick { now: Instant::now() }))
                },
                input = self.driver.poll_input(), if input_open => match input {
                    Ok(Some(input)) => {
                        Ok(Step::Event(SessionEvent::Input { input, now: Instant::now() }))
                    },
                    Ok(None) => Ok(Step::InputClosed),
                    Err(e) => Err(RuntimeError::Driver(e)),
                },
            };

            match step? {
                Step::Event(event) => {
                    let history = self.driver.context();
                    let actions = self.session.handle(event, &history)?;
                    if self.process_actions(actions).await? {
                        tracing::info!("user quit");
                        break;
                    }
                },
                Step::InputClosed => {
                    tracing::debug!("input closed");
                    input_open = false;
                },
                Step::ControllerClosed => {
                    tracing::info!("controller closed");
                    break;
                },
            }
        }

        let pending = self.session.flush();
        self.process_actions(pending).await?;

        self.driver.stop();
        Ok(())
    }

    /// Execute session actions.
    ///
    /// Returns `true` if the session should quit.
    async fn process_actions(&mut self, actions: Vec<SessionAction>) -> Result<bool, Error<C, D>> {
        for action in actions {
            match action {
                SessionAction::Render => {
                    self.driver.render(&self.session).map_err(RuntimeError::Driver)?;
                },
                SessionAction::Navigate(navigation) => {
                    let title = self.session.config().title_for(&navigation.document);
                    tracing::info!(document = %navigation.document, "replacing history entry");
                    self.driver.push_state(&navigation.document, &title, &navigation.path);
                },
                SessionAction::Dispatch(command) => {
                    tracing::debug!(command = command.name(), "dispatching");
                    self.controller.dispatch(command).await.map_err(RuntimeError::Controller)?;
                },
                SessionAction::Quit => return Ok(true),
            }
        }
        Ok(false)
    }

    /// The session.
    pub fn session(&self) -> &Session<Instant> {
        &self.session
    }

    /// The controller.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Take the runtime apart after [`Runtime::run`] returns.
    pub fn into_parts(self) -> (C, D, Session<Instant>) {
        (self.controller, self.driver, self.session)
    }
}
