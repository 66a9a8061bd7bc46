use std::collections::VecDeque;

use crossbeam::channel::{Receiver, Sender};

use crate::ExecutionError;

/// The machine's view of the outside world.
///
/// The executor calls [`Port::before_read`] and then [`Port::read`] for every input instruction,
/// [`Port::write`] for every output instruction and [`Port::halt`] once when the program halts.
pub trait Port {
    /// Consume the next input value.
    ///
    /// Blocking ports wait for a value. Non-blocking ports return `Ok(None)` when no value is
    /// available yet; the executor then pauses without consuming the input instruction.
    fn read(&mut self) -> Result<Option<i64>, ExecutionError>;

    /// Emit an output value.
    fn write(&mut self, value: i64) -> Result<(), ExecutionError>;

    /// Called right before [`Port::read`].
    fn before_read(&mut self) {}

    /// Called exactly once when the program halts.
    fn halt(&mut self) {}
}

/// A [`Port`] backed by crossbeam channels, for machines running on their own thread.
#[derive(Debug)]
pub struct ChannelPort {
    input: Receiver<i64>,
    output: Option<Sender<i64>>,
    done: Option<Sender<()>>,
    request: Option<Sender<()>>,
}

impl ChannelPort {
    /// Create a port reading from `input` and writing to `output`.
    #[must_use]
    pub fn new(input: Receiver<i64>, output: Sender<i64>) -> Self {
        Self { input, output: Some(output), done: None, request: None }
    }

    /// Signal `done` once the program halts.
    #[must_use]
    pub fn with_done(mut self, done: Sender<()>) -> Self {
        self.done = Some(done);
        self
    }

    /// Signal `request` before every blocking read.
    #[must_use]
    pub fn with_request(mut self, request: Sender<()>) -> Self {
        self.request = Some(request);
        self
    }
}

impl Port for ChannelPort {
    fn read(&mut self) -> Result<Option<i64>, ExecutionError> {
        self.input.recv().map(Some).map_err(|_| ExecutionError::InputClosed)
    }

    fn write(&mut self, value: i64) -> Result<(), ExecutionError> {
        let output = self.output.as_ref().ok_or(ExecutionError::OutputClosed)?;
        output.send(value).map_err(|_| ExecutionError::OutputClosed)
    }

    fn before_read(&mut self) {
        if let Some(request) = &self.request {
            // Nobody listening means nobody cares that we are about to block.
            let _ = request.send(());
        }
    }

    fn halt(&mut self) {
        // Close the output before signalling so a driver woken by `done` sees a closed stream.
        self.output = None;
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
    }
}

/// A non-blocking [`Port`] backed by in-memory buffers.
///
/// Reading from an empty input buffer pauses the machine instead of blocking, so drivers can
/// push more input and resume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedPort {
    /// Values waiting to be read, in order.
    pub input: VecDeque<i64>,
    /// Values written so far, in order.
    pub output: Vec<i64>,
    /// Whether the program has halted.
    pub halted: bool,
}

impl BufferedPort {
    /// Create a port with the given pending input.
    #[must_use]
    pub fn new(input: impl IntoIterator<Item = i64>) -> Self {
        Self { input: input.into_iter().collect(), ..Default::default() }
    }

    /// Queue another input value.
    pub fn push_input(&mut self, value: i64) {
        self.input.push_back(value);
    }

    /// Drain the output written so far.
    pub fn take_output(&mut self) -> Vec<i64> {
        std::mem::take(&mut self.output)
    }
}

impl Port for BufferedPort {
    fn read(&mut self) -> Result<Option<i64>, ExecutionError> {
        Ok(self.input.pop_front())
    }

    fn write(&mut self, value: i64) -> Result<(), ExecutionError> {
        self.output.push(value);
        Ok(())
    }

    fn halt(&mut self) {
        self.halted = true;
    }
}
