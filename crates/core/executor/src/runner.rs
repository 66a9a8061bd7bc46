use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};

use crate::{
    ascii, BufferedPort, ChannelPort, ExecutionError, ExecutionReport, Executor, ExecutorState,
    IntcodeContext, Port, Program,
};

/// The result of a run that halted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// The final value of memory cell 0.
    pub first_cell: i64,
    /// Statistics about the run.
    pub report: ExecutionReport,
}

impl ExecutionSummary {
    fn from_executor(executor: &Executor) -> Self {
        Self { first_cell: executor.memory().peek(0), report: executor.report().clone() }
    }
}

/// Drive `executor` until it halts.
fn run_to_halt(executor: &mut Executor, port: &mut impl Port) -> Result<(), ExecutionError> {
    match executor.run(port)? {
        ExecutorState::Halted => Ok(()),
        _ => Err(ExecutionError::InputExhausted),
    }
}

/// Run `program` on the current thread with a fixed list of inputs.
///
/// Returns the summary and every value the program wrote. A program that asks for more input than
/// `inputs` holds fails with [`ExecutionError::InputExhausted`].
pub fn run_to_completion(
    program: &Program,
    inputs: impl IntoIterator<Item = i64>,
    context: &IntcodeContext,
) -> Result<(ExecutionSummary, Vec<i64>), ExecutionError> {
    let mut executor = Executor::with_context(program, context);
    let mut port = BufferedPort::new(inputs);
    run_to_halt(&mut executor, &mut port)?;
    Ok((ExecutionSummary::from_executor(&executor), port.output))
}

/// The driver's side of a run on its own thread.
///
/// Endpoints are `None` when the context supplied the channel, since the other end then belongs
/// to whoever created it.
#[derive(Debug)]
pub struct RunHandle {
    /// Feeds the program's input instructions.
    pub input: Option<Sender<i64>>,
    /// Carries the program's output, closed when the program halts.
    pub output: Option<Receiver<i64>>,
    /// Signalled once when the program halts, if `send_done` was set.
    pub done: Option<Receiver<()>>,
    /// Signalled before every input read, if `send_request` was set.
    pub request: Option<Receiver<()>>,
    handle: JoinHandle<Result<ExecutionSummary, ExecutionError>>,
}

/// Run `program` on a new thread, wired up according to `context`.
pub fn spawn(program: &Program, mut context: IntcodeContext) -> Result<RunHandle, ExecutionError> {
    let capacity = context.channel_capacity;
    let (input, input_rx) = match context.input.take() {
        Some(rx) => (None, rx),
        None => {
            let (tx, rx) = bounded(capacity);
            (Some(tx), rx)
        }
    };
    let (output, output_tx) = match context.output.take() {
        Some(tx) => (None, tx),
        None => {
            let (tx, rx) = bounded(capacity);
            (Some(rx), tx)
        }
    };

    let mut port = ChannelPort::new(input_rx, output_tx);
    let mut done = None;
    if context.send_done {
        let done_tx = match context.done.take() {
            Some(tx) => tx,
            None => {
                let (tx, rx) = bounded(1);
                done = Some(rx);
                tx
            }
        };
        port = port.with_done(done_tx);
    }
    let mut request = None;
    if context.send_request {
        let (tx, rx) = bounded(0);
        request = Some(rx);
        port = port.with_request(tx);
    }

    let name = context.name.take().unwrap_or_else(|| "intcode".to_string());
    let mut executor = Executor::with_context(program, &context);
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            tracing::info_span!("run", name = %name).in_scope(|| -> Result<_, ExecutionError> {
                run_to_halt(&mut executor, &mut port)?;
                Ok(ExecutionSummary::from_executor(&executor))
            })
        })
        .map_err(|err| ExecutionError::ThreadSpawn(err.to_string()))?;

    Ok(RunHandle { input, output, done, request, handle })
}

impl RunHandle {
    /// Send one input value, waiting until the program takes it if the channel has no room.
    pub fn send(&self, value: i64) -> Result<(), ExecutionError> {
        let input = self.input.as_ref().ok_or(ExecutionError::InputClosed)?;
        input.send(value).map_err(|_| ExecutionError::InputClosed)
    }

    /// Send `text` as a sequence of ASCII codes.
    pub fn send_ascii(&self, text: &str) -> Result<(), ExecutionError> {
        ascii::encode(text).try_for_each(|value| self.send(value))
    }

    /// Close the input channel; a program waiting for input then faults.
    pub fn close_input(&mut self) {
        self.input = None;
    }

    /// Receive the next output value, or `None` once the program has halted.
    pub fn recv(&self) -> Option<i64> {
        self.output.as_ref()?.recv().ok()
    }

    /// Receive the next output value, giving up after `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<i64, RecvTimeoutError> {
        match &self.output {
            Some(output) => output.recv_timeout(timeout),
            None => Err(RecvTimeoutError::Disconnected),
        }
    }

    /// Iterate over the output values until the program halts.
    pub fn outputs(&self) -> impl Iterator<Item = i64> + '_ {
        self.output.iter().flat_map(Receiver::iter)
    }

    /// Wait up to `timeout` for the program to block on an input instruction.
    ///
    /// Returns `true` if the program signalled that it is about to read, in which case it is now
    /// waiting for [`RunHandle::send`]. Requires `send_request`.
    pub fn wait_for_request(&self, timeout: Duration) -> bool {
        self.request.as_ref().is_some_and(|request| request.recv_timeout(timeout).is_ok())
    }

    /// Wait for the run to end.
    pub fn join(self) -> Result<ExecutionSummary, ExecutionError> {
        let Self { input, output, done, request, handle } = self;
        // Release our ends so a program blocked on them cannot outlive the driver.
        drop(input);
        drop(output);
        drop(done);
        drop(request);
        handle.join().map_err(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            ExecutionError::WorkerPanicked(message)
        })?
    }
}

#[cfg(test)]
mod tests {
    use crossbeam::channel::unbounded;

    use crate::{programs::tests::*, utils::setup_logger};

    use super::*;

    #[test]
    fn test_run_to_completion() {
        setup_logger();
        let (summary, output) =
            run_to_completion(&add_mul_program(), [], &IntcodeContext::default()).unwrap();
        assert_eq!(summary.first_cell, 3500);
        assert!(output.is_empty());
        assert_eq!(summary.report.total_instruction_count(), 3);
    }

    #[test]
    fn test_run_to_completion_input_exhausted() {
        let result = run_to_completion(&echo_program(), [], &IntcodeContext::default());
        assert_eq!(result.unwrap_err(), ExecutionError::InputExhausted);
    }

    #[test]
    fn test_spawn_echo() {
        setup_logger();
        let handle = spawn(&echo_program(), IntcodeContext::default()).unwrap();
        handle.send(42).unwrap();
        assert_eq!(handle.recv(), Some(42));
        assert_eq!(handle.recv(), None);
        let summary = handle.join().unwrap();
        assert_eq!(summary.first_cell, 42);
    }

    #[test]
    fn test_spawn_outputs_until_halt() {
        let program = quine_program();
        let handle = spawn(&program, IntcodeContext::default()).unwrap();
        let output: Vec<i64> = handle.outputs().collect();
        assert_eq!(output, program.image);
        handle.join().unwrap();
    }

    #[test]
    fn test_done_signalled_after_output_closed() {
        let context =
            IntcodeContext { send_done: true, channel_capacity: 4, ..Default::default() };
        let handle = spawn(&Program::new(vec![104, 7, 99]), context).unwrap();
        handle.done.as_ref().unwrap().recv().unwrap();
        let output = handle.output.as_ref().unwrap();
        assert_eq!(output.recv(), Ok(7));
        assert!(output.recv().is_err());
        handle.join().unwrap();
    }

    #[test]
    fn test_external_channels() {
        let (input_tx, input_rx) = unbounded();
        let (output_tx, output_rx) = unbounded();
        let context =
            IntcodeContext { input: Some(input_rx), output: Some(output_tx), ..Default::default() };
        let handle = spawn(&sum_until_zero_program(), context).unwrap();
        assert!(handle.input.is_none());
        assert!(handle.output.is_none());
        for value in [5, 6, 7, 0] {
            input_tx.send(value).unwrap();
        }
        assert_eq!(output_rx.recv(), Ok(18));
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_for_request() {
        let context = IntcodeContext { send_request: true, ..Default::default() };
        let handle = spawn(&echo_program(), context).unwrap();
        assert!(handle.wait_for_request(Duration::from_secs(5)));
        handle.send(9).unwrap();
        assert_eq!(handle.recv(), Some(9));
        assert!(!handle.wait_for_request(Duration::from_millis(10)));
        handle.join().unwrap();
    }

    #[test]
    fn test_recv_timeout_without_output() {
        let handle = spawn(&echo_program(), IntcodeContext::default()).unwrap();
        assert_eq!(
            handle.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Timeout)
        );
        handle.send(1).unwrap();
        assert_eq!(handle.recv_timeout(Duration::from_secs(5)), Ok(1));
        handle.join().unwrap();
    }

    #[test]
    fn test_closing_input_faults_waiting_program() {
        let mut handle = spawn(&echo_program(), IntcodeContext::default()).unwrap();
        handle.close_input();
        assert_eq!(handle.join().unwrap_err(), ExecutionError::InputClosed);
    }

    #[test]
    fn test_join_releases_unanswered_request() {
        let context = IntcodeContext { send_request: true, send_done: true, ..Default::default() };
        let handle = spawn(&echo_program(), context).unwrap();
        assert_eq!(handle.join().unwrap_err(), ExecutionError::InputClosed);
    }

    #[test]
    fn test_join_releases_pending_request() {
        let context = IntcodeContext { send_request: true, ..Default::default() };
        let handle = spawn(&Program::new(vec![3, 0, 3, 0, 99]), context).unwrap();
        assert!(handle.wait_for_request(Duration::from_secs(5)));
        handle.send(1).unwrap();
        // The second read announces itself on a request channel nobody listens to anymore.
        assert_eq!(handle.join().unwrap_err(), ExecutionError::InputClosed);
    }

    #[test]
    fn test_fault_reported_by_join() {
        let handle = spawn(&Program::new(vec![104, 1, 42]), IntcodeContext::default()).unwrap();
        assert_eq!(handle.recv(), Some(1));
        assert_eq!(handle.recv(), None);
        assert_eq!(handle.join().unwrap_err(), ExecutionError::InvalidOpcode { pc: 2, word: 42 });
    }

    #[test]
    fn test_send_ascii() {
        let context = IntcodeContext { channel_capacity: 16, ..Default::default() };
        let handle = spawn(&Program::new(vec![3, 0, 3, 1, 4, 0, 4, 1, 99]), context).unwrap();
        handle.send_ascii("ok").unwrap();
        assert_eq!(handle.outputs().collect::<Vec<_>>(), vec![i64::from(b'o'), i64::from(b'k')]);
        handle.join().unwrap();
    }
}
