use crossbeam::channel::{Receiver, Sender};

/// Context to run a program.
///
/// Every field has a documented default and [`IntcodeContext::default`] gives a run with fresh,
/// unbuffered channels and no notifications. Override fields with struct update syntax:
///
/// ```
/// use intcode_core_executor::IntcodeContext;
///
/// let context = IntcodeContext { send_done: true, ..Default::default() };
/// assert!(!context.send_request);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IntcodeContext {
    /// Signal the done channel exactly once when the program halts.
    ///
    /// Default: `false`.
    pub send_done: bool,

    /// Signal the request channel right before every blocking input read, so a driver knows the
    /// machine is ready to receive.
    ///
    /// Default: `false`.
    pub send_request: bool,

    /// An externally supplied input channel, e.g. the output of another machine.
    ///
    /// Default: `None`, a fresh channel is created.
    pub input: Option<Receiver<i64>>,

    /// An externally supplied output channel, e.g. the input of another machine.
    ///
    /// Default: `None`, a fresh channel is created.
    pub output: Option<Sender<i64>>,

    /// An externally supplied done channel shared between several machines.
    ///
    /// Only used when `send_done` is set. Default: `None`, a fresh channel is created.
    pub done: Option<Sender<()>>,

    /// The capacity of freshly created input and output channels.
    ///
    /// Default: `0`, every send waits for the matching receive.
    pub channel_capacity: usize,

    /// The maximum number of instructions to execute.
    ///
    /// Default: `None`, unlimited.
    pub max_cycles: Option<u64>,

    /// A name for the run, used for its thread and log span.
    ///
    /// Default: `None`.
    pub name: Option<String>,
}
