use std::ops::Range;

use crossbeam::channel::{bounded, Receiver, Sender};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{spawn, ExecutionError, ExecutionReport, IntcodeContext, Program, RunHandle};

/// Several runs of one program with the output of each stage feeding the next.
#[derive(Debug)]
pub struct Pipeline {
    inputs: Vec<Sender<i64>>,
    tail: Receiver<i64>,
    done: Receiver<()>,
    stages: Vec<RunHandle>,
    feedback: bool,
}

/// What a pipeline left behind once every stage halted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// The values that came out of the last stage.
    ///
    /// For a feedback loop only the final value, which no stage consumed.
    pub outputs: Vec<i64>,
    /// The reports of all stages combined.
    pub report: ExecutionReport,
}

impl PipelineOutcome {
    /// The last value out of the pipeline.
    pub fn signal(&self) -> Option<i64> {
        self.outputs.last().copied()
    }
}

impl Pipeline {
    /// Wire `stages` runs of `program` in a line, stage `i` feeding stage `i + 1`.
    ///
    /// At least one stage is always started. `context` supplies the channel capacity, the cycle
    /// limit and a name prefix for the stages.
    pub fn chain(
        program: &Program,
        stages: usize,
        context: &IntcodeContext,
    ) -> Result<Self, ExecutionError> {
        Self::build(program, stages, context, false)
    }

    /// Like [`Pipeline::chain`], but the last stage feeds back into the first.
    ///
    /// The ring link has room for one value so the last stage's final output survives after the
    /// first stage halts.
    pub fn feedback(
        program: &Program,
        stages: usize,
        context: &IntcodeContext,
    ) -> Result<Self, ExecutionError> {
        Self::build(program, stages, context, true)
    }

    fn build(
        program: &Program,
        stages: usize,
        context: &IntcodeContext,
        feedback: bool,
    ) -> Result<Self, ExecutionError> {
        let stages = stages.max(1);
        let capacity = context.channel_capacity;
        let prefix = context.name.as_deref().unwrap_or("stage");
        let (done_tx, done) = bounded(stages);

        let head_capacity = if feedback { capacity.max(1) } else { capacity };
        let (head_tx, head_rx) = bounded(head_capacity);
        let mut inputs = vec![head_tx.clone()];
        let mut input = head_rx.clone();
        let mut handles = Vec::with_capacity(stages);
        for i in 0..stages {
            let (output_tx, output_rx) = if i + 1 == stages && feedback {
                (head_tx.clone(), head_rx.clone())
            } else {
                bounded(capacity)
            };
            if i + 1 < stages {
                inputs.push(output_tx.clone());
            }
            let stage_context = IntcodeContext {
                send_done: true,
                input: Some(input),
                output: Some(output_tx),
                done: Some(done_tx.clone()),
                name: Some(format!("{prefix}-{i}")),
                ..context.clone()
            };
            handles.push(spawn(program, stage_context)?);
            input = output_rx;
        }
        tracing::debug!("started {stages} stages, feedback: {feedback}");

        Ok(Self { inputs, tail: input, done, stages: handles, feedback })
    }

    /// The number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages, which never happens.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Send a value to the input of `stage`, e.g. its phase setting.
    ///
    /// Fails with [`ExecutionError::NoSuchStage`] if `stage` is not below [`Pipeline::len`].
    pub fn send(&self, stage: usize, value: i64) -> Result<(), ExecutionError> {
        let input = self.inputs.get(stage).ok_or(ExecutionError::NoSuchStage(stage))?;
        input.send(value).map_err(|_| ExecutionError::InputClosed)
    }

    /// Signalled once by every stage that halts.
    pub fn done(&self) -> &Receiver<()> {
        &self.done
    }

    /// Wait for every stage to halt and collect what came out of the last one.
    pub fn finish(self) -> Result<PipelineOutcome, ExecutionError> {
        let Self { inputs, tail, done, stages, feedback } = self;
        // Only the stages may keep the links alive from here on, so a faulting stage unblocks
        // its neighbours.
        drop(inputs);

        let mut outputs = Vec::new();
        if !feedback {
            outputs.extend(tail.iter());
        }

        let mut report = ExecutionReport::default();
        let mut first_error = None;
        for stage in stages {
            match stage.join() {
                Ok(summary) => report += summary.report,
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }
        tracing::debug!("pipeline finished, {} stages halted", done.try_iter().count());

        if feedback {
            outputs.extend(tail.try_recv());
        }
        Ok(PipelineOutcome { outputs, report })
    }
}

/// Run `program` as one amplifier per phase and return the final signal.
///
/// Stage `i` first reads `phases[i]`, then the first stage reads the signal 0.
pub fn amplify(program: &Program, phases: &[i64], feedback: bool) -> Result<i64, ExecutionError> {
    if phases.is_empty() {
        return Err(ExecutionError::NoOutput);
    }
    let context = IntcodeContext { name: Some("amp".to_string()), ..Default::default() };
    let pipeline = if feedback {
        Pipeline::feedback(program, phases.len(), &context)?
    } else {
        Pipeline::chain(program, phases.len(), &context)?
    };
    for (stage, phase) in phases.iter().enumerate() {
        pipeline.send(stage, *phase)?;
    }
    pipeline.send(0, 0)?;
    pipeline.finish()?.signal().ok_or(ExecutionError::NoOutput)
}

/// Try every ordering of `phases` and return the strongest signal with the ordering producing it.
pub fn max_amplification(
    program: &Program,
    phases: Range<i64>,
    feedback: bool,
) -> Result<(i64, Vec<i64>), ExecutionError> {
    let phases = phases.collect_vec();
    let mut best: Option<(i64, Vec<i64>)> = None;
    for ordering in phases.iter().copied().permutations(phases.len()) {
        let signal = amplify(program, &ordering, feedback)?;
        if best.as_ref().map_or(true, |(best_signal, _)| signal > *best_signal) {
            best = Some((signal, ordering));
        }
    }
    best.ok_or(ExecutionError::NoOutput)
}
