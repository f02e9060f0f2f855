//! Execution engine - runs independent lifecycle tasks in parallel

use crate::context::ProgressCallback;
use crate::error::Result;
use crate::types::{ExecuteOptions, ExecuteSummary, TaskOutcome};
use rayon::prelude::*;

/// One unit of work, typically a lifecycle call on a single record.
///
/// Tasks in a batch must not depend on each other; shared remote side
/// effects are serialized by the set reconciler's locks, not here.
pub trait Task: Send + Sync {
    /// Unique identifier within the batch
    fn id(&self) -> String;

    /// Human-readable description
    fn description(&self) -> String;

    /// Perform the work
    fn run(&self) -> Result<TaskOutcome>;
}

impl<T: Task + ?Sized> Task for &T {
    fn id(&self) -> String {
        (**self).id()
    }

    fn description(&self) -> String {
        (**self).description()
    }

    fn run(&self) -> Result<TaskOutcome> {
        (**self).run()
    }
}

/// Run a batch of tasks and summarize the outcomes.
///
/// Failures do not stop the batch; each becomes a `Failed` outcome
/// carrying its diagnostic.
pub fn execute<P: ProgressCallback>(
    tasks: &[Box<dyn Task + '_>],
    opts: &ExecuteOptions,
    progress: &mut P,
) -> ExecuteSummary {
    let mut summary = ExecuteSummary::default();
    if tasks.is_empty() {
        return summary;
    }

    progress.on_batch_start(tasks.len());
    let outcomes = if opts.jobs <= 1 || tasks.len() == 1 {
        execute_sequential(tasks, progress)
    } else {
        execute_parallel(tasks, opts.jobs, progress)
    };
    for (id, outcome) in &outcomes {
        summary.add_outcome(id, outcome);
    }
    progress.on_batch_complete();

    summary
}

fn execute_sequential<P: ProgressCallback>(
    tasks: &[Box<dyn Task + '_>],
    progress: &mut P,
) -> Vec<(String, TaskOutcome)> {
    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        let id = task.id();
        progress.on_task_start(&id, &task.description());
        let outcome = run_task(task.as_ref());
        progress.on_task_complete(&id, &outcome);
        outcomes.push((id, outcome));
    }
    outcomes
}

/// Run tasks on a rayon pool with `jobs` threads.
fn execute_parallel<P: ProgressCallback>(
    tasks: &[Box<dyn Task + '_>],
    jobs: usize,
    progress: &mut P,
) -> Vec<(String, TaskOutcome)> {
    let pool = match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool,
        Err(e) => {
            log::warn!("Failed to create thread pool, running sequentially: {e}");
            return execute_sequential(tasks, progress);
        }
    };

    // The progress callback is not thread-safe; report after the batch.
    for task in tasks {
        progress.on_task_start(&task.id(), &task.description());
    }

    let outcomes: Vec<(String, TaskOutcome)> = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| (task.id(), run_task(task.as_ref())))
            .collect()
    });

    for (id, outcome) in &outcomes {
        progress.on_task_complete(id, outcome);
    }
    outcomes
}

fn run_task(task: &dyn Task) -> TaskOutcome {
    match task.run() {
        Ok(outcome) => outcome,
        Err(e) => {
            log::debug!("{} failed: {e}", task.id());
            TaskOutcome::Failed {
                diagnostic: e.diagnostic(),
            }
        }
    }
}
