use anyhow::Result;
use declarative::{Error, Lifecycle, ResourceType, Task, TaskOutcome, execute};
use std::marker::PhantomData;

use super::{Session, report};
use crate::Context;
use crate::progress::BarProgress;
use crate::resource::{Kind, with_resource};

/// Delete one record by id. A record that is already gone is not an error.
struct DeleteTask<'a, R> {
    lifecycle: &'a Lifecycle<'a>,
    id: String,
    _kind: PhantomData<fn() -> R>,
}

impl<R: ResourceType> Task for DeleteTask<'_, R> {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        format!("Delete {} {}", R::NAME, self.id)
    }

    fn run(&self) -> declarative::Result<TaskOutcome> {
        let config = self.lifecycle.import::<R>(&self.id)?;
        match self.lifecycle.delete::<R>(&config) {
            Ok(()) => Ok(TaskOutcome::Deleted),
            Err(Error::Transport(e)) if e.is_not_found() => Ok(TaskOutcome::Gone),
            Err(e) => Err(e),
        }
    }
}

/// Delete records of `kind` by id.
pub fn run(ctx: &Context, session: &Session, kind: Kind, ids: &[String]) -> Result<()> {
    let lifecycle = session.lifecycle();
    let tasks: Vec<Box<dyn Task + '_>> = with_resource!(kind, R => ids
        .iter()
        .map(|id| Box::new(DeleteTask::<R> {
            lifecycle: &lifecycle,
            id: id.clone(),
            _kind: PhantomData,
        }) as Box<dyn Task + '_>)
        .collect());

    let mut progress = BarProgress::new(ctx.quiet);
    let summary = execute(&tasks, &session.options(), &mut progress);
    report(ctx, "deleted", &summary)
}
