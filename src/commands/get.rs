use anyhow::Result;
use declarative::{Lifecycle, ResourceType, Task, TaskOutcome, execute};
use serde::Serialize;
use std::sync::OnceLock;

use super::{Session, print_json, report};
use crate::Context;
use crate::progress::BarProgress;
use crate::resource::{Kind, with_resource};
use crate::ui;

/// Import and read one record.
struct GetTask<'a, R: ResourceType> {
    lifecycle: &'a Lifecycle<'a>,
    id: String,
    /// `Some(None)` once the record turned out to be gone
    record: OnceLock<Option<R::Config>>,
}

impl<'a, R: ResourceType> GetTask<'a, R> {
    fn new(lifecycle: &'a Lifecycle<'a>, id: &str) -> Self {
        Self {
            lifecycle,
            id: id.to_string(),
            record: OnceLock::new(),
        }
    }
}

impl<R: ResourceType> Task for GetTask<'_, R> {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        format!("Read {} {}", R::NAME, self.id)
    }

    fn run(&self) -> declarative::Result<TaskOutcome> {
        let config = self.lifecycle.import::<R>(&self.id)?;
        let read = self.lifecycle.read::<R>(&config)?;
        let outcome = if read.is_some() {
            TaskOutcome::Read
        } else {
            TaskOutcome::Gone
        };
        let _ = self.record.set(read);
        Ok(outcome)
    }
}

/// Read records of `kind` by id and print them as a JSON array.
pub fn run(ctx: &Context, session: &Session, kind: Kind, ids: &[String]) -> Result<()> {
    let lifecycle = session.lifecycle();
    with_resource!(kind, R => get::<R>(ctx, session, &lifecycle, ids))
}

fn get<R>(ctx: &Context, session: &Session, lifecycle: &Lifecycle<'_>, ids: &[String]) -> Result<()>
where
    R: ResourceType,
    R::Config: Serialize,
{
    let tasks: Vec<GetTask<'_, R>> = ids.iter().map(|id| GetTask::new(lifecycle, id)).collect();
    let boxed: Vec<Box<dyn Task + '_>> = tasks
        .iter()
        .map(|task| Box::new(task) as Box<dyn Task + '_>)
        .collect();

    let mut progress = BarProgress::new(ctx.quiet);
    let summary = execute(&boxed, &session.options(), &mut progress);

    let mut records = Vec::new();
    for task in &tasks {
        match task.record.get() {
            Some(Some(config)) => records.push(config),
            Some(None) => ui::warn(&format!("{} {} not found", R::NAME, task.id)),
            None => {}
        }
    }
    print_json(&records)?;

    report(ctx, "read", &summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::jump_group::JumpGroupResource;
    use declarative::{ExecuteOptions, LockRegistry, NoProgress, Variant, VariantContext};
    use serde_json::json;
    use srakit::{Method, MockTransport};
    use std::sync::Arc;

    #[test]
    fn test_get_tasks() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            "/jump-group/1",
            &json!({"id": 1, "name": "Ops", "code_name": "ops"}),
        );
        mock.fail(Method::Get, "/jump-group/3", 500, "boom");
        let lifecycle = Lifecycle::new(
            &mock,
            VariantContext::new(Variant::Pra),
            Arc::new(LockRegistry::new()),
        );

        let tasks: Vec<GetTask<'_, JumpGroupResource>> = ["1", "2", "3", "x"]
            .iter()
            .map(|id| GetTask::new(&lifecycle, id))
            .collect();
        let boxed: Vec<Box<dyn Task + '_>> = tasks
            .iter()
            .map(|task| Box::new(task) as Box<dyn Task + '_>)
            .collect();
        let summary = execute(&boxed, &ExecuteOptions { jobs: 2 }, &mut NoProgress);

        assert_eq!(summary.read, 1);
        assert_eq!(summary.gone, 1);
        assert_eq!(summary.failed, 2);

        let first = tasks[0].record.get().unwrap().as_ref().unwrap();
        assert_eq!(first.code_name.as_known().map(String::as_str), Some("ops"));
        assert!(tasks[1].record.get().unwrap().is_none());
        assert!(tasks[2].record.get().is_none());
    }
}
