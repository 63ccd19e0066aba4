//! Two-stage fetch of student names and semester results.
//!
//! Stage one resolves every id to a name. Each named student is pushed onto a
//! channel; a dispatcher drains it and submits the dependent result lookup.
//! Both stages draw from one semaphore, so no more than `workers` lookups run
//! at once. The channel closes when the last stage-one task finishes, which
//! is how the dispatcher knows no more names are coming.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::portal::Resolver;
use crate::semester::Semester;
use crate::types::{StudentInfo, StudentRecord};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub workers: usize,
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: 10,
            show_progress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    /// Result-stage records in submission order.
    pub records: Vec<StudentRecord>,
    pub requested: usize,
    pub named: usize,
}

impl PipelineOutcome {
    pub fn graded(&self) -> usize {
        self.records.iter().filter(|r| r.cgpa.is_some()).count()
    }
}

pub async fn run_pipeline(
    resolver: Resolver,
    student_ids: Vec<String>,
    semester: &Semester,
    options: &PipelineOptions,
) -> Result<PipelineOutcome, FetchError> {
    let progress = progress_bar(student_ids.len(), options.show_progress);
    run_stages(resolver, student_ids, semester, options.workers, progress).await
}

async fn run_stages(
    resolver: Resolver,
    student_ids: Vec<String>,
    semester: &Semester,
    workers: usize,
    progress: ProgressBar,
) -> Result<PipelineOutcome, FetchError> {
    let requested = student_ids.len();
    let slots = Arc::new(Semaphore::new(workers.max(1)));
    let (named_tx, mut named_rx) = mpsc::unbounded_channel::<StudentInfo>();

    let mut info_tasks = JoinSet::new();
    for student_id in student_ids {
        let resolver = resolver.clone();
        let slots = Arc::clone(&slots);
        let named_tx = named_tx.clone();
        let progress = progress.clone();
        info_tasks.spawn(async move {
            let info = {
                let _permit = slots.acquire_owned().await.ok();
                resolver.resolve_info(&student_id).await
            };
            progress.inc(1);
            let info = info?;
            if info.name.is_some() {
                let _ = named_tx.send(info);
            } else {
                debug!(student_id = %student_id, "dropping student without a name");
            }
            Ok::<(), FetchError>(())
        });
    }
    drop(named_tx);

    let mut result_tasks: Vec<(String, JoinHandle<Result<StudentRecord, FetchError>>)> =
        Vec::new();
    loop {
        tokio::select! {
            Some(info) = named_rx.recv() => {
                let resolver = resolver.clone();
                let slots = Arc::clone(&slots);
                let semester_id = semester.code.clone();
                let student_id = info.id.clone();
                let handle = tokio::spawn(async move {
                    let _permit = slots.acquire_owned().await.ok();
                    resolver.resolve_result(info, &semester_id).await
                });
                result_tasks.push((student_id, handle));
            }
            Some(joined) = info_tasks.join_next() => match joined {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    progress.abandon();
                    info_tasks.abort_all();
                    abort_handles(&result_tasks);
                    return Err(error);
                }
                Err(join_error) => {
                    progress.inc(1);
                    warn!("student info task failed: {join_error}");
                }
            },
            else => break,
        }
    }
    progress.finish();

    let named = result_tasks.len();
    let mut records = Vec::with_capacity(named);
    let mut pending = result_tasks.into_iter();
    while let Some((student_id, handle)) = pending.next() {
        match handle.await {
            Ok(Ok(record)) => records.push(record),
            Ok(Err(error)) => {
                for (_, rest) in pending {
                    rest.abort();
                }
                return Err(error);
            }
            Err(join_error) => warn!(student_id = %student_id, "result task failed: {join_error}"),
        }
    }

    Ok(PipelineOutcome {
        records,
        requested,
        named,
    })
}

fn abort_handles(tasks: &[(String, JoinHandle<Result<StudentRecord, FetchError>>)]) {
    for (_, handle) in tasks {
        handle.abort();
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template(
        "{msg} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_message("Fetching student data");
    bar
}
