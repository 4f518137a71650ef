use std::{
    sync::mpsc::{channel, Sender},
    thread,
};

use super::{
    path::{PathStats, TraceContext, WorkItem},
    trace_worker::{self, Message},
};
use crate::{
    accumulator::Accumulator,
    error::{Error, Result},
};

/// Splits `items` into `thread_count` contiguous batches of near-equal size.
pub fn batches(items: &[WorkItem], thread_count: usize) -> Vec<&[WorkItem]> {
    let thread_count = thread_count.clamp(1, items.len().max(1));
    (0..thread_count)
        .map(|i| {
            let start = i * items.len() / thread_count;
            let end = (i + 1) * items.len() / thread_count;
            &items[start..end]
        })
        .collect()
}

/// Traces `items` on `thread_count` workers.
///
/// Returns the accumulators in worker order along with the combined statistics.
/// Workers are joined before this returns, whether it succeeds or not.
pub fn run(
    ctx: &TraceContext,
    items: &[WorkItem],
    thread_count: usize,
) -> Result<(Vec<Accumulator>, PathStats)> {
    let batches = batches(items, thread_count);
    log::debug!(
        "Trace manager: {} items over {} threads",
        items.len(),
        batches.len()
    );

    thread::scope(|scope| {
        let (worker_send, from_workers) = channel();

        let mut handles = Vec::with_capacity(batches.len());
        for (thread_id, &batch) in batches.iter().enumerate() {
            let worker_send: Sender<Message> = worker_send.clone();
            let handle = thread::Builder::new()
                .name(format!("RayTraceWorker{}", thread_id))
                .spawn_scoped(scope, move || {
                    trace_worker::launch(thread_id, ctx, batch, &worker_send)
                })
                .map_err(|why| {
                    Error::Resource(format!("Failed to spawn trace worker: {}", why))
                })?;
            handles.push(handle);
        }
        // Workers hold the remaining senders so the loop ends once they all exit
        drop(worker_send);

        let mut workers_done = 0;
        for msg in from_workers {
            match msg {
                Message::Progress {
                    thread_id,
                    items_done,
                    items_total,
                    rays,
                    elapsed_s,
                } => {
                    log::trace!(
                        "Trace manager: Worker {} at {}/{}, {:.0} rays/s",
                        thread_id,
                        items_done,
                        items_total,
                        (rays as f32) / elapsed_s.max(f32::EPSILON)
                    );
                }
                Message::Finished {
                    thread_id,
                    stats,
                    elapsed_s,
                } => {
                    workers_done += 1;
                    log::debug!(
                        "Trace manager: Worker {} finished {} rays in {:.3}s ({}/{})",
                        thread_id,
                        stats.rays,
                        elapsed_s,
                        workers_done,
                        batches.len()
                    );
                }
            }
        }

        let mut accumulators = Vec::with_capacity(handles.len());
        let mut stats = PathStats::default();
        let mut failure = None;
        // Join everyone before reporting so no worker outlives the call
        for (thread_id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok((acc, worker_stats))) => {
                    accumulators.push(acc);
                    stats += worker_stats;
                }
                Ok(Err(why)) => {
                    failure.get_or_insert(why);
                }
                Err(_) => {
                    failure.get_or_insert(Error::Resource(format!(
                        "Trace worker {} panicked",
                        thread_id
                    )));
                }
            }
        }

        match failure {
            Some(why) => Err(why),
            None => Ok((accumulators, stats)),
        }
    })
}
