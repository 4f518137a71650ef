use std::{sync::mpsc::Sender, time::Instant};

use super::path::{PathStats, TraceContext, WorkItem};
use crate::{accumulator::Accumulator, error::Result};

// Items traced between progress reports
const REPORT_INTERVAL: usize = 512;

pub enum Message {
    Progress {
        thread_id: usize,
        items_done: usize,
        items_total: usize,
        rays: usize,
        elapsed_s: f32,
    },
    Finished {
        thread_id: usize,
        stats: PathStats,
        elapsed_s: f32,
    },
}

/// Traces `batch` into a fresh accumulator.
pub fn launch(
    thread_id: usize,
    ctx: &TraceContext,
    batch: &[WorkItem],
    to_parent: &Sender<Message>,
) -> Result<(Accumulator, PathStats)> {
    log::trace!("Trace thread {}: Begin, {} items", thread_id, batch.len());

    let start = Instant::now();
    let mut acc = Accumulator::new(ctx.table)?;
    let mut stats = PathStats::default();

    for (chunk_index, chunk) in batch.chunks(REPORT_INTERVAL).enumerate() {
        let chunk_start = Instant::now();
        let mut chunk_stats = PathStats::default();
        for &item in chunk {
            ctx.trace(item, &mut acc, &mut chunk_stats);
        }
        stats += chunk_stats;

        // The manager only logs these, a closed channel is not an error for the trace
        let items_done = (chunk_index * REPORT_INTERVAL + chunk.len()).min(batch.len());
        if let Err(why) = to_parent.send(Message::Progress {
            thread_id,
            items_done,
            items_total: batch.len(),
            rays: chunk_stats.rays,
            elapsed_s: chunk_start.elapsed().as_secs_f32(),
        }) {
            log::error!(
                "Trace thread {}: Error sending progress to parent: {}",
                thread_id,
                why
            );
        }
    }

    // Out of range deposits are only known to the accumulator
    stats.dropped += acc.dropped;

    if let Err(why) = to_parent.send(Message::Finished {
        thread_id,
        stats,
        elapsed_s: start.elapsed().as_secs_f32(),
    }) {
        log::error!(
            "Trace thread {}: Error notifying parent on finish: {}",
            thread_id,
            why
        );
    }

    log::trace!("Trace thread {}: End", thread_id);

    Ok((acc, stats))
}
