use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::debug;

use super::fetch::{FetchError, PageFetcher};
use super::{DurationPatterns, lookup_duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub media_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub media_id: String,
    pub url: String,
    pub result: Result<String, FetchError>,
}

/// Runs every job on a pool of at most `workers` threads and returns one
/// outcome per job, in job order.
///
/// Workers pull from a shared queue and push `(index, outcome)` pairs back;
/// the caller owns the result slots, so nothing is shared between workers
/// beyond the two channels. Returns once every worker has drained the queue.
pub fn run_fetch_group<F: PageFetcher>(
    fetcher: &F,
    patterns: &DurationPatterns,
    jobs: Vec<FetchJob>,
    workers: usize,
) -> Vec<FetchOutcome> {
    let total = jobs.len();
    if total == 0 {
        return Vec::new();
    }
    let workers = workers.max(1).min(total);

    let (work_tx, work_rx): (Sender<(usize, FetchJob)>, Receiver<(usize, FetchJob)>) =
        bounded(total);
    let (result_tx, result_rx): (Sender<(usize, FetchOutcome)>, Receiver<(usize, FetchOutcome)>) =
        bounded(total);

    for (idx, job) in jobs.into_iter().enumerate() {
        let _ = work_tx.send((idx, job));
    }
    drop(work_tx);

    thread::scope(|scope| {
        for worker in 0..workers {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();

            scope.spawn(move || {
                for (idx, job) in work_rx {
                    let result = lookup_duration(fetcher, patterns, &job.url);
                    debug!(worker, media_id = %job.media_id, ok = result.is_ok(), "prefetch task finished");

                    let outcome = FetchOutcome {
                        media_id: job.media_id,
                        url: job.url,
                        result,
                    };
                    if result_tx.send((idx, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut slots: Vec<Option<FetchOutcome>> = (0..total).map(|_| None).collect();
    for (idx, outcome) in result_rx {
        slots[idx] = Some(outcome);
    }

    slots.into_iter().flatten().collect()
}
