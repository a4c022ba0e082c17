//! Token-timed dispatch of jobs honoring a target requests-per-second rate.
//!
//! The first job is sent at t=0 (no artificial startup delay); each
//! subsequent job waits for the previous dispatch plus `1/rps`. Lateness is
//! never compensated by bursting — `MissedTickBehavior::Delay` lets the
//! schedule drift rather than catch up, matching the spec's tolerance for
//! drift over bursting.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::job::Job;

/// Run the pacer to completion: enqueue every job (unless cancelled first),
/// then close the job channel. Never retries a send; a job is delivered
/// exactly once or not at all.
pub async fn run(jobs: Vec<Job>, rps: u32, job_tx: mpsc::Sender<Job>, mut cancel: watch::Receiver<bool>) {
    let total = jobs.len();
    info!(total, rps, "pacer starting");

    let period = Duration::from_secs_f64(1.0 / rps as f64);
    let mut ticks = time::interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut dispatched = 0usize;
    for (i, job) in jobs.into_iter().enumerate() {
        if *cancel.borrow() {
            break;
        }

        if i > 0 {
            tokio::select! {
                _ = ticks.tick() => {}
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        break;
                    }
                }
            }
        }

        if *cancel.borrow() {
            break;
        }

        tokio::select! {
            send_res = job_tx.send(job) => {
                match send_res {
                    Ok(()) => dispatched += 1,
                    Err(_) => break, // no worker left to receive; stop dispatching
                }
            }
            _ = cancel.changed() => {
                if *cancel.borrow() {
                    break;
                }
            }
        }
    }

    debug!(dispatched, total, "pacer closing job channel");
    // Dropping `job_tx` closes the channel; workers observe `recv() == None`.
}
