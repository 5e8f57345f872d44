/*!
 * Statement Monitor - Demo Entry Point
 *
 * Runs simulated statement workers against a shared pool and periodically
 * scans the prepared statement instances table:
 * - Worker threads claim slots, record prepare/execute statistics, release
 * - A scanner task walks the table and logs each projected row
 */

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use stmt_monitor::monitoring::span_scan;
use stmt_monitor::pool::StatementCounter;
use stmt_monitor::{init_tracing, ExecutionSample, Fetch, PoolConfig, PreparedStmtTable, StmtPool};

const WORKERS: usize = 4;
const SCAN_INTERVAL: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = PoolConfig::from_env()?;
    info!(capacity = config.capacity, "Statement monitor starting...");

    let pool = Arc::new(StmtPool::new(config)?);
    let running = Arc::new(AtomicBool::new(true));

    let workers: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let pool = pool.clone();
            let running = running.clone();
            thread::Builder::new()
                .name(format!("stmt-worker-{worker}"))
                .spawn(move || run_worker(worker, &pool, &running))
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(workers = WORKERS, "Workers started, press Ctrl+C to exit");

    let mut ticker = tokio::time::interval(SCAN_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => scan_once(&pool),
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    running.store(false, Ordering::Release);
    for handle in workers {
        if handle.join().is_err() {
            warn!("Worker thread panicked");
        }
    }

    info!(stats = ?pool.stats(), "Statement monitor stopped");
    Ok(())
}

/// One pass over the table
fn scan_once(pool: &StmtPool) {
    let mut table = PreparedStmtTable::open(pool);
    let mut span = span_scan(PreparedStmtTable::NAME);

    table.reset_scan();
    loop {
        match table.fetch_next() {
            Fetch::Row(row) => {
                span.record_row();
                match serde_json::to_string(&row.named().collect::<Vec<_>>()) {
                    Ok(json) => debug!(row = %json, "instance"),
                    Err(e) => warn!(error = %e, "Could not encode row"),
                }
            }
            Fetch::NoSuchRow => span.record_skipped(),
            Fetch::EndOfScan => break,
        }
    }

    info!(
        scan_id = span.scan_id(),
        rows = span.rows(),
        skipped = span.skipped(),
        "Scan complete"
    );
}

/// Simulated statement lifecycle: prepare, execute a few times, deallocate
fn run_worker(worker: usize, pool: &StmtPool, running: &AtomicBool) {
    let mut round: u64 = 0;

    while running.load(Ordering::Acquire) {
        round += 1;
        let sql = format!("SELECT * FROM t{worker} WHERE id = ? /* round {round} */");

        let mut handle = match pool.claim(sql.as_bytes()) {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "Could not track statement");
                thread::sleep(Duration::from_millis(100));
                continue;
            }
        };

        handle.record_prepare(1_000 + round * 10);
        for exec in 0..(round % 7 + 1) {
            if !running.load(Ordering::Acquire) {
                break;
            }
            let sample = ExecutionSample::new(5_000 + exec * 250)
                .with(StatementCounter::RowsSent, exec + 1)
                .with(StatementCounter::RowsExamined, (exec + 1) * 10);
            handle.record_execute(&sample);
            thread::sleep(Duration::from_millis(50));
        }

        handle.release();
    }
}
