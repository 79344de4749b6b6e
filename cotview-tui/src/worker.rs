//! Background worker thread.
//!
//! The CFTC fetch is blocking HTTP, so it runs here instead of the UI
//! thread. Commands flow in over one channel, finished reports flow back
//! over another; both sides move whole values, nothing is shared.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use cotview_core::data::{load_report, CftcSocrata, LoadError, LoadedReport};
use cotview_core::domain::ReportType;

#[derive(Debug)]
pub enum WorkerCommand {
    LoadReport { report_type: ReportType, year: i32 },
    Shutdown,
}

#[derive(Debug)]
pub enum WorkerResponse {
    ReportLoaded {
        report: Box<LoadedReport>,
    },
    LoadFailed {
        report_type: ReportType,
        year: i32,
        error: LoadError,
    },
}

pub fn spawn_worker(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) -> JoinHandle<()> {
    thread::Builder::new()
        .name("cotview-worker".to_string())
        .spawn(move || worker_loop(rx, tx))
        .expect("failed to spawn worker thread")
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    let source = CftcSocrata::new();
    loop {
        match rx.recv() {
            Ok(WorkerCommand::LoadReport { report_type, year }) => {
                match load_report(&source, report_type, year) {
                    Ok(report) => {
                        let _ = tx.send(WorkerResponse::ReportLoaded {
                            report: Box::new(report),
                        });
                    }
                    Err(error) => {
                        let _ = tx.send(WorkerResponse::LoadFailed {
                            report_type,
                            year,
                            error,
                        });
                    }
                }
            }
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
        }
    }
}
