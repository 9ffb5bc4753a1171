//! Bridge between the UI thread and the async HTTP client.
//!
//! One worker thread owns a tokio runtime. Jobs arrive over a channel and
//! are spawned onto the runtime, so overlapping requests proceed
//! independently; completions come back tagged with the job's sequence
//! number and the UI decides which ones still matter.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

use crate::api::{ApiClient, GrammarCheckResult, PolishResult, TranslateResult};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    CheckGrammar,
    Translate,
    Polish,
}

impl Op {
    pub fn label(self) -> &'static str {
        match self {
            Op::CheckGrammar => "grammar check",
            Op::Translate => "translation",
            Op::Polish => "polishing",
        }
    }
}

#[derive(Debug)]
pub struct Job {
    pub seq: u64,
    pub op: Op,
    pub text: String,
}

#[derive(Debug)]
pub enum Reply {
    Grammar(GrammarCheckResult),
    Translated(TranslateResult),
    Polished(PolishResult),
}

#[derive(Debug)]
pub struct Completion {
    pub seq: u64,
    pub op: Op,
    pub result: Result<Reply>,
}

/// Spawn the worker thread. Dropping the returned job sender shuts it down.
pub fn spawn(client: ApiClient) -> (Sender<Job>, Receiver<Completion>) {
    let (job_tx, job_rx) = unbounded::<Job>();
    let (done_tx, done_rx) = unbounded::<Completion>();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("tokio rt");
        while let Ok(job) = job_rx.recv() {
            let client = client.clone();
            let done_tx = done_tx.clone();
            rt.spawn(async move {
                debug!(seq = job.seq, "dispatching {}", job.op.label());
                let result = match job.op {
                    Op::CheckGrammar => client.check_grammar(&job.text).await.map(Reply::Grammar),
                    Op::Translate => client.translate(&job.text).await.map(Reply::Translated),
                    Op::Polish => client.polish(&job.text).await.map(Reply::Polished),
                };
                let _ = done_tx.send(Completion {
                    seq: job.seq,
                    op: job.op,
                    result,
                });
            });
        }
    });

    (job_tx, done_rx)
}
