use std::fs;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use tracing::{debug, error, info, warn};

use crate::worker::{Completion, Job, Op, Reply};

pub struct PadApp {
    input: String,
    output: String,
    issues: Vec<crate::api::GrammarIssue>,
    error: Option<String>,
    notice: Option<String>,
    busy: bool,
    next_seq: u64,
    // Sequence of the most recently initiated job; completions with an
    // older sequence are stale and get dropped.
    latest_seq: u64,
    job_tx: Sender<Job>,
    completion_rx: Receiver<Completion>,
}

impl PadApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        job_tx: Sender<Job>,
        completion_rx: Receiver<Completion>,
    ) -> Self {
        setup_fonts(&cc.egui_ctx);
        Self::with_channels(job_tx, completion_rx)
    }

    fn with_channels(job_tx: Sender<Job>, completion_rx: Receiver<Completion>) -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            issues: Vec::new(),
            error: None,
            notice: None,
            busy: false,
            next_seq: 0,
            latest_seq: 0,
            job_tx,
            completion_rx,
        }
    }

    fn dispatch(&mut self, op: Op) {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest_seq = seq;
        self.busy = true;
        let job = Job {
            seq,
            op,
            text: self.input.clone(),
        };
        if self.job_tx.send(job).is_err() {
            self.busy = false;
            self.error = Some("worker thread is gone; restart the app".to_string());
        }
    }

    fn drain_completions(&mut self) {
        while let Ok(done) = self.completion_rx.try_recv() {
            self.apply(done);
        }
    }

    fn apply(&mut self, done: Completion) {
        if done.seq != self.latest_seq {
            debug!(seq = done.seq, latest = self.latest_seq, "dropping stale completion");
            return;
        }
        self.busy = false;
        match done.result {
            Ok(Reply::Grammar(result)) => {
                self.output.clear();
                if result.issues.is_empty() {
                    self.issues.clear();
                    self.notice = Some("No grammar issues found.".to_string());
                } else {
                    self.issues = result.issues;
                }
            }
            Ok(Reply::Translated(result)) => {
                self.issues.clear();
                self.output = result.translated;
            }
            Ok(Reply::Polished(result)) => {
                self.issues.clear();
                self.output = result.polished;
            }
            Err(err) => {
                self.error = Some(format!("{} failed: {}", done.op.label(), err));
            }
        }
    }
}

impl eframe::App for PadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Wake up periodically so we can poll the channel even without user events
        ctx.request_repaint_after(Duration::from_millis(120));
        self.drain_completions();

        if let Some(msg) = self.error.clone() {
            let mut close = false;
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&msg);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            if close {
                self.error = None;
            }
        }

        if let Some(msg) = self.notice.clone() {
            let mut close = false;
            egui::Window::new("LingoPad")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&msg);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            if close {
                self.notice = None;
            }
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("LingoPad");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.busy {
                        ui.spinner();
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_source("input")
                .max_height(ui.available_height() * 0.4)
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.input)
                            .hint_text("Type or paste text here")
                            .desired_rows(8)
                            .desired_width(f32::INFINITY),
                    );
                });

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui
                    .button(format!("{} Check grammar", egui_phosphor::regular::TEXT_AA))
                    .clicked()
                {
                    self.dispatch(Op::CheckGrammar);
                }
                if ui
                    .button(format!("{} Translate", egui_phosphor::regular::TRANSLATE))
                    .clicked()
                {
                    self.dispatch(Op::Translate);
                }
                if ui
                    .button(format!("{} Polish", egui_phosphor::regular::SPARKLE))
                    .clicked()
                {
                    self.dispatch(Op::Polish);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(format!("{} Copy", egui_phosphor::regular::COPY))
                        .clicked()
                    {
                        let text = self.output.clone();
                        ui.output_mut(|o| o.copied_text = text);
                    }
                });
            });

            ui.add_space(6.0);
            ui.separator();

            egui::ScrollArea::vertical()
                .id_source("output")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if self.issues.is_empty() {
                        ui.add(
                            egui::TextEdit::multiline(&mut self.output)
                                .desired_rows(10)
                                .desired_width(f32::INFINITY),
                        );
                    } else {
                        for issue in &self.issues {
                            ui.group(|ui| {
                                ui.horizontal(|ui| {
                                    ui.label(
                                        egui::RichText::new(format!(
                                            "{}..{}",
                                            issue.start, issue.end
                                        ))
                                        .monospace(),
                                    );
                                    ui.label(&issue.message);
                                });
                                if !issue.replacements.is_empty() {
                                    ui.label(format!(
                                        "Suggestions: {}",
                                        issue.replacements.join(", ")
                                    ));
                                }
                            });
                        }
                    }
                });
        });
    }
}

fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    // Best-effort CJK fallback so Chinese input and translations render
    let candidates = [
        r"C:\Windows\Fonts\msyh.ttc",
        r"C:\Windows\Fonts\simsun.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/System/Library/Fonts/PingFang.ttc",
    ];
    let mut loaded = false;
    for path in candidates {
        if let Ok(bytes) = fs::read(path) {
            fonts
                .font_data
                .insert("cjk".to_owned(), egui::FontData::from_owned(bytes));
            fonts
                .families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .push("cjk".to_owned());
            fonts
                .families
                .entry(egui::FontFamily::Monospace)
                .or_default()
                .push("cjk".to_owned());
            info!("loaded CJK font from {}", path);
            loaded = true;
            break;
        }
    }
    if !loaded {
        warn!("no CJK font found; CJK text may render as squares");
    }

    ctx.set_fonts(fonts);
}

// Run the UI event loop on the main thread (blocking)
pub fn run(job_tx: Sender<Job>, completion_rx: Receiver<Completion>) {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("LingoPad")
            .with_inner_size([820.0, 600.0]),
        ..Default::default()
    };
    info!("starting UI event loop");
    match eframe::run_native(
        "LingoPad",
        native_options,
        Box::new(move |cc| Box::new(PadApp::new(cc, job_tx, completion_rx))),
    ) {
        Ok(()) => info!("UI event loop exited"),
        Err(e) => error!("UI error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GrammarCheckResult, GrammarIssue, TranslateResult};
    use crate::error::Error;
    use crossbeam_channel::unbounded;

    fn harness() -> (PadApp, Receiver<Job>) {
        let (job_tx, job_rx) = unbounded();
        let (_done_tx, done_rx) = unbounded::<Completion>();
        (PadApp::with_channels(job_tx, done_rx), job_rx)
    }

    #[test]
    fn dispatch_tags_jobs_with_fresh_sequence_numbers() {
        let (mut app, job_rx) = harness();
        app.input = "hello".to_string();

        app.dispatch(Op::Translate);
        app.dispatch(Op::Polish);

        let first = job_rx.try_recv().unwrap();
        let second = job_rx.try_recv().unwrap();
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert_eq!(first.text, "hello");
        assert_eq!(app.latest_seq, 2);
        assert!(app.busy);
    }

    #[test]
    fn stale_completion_never_overwrites_newer_state() {
        let (mut app, _job_rx) = harness();
        app.latest_seq = 2;
        app.busy = true;

        app.apply(Completion {
            seq: 1,
            op: Op::Translate,
            result: Ok(Reply::Translated(TranslateResult {
                translated: "old".to_string(),
            })),
        });
        assert!(app.busy);
        assert_eq!(app.output, "");

        app.apply(Completion {
            seq: 2,
            op: Op::Translate,
            result: Ok(Reply::Translated(TranslateResult {
                translated: "new".to_string(),
            })),
        });
        assert!(!app.busy);
        assert_eq!(app.output, "new");
    }

    #[test]
    fn empty_issue_list_shows_a_notice_not_an_error() {
        let (mut app, _job_rx) = harness();
        app.latest_seq = 1;
        app.busy = true;

        app.apply(Completion {
            seq: 1,
            op: Op::CheckGrammar,
            result: Ok(Reply::Grammar(GrammarCheckResult {
                original: "a".to_string(),
                issues: vec![],
            })),
        });
        assert!(app.notice.is_some());
        assert!(app.error.is_none());
        assert!(app.issues.is_empty());
    }

    #[test]
    fn issues_replace_the_output_area() {
        let (mut app, _job_rx) = harness();
        app.latest_seq = 1;
        app.output = "previous translation".to_string();

        app.apply(Completion {
            seq: 1,
            op: Op::CheckGrammar,
            result: Ok(Reply::Grammar(GrammarCheckResult {
                original: "I has a apple.".to_string(),
                issues: vec![GrammarIssue {
                    start: 2,
                    end: 5,
                    message: "subject-verb agreement".to_string(),
                    replacements: vec!["have".to_string()],
                }],
            })),
        });
        assert_eq!(app.issues.len(), 1);
        assert_eq!(app.output, "");
        assert!(app.notice.is_none());
    }

    #[test]
    fn failure_raises_an_error_dialog_with_the_operation_name() {
        let (mut app, _job_rx) = harness();
        app.latest_seq = 1;
        app.busy = true;

        app.apply(Completion {
            seq: 1,
            op: Op::Polish,
            result: Err(Error::Server {
                status: 500,
                body: "boom".to_string(),
            }),
        });
        assert!(!app.busy);
        let msg = app.error.unwrap();
        assert!(msg.contains("polishing"), "got {msg}");
        assert!(msg.contains("500"), "got {msg}");
    }
}
