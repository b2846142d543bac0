use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use bakery_core::{update, AppState, Msg};
use bakery_engine::{EngineHandle, ReqwestApiClient};
use bakery_logging::{bakery_info, bakery_warn};

use super::effects::EffectRunner;
use super::ui::commands::{self, Command, HELP};
use super::ui::render;
use super::{config, logging};

enum Input {
    Line(String),
    Closed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = config::load().context("loading configuration")?;
    logging::initialize(config.log_destination);
    bakery_info!("Starting bakery client against {}", config.base_url);

    let client = ReqwestApiClient::new(config.client_settings())
        .context("building the HTTP client")?;
    let engine = EngineHandle::new(Arc::new(client)).context("starting the engine runtime")?;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let mut shell = Shell {
        state: AppState::new(),
        runner: EffectRunner::new(engine, msg_tx),
    };
    let input_rx = spawn_stdin_reader();

    shell.redraw();
    loop {
        // Drain engine results first so one redraw covers the whole batch.
        while let Ok(msg) = msg_rx.try_recv() {
            shell.dispatch(msg);
        }
        shell.present();

        match input_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(Input::Line(line)) => {
                match commands::parse(&line, shell.state.screen()) {
                    Ok(Some(Command::Dispatch(msgs))) => {
                        for msg in msgs {
                            shell.dispatch(msg);
                        }
                    }
                    Ok(Some(Command::Help)) => println!("{HELP}"),
                    Ok(Some(Command::Quit)) => break,
                    Ok(None) => {}
                    Err(err) => println!("{err}"),
                }
                if !shell.present() {
                    prompt();
                }
            }
            Ok(Input::Closed) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
    }

    bakery_info!("Bakery client shutting down");
    Ok(())
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
}

impl Shell {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Prints pending alerts, then the screen if anything changed. Returns
    /// whether a fresh prompt was printed.
    fn present(&mut self) -> bool {
        let alerts = self.state.take_alerts();
        for alert in &alerts {
            println!("\n{}", render::render_alert(alert));
        }
        if self.state.consume_dirty() {
            self.redraw();
            return true;
        }
        if !alerts.is_empty() {
            prompt();
            return true;
        }
        false
    }

    fn redraw(&self) {
        print!("\n{}", render::render(&self.state.view()));
        prompt();
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn spawn_stdin_reader() -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    bakery_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(Input::Closed);
    });
    rx
}
