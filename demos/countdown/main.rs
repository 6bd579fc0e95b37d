use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, Program};
use chrono::{Duration as ChronoDuration, Local, TimeZone};
use countdown_chronometer::prelude::*;
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const HELP: &str = "s start • t stop • r reset • f set format • c clear format • l set listener • h hide/show • q quit";

struct App {
    chrono: Chronometer,
    lift_off: Arc<AtomicBool>,
}

impl App {
    /// Tomorrow at 09:00 local time.
    fn reset_target() -> Option<i64> {
        let tomorrow = Local::now().date_naive() + ChronoDuration::days(1);
        let nine = tomorrow.and_hms_opt(9, 0, 0)?;
        Local
            .from_local_datetime(&nine)
            .single()
            .map(|t| t.timestamp_millis())
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let chrono = chronometer_new_in(Duration::from_secs(30))
            .with_style(Style::new().foreground(Color::from("205")).bold(true));
        let cmd = chrono.init();
        (
            Self {
                chrono,
                lift_off: Arc::new(AtomicBool::new(false)),
            },
            Some(cmd),
        )
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.key == KeyCode::Char('c') {
                return Some(quit());
            }
            return match key.key {
                KeyCode::Char('q') | KeyCode::Esc => Some(quit()),
                KeyCode::Char('s') => Some(self.chrono.start()),
                KeyCode::Char('t') => Some(self.chrono.stop()),
                KeyCode::Char('r') => match App::reset_target() {
                    Some(target) => {
                        self.lift_off.store(false, Ordering::SeqCst);
                        self.chrono.set_target(target)
                    }
                    None => None,
                },
                KeyCode::Char('f') => {
                    self.chrono
                        .countdown_mut()
                        .set_outer_template(Some("Formatted time (%s)"));
                    None
                }
                KeyCode::Char('c') => {
                    self.chrono.countdown_mut().set_outer_template(None);
                    None
                }
                KeyCode::Char('l') => {
                    let flag = self.lift_off.clone();
                    self.chrono.countdown_mut().on_complete(move |_| {
                        flag.store(true, Ordering::SeqCst);
                    });
                    None
                }
                KeyCode::Char('h') => {
                    if self.chrono.visible() {
                        self.chrono.hide();
                        None
                    } else {
                        self.chrono.show()
                    }
                }
                _ => None,
            };
        }

        if let Some(complete) = msg.downcast_ref::<CompleteMsg>() {
            if complete.id == self.chrono.id() {
                log::info!("countdown {} complete", complete.id);
            }
            return None;
        }

        self.chrono.update(msg)
    }

    fn view(&self) -> String {
        let mut out = format!("\n  {}\n", self.chrono.view());
        if !self.chrono.visible() {
            out.push_str("  (hidden: not ticking)\n");
        }
        if self.lift_off.load(Ordering::SeqCst) {
            out.push_str("\n  We have lift off!\n");
        }
        out.push_str("\n  ");
        out.push_str(HELP);
        out.push('\n');
        out
    }
}

/// Sends log output to `countdown-demo.log` when `RUST_LOG` is set, so it
/// never lands on the alternate screen.
fn init_logging() -> std::io::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = std::fs::File::create("countdown-demo.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let program = Program::<App>::builder().alt_screen(true).build()?;
    program.run().await?;
    Ok(())
}
