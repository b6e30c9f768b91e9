use crate::ui;
use chrono::{
    DateTime,
    Utc,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use rand::{
    Rng,
    SeedableRng,
    rngs::StdRng,
};
use slot_lottery::{
    DrawAnimation,
    DrawEvent,
    DrawState,
    LotteryEntry,
    ReelTimeline,
    SlotConfig,
    entry::max_width,
    plan_draw,
    planner::DRAW_COMPLETE_REELS,
    seed::{
        rng_from_seed,
        seed_digest,
    },
    timeline::VISIBLE_ROWS,
};
use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
    time::{
        Duration,
        Instant,
    },
};
use tokio::time;
use tracing::{
    info,
    warn,
};

pub struct AppConfig {
    pub slot: SlotConfig,
    pub candidates: Option<PathBuf>,
    pub seed: Option<String>,
    pub demo_size: usize,
}

#[derive(Clone, Debug)]
pub struct WinnerRecord {
    pub entry: LotteryEntry,
    pub drawn_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct ReelView {
    /// Top to bottom; the middle row is the one that counts.
    pub rows: Vec<String>,
    pub stopped: bool,
}

#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub pool_size: usize,
    pub active_count: usize,
    pub matching_count: usize,
    pub seed_digest: String,
    pub is_running: bool,
    pub target: Option<LotteryEntry>,
    pub decided: Vec<char>,
    pub reels: Vec<ReelView>,
    pub winners: Vec<WinnerRecord>,
    pub messages: Vec<String>,
}

struct RunningDraw {
    animation: DrawAnimation,
    started: Instant,
}

impl RunningDraw {
    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Reels that have stopped, counted from the rightmost one.
    fn settled_from_right(&self, now: Instant) -> usize {
        let elapsed = self.elapsed(now);
        self.animation
            .reels()
            .iter()
            .rev()
            .take_while(|reel| reel.is_settled_at(elapsed))
            .count()
    }
}

pub struct AppController {
    slot: SlotConfig,
    candidates: Option<PathBuf>,
    demo_size: usize,
    rng: StdRng,
    seed_digest: String,
    state: DrawState,
    draw: RunningDraw,
    winners: Vec<WinnerRecord>,
    messages: Vec<String>,
}

impl AppController {
    pub fn new(config: AppConfig) -> Result<Self> {
        let AppConfig {
            slot,
            candidates,
            seed,
            demo_size,
        } = config;
        slot.validate().wrap_err("invalid slot configuration")?;
        let (rng, digest) = match seed {
            Some(seed) => (rng_from_seed(&seed), seed_digest(&seed)),
            None => (StdRng::from_os_rng(), "random".to_string()),
        };
        let draw = RunningDraw {
            animation: DrawAnimation::idle(slot.element_height, &slot.padding, 1)?,
            started: Instant::now(),
        };
        let mut controller = Self {
            slot,
            candidates,
            demo_size,
            rng,
            seed_digest: digest,
            state: DrawState::new(),
            draw,
            winners: Vec::new(),
            messages: Vec::new(),
        };
        controller.reload_pool()?;
        Ok(controller)
    }

    /// Reads the candidate file again, or makes up a fresh demo pool.
    pub fn reload_pool(&mut self) -> Result<()> {
        let rows = match &self.candidates {
            Some(path) => read_candidates(path)?,
            None => demo_rows(&mut self.rng, self.demo_size),
        };
        self.state = self
            .state
            .apply(DrawEvent::LoadPool(rows))
            .wrap_err("loading the candidate pool failed")?;
        self.winners.clear();
        self.reset_idle_reels()?;
        self.push_message(format!("loaded {} candidates", self.state.pool().len()));
        Ok(())
    }

    pub fn start_draw(&mut self, now: Instant) -> Result<()> {
        if self.state.is_running() {
            return Ok(());
        }
        self.state = self.state.apply(DrawEvent::ClickStart)?;
        let fraction: f64 = self.rng.random();
        self.state = self.state.apply(DrawEvent::StartDraw(fraction))?;

        let Some(target) = self.state.target().cloned() else {
            self.push_message("everyone has already won".to_string());
            self.draw = RunningDraw {
                animation: DrawAnimation::idle(
                    self.slot.element_height,
                    &self.slot.padding,
                    DRAW_COMPLETE_REELS,
                )?,
                started: now,
            };
            return Ok(());
        };
        let active = self.state.active_pool();
        let animation = plan_draw(&mut self.rng, &self.slot, self.state.pool(), &active, &target)
            .wrap_err("planning the reels failed")?;
        info!(
            target = %target.number(),
            settles_after_ms = animation.final_rest_time().as_millis() as u64,
            "draw animation started"
        );
        self.draw = RunningDraw {
            animation,
            started: now + self.slot.start_delay(),
        };
        Ok(())
    }

    /// Stops the next reel by hand.
    pub fn advance_next_digit(&mut self) -> Result<()> {
        self.state = self.state.apply(DrawEvent::AdvanceNextDigit)?;
        self.sync_winners();
        Ok(())
    }

    /// Decides digits for reels that have come to rest and records the
    /// winner once the last reel stops.
    ///
    /// The draw state may count fewer reels than the animation shows, once
    /// the widest numbers have already won. A digit that would finish the
    /// draw waits until every reel of the animation has settled.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        if !self.state.is_running() {
            return Ok(());
        }
        let all_settled = self.draw.animation.is_settled_at(self.draw.elapsed(now));
        let settled = self.draw.settled_from_right(now);
        while self.state.is_running() && self.state.decided_digits().len() < settled {
            let next = self.state.apply(DrawEvent::AdvanceNextDigit)?;
            if next == self.state || (!next.is_running() && !all_settled) {
                break;
            }
            self.state = next;
        }
        if self.state.is_running() && all_settled {
            if let Some(target) = self.state.target().cloned() {
                self.state = self.state.apply(DrawEvent::RecordWinnerDirectly(target))?;
            }
        }
        self.sync_winners();
        Ok(())
    }

    pub fn snapshot(&self, now: Instant) -> AppSnapshot {
        let elapsed = self.draw.elapsed(now);
        let reels = self
            .draw
            .animation
            .reels()
            .iter()
            .map(|reel| ReelView {
                rows: reel_rows(reel, elapsed),
                stopped: reel.is_settled_at(elapsed),
            })
            .collect();
        AppSnapshot {
            pool_size: self.state.pool().len(),
            active_count: self.state.active_entries().count(),
            matching_count: self.state.matching_candidates().len(),
            seed_digest: self.seed_digest.clone(),
            is_running: self.state.is_running(),
            target: self.state.target().cloned(),
            decided: self.state.decided_digits().to_vec(),
            reels,
            winners: self.winners.clone(),
            messages: self.messages.clone(),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.slot.frame_interval()
    }

    fn sync_winners(&mut self) {
        let known = self.winners.len();
        for entry in self.state.winners().iter().skip(known) {
            info!(winner = %entry.number(), name = %entry.display_name(), "winner announced");
            self.messages
                .push(format!("winner {} {}", entry.number(), entry.display_name()));
            self.winners.push(WinnerRecord {
                entry: entry.clone(),
                drawn_at: Utc::now(),
            });
        }
    }

    fn reset_idle_reels(&mut self) -> Result<()> {
        let reel_count = max_width(self.state.pool()).max(1);
        self.draw = RunningDraw {
            animation: DrawAnimation::idle(self.slot.element_height, &self.slot.padding, reel_count)?,
            started: Instant::now(),
        };
        Ok(())
    }

    fn push_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > 50 {
            let drain = self.messages.len() - 50;
            self.messages.drain(0..drain);
        }
    }
}

fn read_candidates(path: &Path) -> Result<Vec<(String, String)>> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("reading candidates from {}", path.display()))?;
    let entries: Vec<LotteryEntry> = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("parsing candidates in {}", path.display()))?;
    Ok(entries
        .into_iter()
        .map(|entry| (entry.number().to_string(), entry.display_name().to_string()))
        .collect())
}

/// Sequential zero-padded numbers with made-up names.
fn demo_rows<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Vec<(String, String)> {
    let width = size.max(1).to_string().len();
    (1..=size)
        .map(|n| {
            let name = if rng.random_bool(0.5) {
                fakeit::name::full()
            } else {
                format!("{} {}", fakeit::name::first(), fakeit::name::last())
            };
            (format!("{n:0width$}"), name)
        })
        .collect()
}

/// Symbols in each visible row, top to bottom.
fn reel_rows(reel: &ReelTimeline, elapsed: Duration) -> Vec<String> {
    let eh = i64::from(reel.element_height());
    let mut rows = vec![String::new(); VISIBLE_ROWS as usize];
    let position = reel.position_at(elapsed);
    for visible in reel.visible_symbols_at(position) {
        let row = (visible.offset + eh / 2).div_euclid(eh);
        if (0..VISIBLE_ROWS as i64).contains(&row) {
            rows[row as usize] = visible.symbol.to_string();
        }
    }
    rows
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let mut controller = AppController::new(config)?;
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    info!("starting UI");
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(&mut controller, &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop(
    controller: &mut AppController,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
) -> Result<()> {
    let mut ticker = time::interval(controller.frame_interval());
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
    ui::draw(ui_state, &controller.snapshot(Instant::now()))?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            _ = ticker.tick() => {
                let now = Instant::now();
                controller.tick(now).wrap_err("advancing the draw failed")?;
                ui::draw(ui_state, &controller.snapshot(now))
                    .wrap_err("draw after tick failed")?;
            }
            raw_ev = ui::next_raw_event(input_events) => {
                let event = raw_ev?;
                let Some(ev) = ui::interpret_event(ui_state, event) else {
                    continue;
                };
                let now = Instant::now();
                let outcome = match ev {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::StartDraw => controller.start_draw(now),
                    ui::UserEvent::NextDigit => controller.advance_next_digit(),
                    ui::UserEvent::ReloadPool => controller.reload_pool(),
                    ui::UserEvent::Redraw => Ok(()),
                };
                if let Err(err) = outcome {
                    warn!("{err:#}");
                    controller.push_message(format!("{err:#}"));
                }
                ui::draw(ui_state, &controller.snapshot(now))?;
            }
        }
    }
    Ok(())
}
