use super::entities::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Coin,
    Stomp,
    Death,
    SpinJump,
    Powerup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicCommand {
    Start,
    Stop,
    Restart,
}

/// Notifications the simulation raises for audio, score and UI collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CoinCollected,
    EnemyStomped { points: u32 },
    PowerUp,
    PlayerShrunk,
    PlayerDied,
    SpinJump,
    GroundPoundStarted,
    GroundPoundLanded { kills: u32 },
    QuestionBlockHit { spawned: EntityKind },
    LevelComplete,
    RunStarted,
    RunReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEventKind {
    CoinCollected,
    EnemyStomped,
    PowerUp,
    PlayerShrunk,
    PlayerDied,
    SpinJump,
    GroundPoundStarted,
    GroundPoundLanded,
    QuestionBlockHit,
    LevelComplete,
    RunStarted,
    RunReset,
}

impl GameEvent {
    pub fn kind(self) -> GameEventKind {
        match self {
            Self::CoinCollected => GameEventKind::CoinCollected,
            Self::EnemyStomped { .. } => GameEventKind::EnemyStomped,
            Self::PowerUp => GameEventKind::PowerUp,
            Self::PlayerShrunk => GameEventKind::PlayerShrunk,
            Self::PlayerDied => GameEventKind::PlayerDied,
            Self::SpinJump => GameEventKind::SpinJump,
            Self::GroundPoundStarted => GameEventKind::GroundPoundStarted,
            Self::GroundPoundLanded { .. } => GameEventKind::GroundPoundLanded,
            Self::QuestionBlockHit { .. } => GameEventKind::QuestionBlockHit,
            Self::LevelComplete => GameEventKind::LevelComplete,
            Self::RunStarted => GameEventKind::RunStarted,
            Self::RunReset => GameEventKind::RunReset,
        }
    }

    pub fn sound_cue(self) -> Option<SoundCue> {
        match self {
            Self::CoinCollected => Some(SoundCue::Coin),
            Self::EnemyStomped { .. } | Self::PlayerShrunk | Self::GroundPoundLanded { .. } => {
                Some(SoundCue::Stomp)
            }
            Self::PlayerDied => Some(SoundCue::Death),
            Self::SpinJump | Self::GroundPoundStarted => Some(SoundCue::SpinJump),
            Self::PowerUp => Some(SoundCue::Powerup),
            Self::QuestionBlockHit { .. }
            | Self::LevelComplete
            | Self::RunStarted
            | Self::RunReset => None,
        }
    }

    pub fn music_command(self) -> Option<MusicCommand> {
        match self {
            Self::RunStarted => Some(MusicCommand::Start),
            Self::PlayerDied | Self::LevelComplete => Some(MusicCommand::Stop),
            Self::RunReset => Some(MusicCommand::Restart),
            _ => None,
        }
    }
}

pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub total: u32,
    pub coins_collected: u32,
    pub enemies_stomped: u32,
    pub power_ups: u32,
    pub deaths: u32,
    pub resets: u32,
    pub other: u32,
}

impl EventCounts {
    fn record(&mut self, kind: GameEventKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            GameEventKind::CoinCollected => {
                self.coins_collected = self.coins_collected.saturating_add(1)
            }
            GameEventKind::EnemyStomped => {
                self.enemies_stomped = self.enemies_stomped.saturating_add(1)
            }
            GameEventKind::PowerUp => self.power_ups = self.power_ups.saturating_add(1),
            GameEventKind::PlayerDied => self.deaths = self.deaths.saturating_add(1),
            GameEventKind::RunReset => self.resets = self.resets.saturating_add(1),
            _ => self.other = self.other.saturating_add(1),
        }
    }
}

/// Per-tick event buffer. Events collected during a tick are delivered by the
/// driver, then rolled over into `last_tick_counts`.
#[derive(Debug, Default)]
pub struct EventBus {
    current_tick_events: Vec<GameEvent>,
    last_tick_counts: EventCounts,
}

impl EventBus {
    pub fn iter_emitted_so_far(&self) -> impl Iterator<Item = &GameEvent> {
        self.current_tick_events.iter()
    }

    pub fn finish_tick_rollover(&mut self) {
        let mut counts = EventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
        }
        self.last_tick_counts = counts;
        self.current_tick_events.clear();
    }

    pub fn last_tick_counts(&self) -> EventCounts {
        self.last_tick_counts
    }
}

impl EventSink for EventBus {
    fn emit(&mut self, event: GameEvent) {
        self.current_tick_events.push(event);
    }
}
